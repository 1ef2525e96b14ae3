use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Custom validator for Decimal minimum value
fn validate_decimal_min_zero(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("decimal_min_zero");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Write shape for a product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Category display name (3-50 characters)
    #[validate(length(min = 3, max = 50, message = "Name must have a minimum of 3 and a maximum of 50 characters"))]
    #[schema(example = "Tools")]
    pub name: String,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Read shape for a product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"id": 1, "name": "Tools"}))]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Tools")]
    pub name: String,
}

/// Write shape for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "name": "Hammer",
    "description": "Claw hammer, 16oz",
    "price": 9.99,
    "categoryId": 1
}))]
pub struct ProductInput {
    /// Product display name (3-50 characters)
    #[validate(length(min = 3, max = 50, message = "Name must have a minimum of 3 and a maximum of 50 characters"))]
    #[schema(example = "Hammer")]
    pub name: String,
    /// Free-form description
    #[serde(default)]
    #[schema(example = "Claw hammer, 16oz")]
    pub description: Option<String>,
    /// Unit price, zero or more
    #[validate(custom = "validate_decimal_min_zero")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    /// Id of the owning category
    #[serde(alias = "productCategoryId")]
    #[validate(range(min = 1, message = "Category id must be a positive integer"))]
    #[schema(example = 1)]
    pub category_id: i32,
}

/// Read shape for a product, with its category nested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "name": "Hammer",
    "description": "Claw hammer, 16oz",
    "price": 9.99,
    "category": {"id": 1, "name": "Tools"}
}))]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Hammer")]
    pub name: String,
    #[schema(example = "Claw hammer, 16oz")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    pub category: Option<CategoryResponse>,
}

impl ProductResponse {
    /// Name of the nested category, empty when it was not loaded
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}
