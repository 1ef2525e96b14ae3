//! Entry forms that gate submission before any request is sent.

use std::str::FromStr;

use rust_decimal::Decimal;
use validator::{Validate, ValidationError};

use crate::dto::{CategoryInput, ProductInput};
use crate::errors::flatten_validation_errors;

/// `field: message` lines describing why a form cannot be submitted
pub type FormErrors = Vec<String>;

fn price_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(price_error("required", "Price is required"));
    }
    let price = Decimal::from_str(raw)
        .map_err(|_| price_error("number", "Price must be a number"))?;
    if price < Decimal::new(1, 2) {
        return Err(price_error("min", "Price must be at least 0.01"));
    }
    Ok(price)
}

fn validate_price(raw: &str) -> Result<(), ValidationError> {
    parse_price(raw).map(|_| ())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

impl CategoryForm {
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn submit(&self) -> Result<CategoryInput, FormErrors> {
        self.validate()
            .map_err(|e| flatten_validation_errors(&e))?;
        Ok(CategoryInput::new(self.name.clone()))
    }
}

/// Product entry form; price is kept as typed text until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: String,
    #[validate(custom = "validate_price")]
    pub price: String,
    pub category_id: Option<i32>,
}

const CATEGORY_REQUIRED: &str = "category_id: Category is required";

impl ProductForm {
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok() && self.category_id.is_some()
    }

    pub fn submit(&self) -> Result<ProductInput, FormErrors> {
        let mut errors = self
            .validate()
            .err()
            .map(|e| flatten_validation_errors(&e))
            .unwrap_or_default();
        if self.category_id.is_none() {
            errors.push(CATEGORY_REQUIRED.to_string());
        }
        if !errors.is_empty() {
            errors.sort();
            return Err(errors);
        }

        let price = parse_price(&self.price).map_err(|e| {
            let detail = e.message.map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string());
            vec![format!("price: {detail}")]
        })?;
        let category_id = self
            .category_id
            .ok_or_else(|| vec![CATEGORY_REQUIRED.to_string()])?;

        Ok(ProductInput {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            price,
            category_id,
        })
    }
}
