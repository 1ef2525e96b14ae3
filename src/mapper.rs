//! Field-by-field conversions between persisted rows and wire shapes.
//!
//! Write shapes never carry an id: inserts leave the key to the store and
//! updates project only the input fields onto an already loaded row.

use sea_orm::ActiveValue::{NotSet, Set};

use crate::dto::{CategoryInput, CategoryResponse, ProductInput, ProductResponse};
use crate::entities::{product, product_category};
use crate::repositories::ProductWithCategory;

impl From<CategoryInput> for product_category::ActiveModel {
    fn from(input: CategoryInput) -> Self {
        Self {
            id: NotSet,
            name: Set(input.name),
        }
    }
}

/// Replaces every mutable category field, keeping the id.
pub fn apply_category_input(
    mut model: product_category::Model,
    input: CategoryInput,
) -> product_category::Model {
    model.name = input.name;
    model
}

impl From<product_category::Model> for CategoryResponse {
    fn from(model: product_category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<ProductInput> for product::ActiveModel {
    fn from(input: ProductInput) -> Self {
        Self {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            category_id: Set(input.category_id),
        }
    }
}

/// Replaces every mutable product field, keeping the id.
pub fn apply_product_input(mut model: product::Model, input: ProductInput) -> product::Model {
    model.name = input.name;
    model.description = input.description;
    model.price = input.price;
    model.category_id = input.category_id;
    model
}

impl From<ProductWithCategory> for ProductResponse {
    fn from(row: ProductWithCategory) -> Self {
        let ProductWithCategory { product, category } = row;
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: category.map(CategoryResponse::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::ActiveValue;

    fn tools() -> product_category::Model {
        product_category::Model {
            id: 1,
            name: "Tools".into(),
        }
    }

    fn hammer() -> product::Model {
        product::Model {
            id: 7,
            name: "Hammer".into(),
            description: Some("Claw".into()),
            price: dec!(9.99),
            category_id: 1,
        }
    }

    #[test]
    fn category_input_leaves_id_to_the_store() {
        let active: product_category::ActiveModel = CategoryInput::new("Tools").into();
        assert_eq!(active.id, ActiveValue::NotSet);
        assert_eq!(active.name, ActiveValue::Set("Tools".to_string()));
    }

    #[test]
    fn apply_category_input_keeps_id() {
        let updated = apply_category_input(tools(), CategoryInput::new("Hand tools"));
        assert_eq!(updated.id, 1);
        assert_eq!(updated.name, "Hand tools");
    }

    #[test]
    fn product_input_maps_every_writable_field() {
        let active: product::ActiveModel = ProductInput {
            name: "Saw".into(),
            description: None,
            price: dec!(12.50),
            category_id: 3,
        }
        .into();

        assert_eq!(active.id, ActiveValue::NotSet);
        assert_eq!(active.name, ActiveValue::Set("Saw".to_string()));
        assert_eq!(active.description, ActiveValue::Set(None));
        assert_eq!(active.price, ActiveValue::Set(dec!(12.50)));
        assert_eq!(active.category_id, ActiveValue::Set(3));
    }

    #[test]
    fn apply_product_input_replaces_fields_but_not_id() {
        let updated = apply_product_input(
            hammer(),
            ProductInput {
                name: "Mallet".into(),
                description: None,
                price: dec!(4),
                category_id: 2,
            },
        );

        assert_eq!(
            updated,
            product::Model {
                id: 7,
                name: "Mallet".into(),
                description: None,
                price: dec!(4),
                category_id: 2,
            }
        );
    }

    #[test]
    fn product_response_nests_category() {
        let response = ProductResponse::from(ProductWithCategory {
            product: hammer(),
            category: Some(tools()),
        });

        assert_eq!(response.id, 7);
        assert_eq!(response.price, dec!(9.99));
        assert_eq!(
            response.category,
            Some(CategoryResponse {
                id: 1,
                name: "Tools".into()
            })
        );
    }

    #[test]
    fn product_response_without_loaded_category() {
        let response = ProductResponse::from(ProductWithCategory {
            product: hammer(),
            category: None,
        });
        assert!(response.category.is_none());
        assert_eq!(response.category_name(), "");
    }
}
