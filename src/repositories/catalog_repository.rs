use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use std::sync::Arc;

use crate::db::DatabaseAccess;
use crate::entities::{
    product::{self, Entity as Product},
    product_category::{self, Entity as ProductCategory},
};
use crate::errors::ServiceError;

/// A product row together with its eagerly loaded category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductWithCategory {
    pub product: product::Model,
    pub category: Option<product_category::Model>,
}

impl From<(product::Model, Option<product_category::Model>)> for ProductWithCategory {
    fn from((product, category): (product::Model, Option<product_category::Model>)) -> Self {
        Self { product, category }
    }
}

/// Data access for categories and products.
///
/// Lookups return `Ok(None)` for a missing id; `update_*` and `delete_*`
/// report a missing row as `ServiceError::NotFound`.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<product_category::Model>, ServiceError>;

    async fn find_category(&self, id: i32)
        -> Result<Option<product_category::Model>, ServiceError>;

    async fn create_category(
        &self,
        category: product_category::ActiveModel,
    ) -> Result<product_category::Model, ServiceError>;

    async fn update_category(
        &self,
        category: product_category::Model,
    ) -> Result<product_category::Model, ServiceError>;

    async fn delete_category(&self, id: i32) -> Result<(), ServiceError>;

    async fn list_products(&self) -> Result<Vec<ProductWithCategory>, ServiceError>;

    async fn find_product(&self, id: i32) -> Result<Option<ProductWithCategory>, ServiceError>;

    async fn create_product(
        &self,
        product: product::ActiveModel,
    ) -> Result<ProductWithCategory, ServiceError>;

    async fn update_product(
        &self,
        product: product::Model,
    ) -> Result<ProductWithCategory, ServiceError>;

    async fn delete_product(&self, id: i32) -> Result<(), ServiceError>;

    async fn count_products_in_category(&self, category_id: i32) -> Result<u64, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct SeaOrmCatalogRepository {
    db: DatabaseAccess,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db: DatabaseAccess::new(db),
        }
    }
}

fn category_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Category {} not found", id))
}

fn product_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Product {} not found", id))
}

/// `Ok(None)` when the row to update has disappeared.
fn absent_on_missing_row<T>(result: Result<T, DbErr>) -> Result<Option<T>, DbErr> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

// SQLite reports FK failures on delete with extended code 1811, which
// `sql_err` leaves unclassified; fall back to the driver message.
const SQLITE_FK_MESSAGE: &str = "FOREIGN KEY constraint failed";

fn is_foreign_key_violation(err: &ServiceError) -> bool {
    match err {
        ServiceError::DatabaseError(db_err) => {
            matches!(
                db_err.sql_err(),
                Some(SqlErr::ForeignKeyConstraintViolation(_))
            ) || db_err.to_string().contains(SQLITE_FK_MESSAGE)
        }
        _ => false,
    }
}

fn missing_category_on_fk(err: ServiceError) -> ServiceError {
    if is_foreign_key_violation(&err) {
        ServiceError::NotFound("Product category not found".to_string())
    } else {
        err
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list_categories(&self) -> Result<Vec<product_category::Model>, ServiceError> {
        self.db
            .execute("list_categories", |db| {
                ProductCategory::find()
                    .order_by_asc(product_category::Column::Id)
                    .all(db)
            })
            .await
    }

    async fn find_category(
        &self,
        id: i32,
    ) -> Result<Option<product_category::Model>, ServiceError> {
        self.db
            .execute("find_category", |db| ProductCategory::find_by_id(id).one(db))
            .await
    }

    async fn create_category(
        &self,
        category: product_category::ActiveModel,
    ) -> Result<product_category::Model, ServiceError> {
        self.db
            .execute("create_category", |db| category.insert(db))
            .await
    }

    async fn update_category(
        &self,
        category: product_category::Model,
    ) -> Result<product_category::Model, ServiceError> {
        let id = category.id;
        let active = product_category::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(category.id),
            name: sea_orm::ActiveValue::Set(category.name),
        };

        self.db
            .execute("update_category", |db| async move {
                absent_on_missing_row(active.update(db).await)
            })
            .await?
            .ok_or_else(|| category_not_found(id))
    }

    async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        let result = self
            .db
            .execute("delete_category", |db| {
                ProductCategory::delete_by_id(id).exec(db)
            })
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    ServiceError::Conflict(format!(
                        "Category {} is still referenced by products",
                        id
                    ))
                } else {
                    err
                }
            })?;

        if result.rows_affected == 0 {
            return Err(category_not_found(id));
        }
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<ProductWithCategory>, ServiceError> {
        let rows = self
            .db
            .execute("list_products", |db| {
                Product::find()
                    .find_also_related(ProductCategory)
                    .order_by_asc(product::Column::Id)
                    .all(db)
            })
            .await?;

        Ok(rows.into_iter().map(ProductWithCategory::from).collect())
    }

    async fn find_product(&self, id: i32) -> Result<Option<ProductWithCategory>, ServiceError> {
        let row = self
            .db
            .execute("find_product", |db| {
                Product::find_by_id(id)
                    .find_also_related(ProductCategory)
                    .one(db)
            })
            .await?;

        Ok(row.map(ProductWithCategory::from))
    }

    async fn create_product(
        &self,
        product: product::ActiveModel,
    ) -> Result<ProductWithCategory, ServiceError> {
        let inserted = self
            .db
            .execute("create_product", |db| product.insert(db))
            .await
            .map_err(missing_category_on_fk)?;

        self.find_product(inserted.id).await?.ok_or_else(|| {
            ServiceError::InternalError(format!(
                "Product {} vanished right after insert",
                inserted.id
            ))
        })
    }

    async fn update_product(
        &self,
        product: product::Model,
    ) -> Result<ProductWithCategory, ServiceError> {
        let id = product.id;
        let active = product::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(product.id),
            name: sea_orm::ActiveValue::Set(product.name),
            description: sea_orm::ActiveValue::Set(product.description),
            price: sea_orm::ActiveValue::Set(product.price),
            category_id: sea_orm::ActiveValue::Set(product.category_id),
        };

        self.db
            .execute("update_product", |db| async move {
                absent_on_missing_row(active.update(db).await)
            })
            .await
            .map_err(missing_category_on_fk)?
            .ok_or_else(|| product_not_found(id))?;

        self.find_product(id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        let result = self
            .db
            .execute("delete_product", |db| Product::delete_by_id(id).exec(db))
            .await?;

        if result.rows_affected == 0 {
            return Err(product_not_found(id));
        }
        Ok(())
    }

    async fn count_products_in_category(&self, category_id: i32) -> Result<u64, ServiceError> {
        self.db
            .execute("count_products_in_category", |db| {
                Product::find()
                    .filter(product::Column::CategoryId.eq(category_id))
                    .count(db)
            })
            .await
    }
}
