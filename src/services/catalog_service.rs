use metrics::counter;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{CategoryInput, CategoryResponse, ProductInput, ProductResponse};
use crate::entities::{product, product_category};
use crate::errors::ServiceError;
use crate::mapper::{apply_category_input, apply_product_input};
use crate::repositories::CatalogRepository;

/// Catalog use cases behind the HTTP endpoints.
///
/// Every operation follows the same flow: validate, load the prerequisite
/// row, mutate or read, then map to the read shape.
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ServiceError> {
        let categories = self.repository.list_categories().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i32) -> Result<CategoryResponse, ServiceError> {
        self.load_category(id).await.map(CategoryResponse::from)
    }

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CategoryInput,
    ) -> Result<CategoryResponse, ServiceError> {
        input.validate()?;

        let category = self
            .repository
            .create_category(product_category::ActiveModel::from(input))
            .await?;

        counter!("productmanager.categories.created", 1);
        info!(category_id = category.id, "Created product category");
        Ok(category.into())
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: i32,
        input: CategoryInput,
    ) -> Result<CategoryResponse, ServiceError> {
        input.validate()?;

        let existing = self.load_category(id).await?;
        let category = self
            .repository
            .update_category(apply_category_input(existing, input))
            .await?;

        info!(category_id = id, "Updated product category");
        Ok(category.into())
    }

    /// Deletes a category that no product references any more.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        self.load_category(id).await?;

        let referencing = self.repository.count_products_in_category(id).await?;
        if referencing > 0 {
            warn!(
                category_id = id,
                referencing, "Refusing to delete a category that is still in use"
            );
            return Err(ServiceError::Conflict(format!(
                "Category {} is still referenced by {} product(s)",
                id, referencing
            )));
        }

        self.repository.delete_category(id).await?;

        counter!("productmanager.categories.deleted", 1);
        info!(category_id = id, "Deleted product category");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = self.repository.list_products().await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> Result<ProductResponse, ServiceError> {
        self.repository
            .find_product(id)
            .await?
            .map(ProductResponse::from)
            .ok_or_else(|| product_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: ProductInput,
    ) -> Result<ProductResponse, ServiceError> {
        input.validate()?;
        self.ensure_category_exists(input.category_id).await?;

        let created = self
            .repository
            .create_product(product::ActiveModel::from(input))
            .await?;

        counter!("productmanager.products.created", 1);
        info!(product_id = created.product.id, "Created product");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: i32,
        input: ProductInput,
    ) -> Result<ProductResponse, ServiceError> {
        input.validate()?;

        let existing = self
            .repository
            .find_product(id)
            .await?
            .ok_or_else(|| product_not_found(id))?;
        self.ensure_category_exists(input.category_id).await?;

        let updated = self
            .repository
            .update_product(apply_product_input(existing.product, input))
            .await?;

        info!(product_id = id, "Updated product");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        self.repository
            .find_product(id)
            .await?
            .ok_or_else(|| product_not_found(id))?;

        self.repository.delete_product(id).await?;

        counter!("productmanager.products.deleted", 1);
        info!(product_id = id, "Deleted product");
        Ok(())
    }

    async fn load_category(&self, id: i32) -> Result<product_category::Model, ServiceError> {
        self.repository
            .find_category(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    async fn ensure_category_exists(&self, category_id: i32) -> Result<(), ServiceError> {
        match self.repository.find_category(category_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(
                "Product category not found".to_string(),
            )),
        }
    }
}

fn product_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Product {} not found", id))
}
