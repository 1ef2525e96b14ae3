//! Modal flows for creating categories and products and for confirming a
//! product delete. A dialog stays usable after a failed call so the caller
//! can correct the form and submit again.

use tracing::info;

use super::api_client::{CatalogClient, ClientError};
use super::forms::{CategoryForm, FormErrors, ProductForm};
use crate::dto::{CategoryResponse, ProductResponse};

/// How a dialog finished
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult<T> {
    /// The call succeeded; carries what the server returned
    Completed(T),
    /// The call was made and failed with these messages
    Failed(Vec<String>),
    /// Closed without making a call
    Cancelled,
}

impl<T> DialogResult<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, DialogResult::Completed(_))
    }

    fn from_call(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => DialogResult::Completed(value),
            Err(e) => DialogResult::Failed(e.messages()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateCategoryDialog {
    pub form: CategoryForm,
}

impl CreateCategoryDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends the form when it is valid; an invalid form makes no call.
    pub async fn submit(
        &mut self,
        client: &CatalogClient,
    ) -> Result<DialogResult<CategoryResponse>, FormErrors> {
        let input = self.form.submit()?;
        let result = DialogResult::from_call(client.create_category(&input).await);
        if let DialogResult::Completed(category) = &result {
            info!(category_id = category.id, "Category created from dialog");
        }
        Ok(result)
    }

    pub fn cancel(self) -> DialogResult<CategoryResponse> {
        DialogResult::Cancelled
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateProductDialog {
    pub form: ProductForm,
    categories: Vec<CategoryResponse>,
}

impl CreateProductDialog {
    /// Opens the dialog and loads the category choices. A failed load leaves
    /// the choice list empty; the messages stay on the client.
    pub async fn open(client: &CatalogClient) -> Self {
        let categories = client.list_categories().await.unwrap_or_default();
        Self {
            form: ProductForm::default(),
            categories,
        }
    }

    pub fn categories(&self) -> &[CategoryResponse] {
        &self.categories
    }

    /// Picks a category from the loaded choices by id.
    pub fn select_category(&mut self, id: i32) -> bool {
        let known = self.categories.iter().any(|c| c.id == id);
        if known {
            self.form.category_id = Some(id);
        }
        known
    }

    pub async fn submit(
        &mut self,
        client: &CatalogClient,
    ) -> Result<DialogResult<ProductResponse>, FormErrors> {
        let input = self.form.submit()?;
        let result = DialogResult::from_call(client.create_product(&input).await);
        if let DialogResult::Completed(product) = &result {
            info!(product_id = product.id, "Product created from dialog");
        }
        Ok(result)
    }

    pub fn cancel(self) -> DialogResult<ProductResponse> {
        DialogResult::Cancelled
    }
}

/// Asks for confirmation before deleting the given product.
#[derive(Debug, Clone)]
pub struct DeleteProductDialog {
    product: ProductResponse,
}

impl DeleteProductDialog {
    pub fn new(product: ProductResponse) -> Self {
        Self { product }
    }

    pub fn product(&self) -> &ProductResponse {
        &self.product
    }

    pub fn prompt(&self) -> String {
        format!("Delete product \"{}\"?", self.product.name)
    }

    pub async fn confirm(self, client: &CatalogClient) -> DialogResult<()> {
        let result = DialogResult::from_call(client.delete_product(self.product.id).await);
        if result.is_completed() {
            info!(product_id = self.product.id, "Product deleted from dialog");
        }
        result
    }

    pub fn cancel(self) -> DialogResult<()> {
        DialogResult::Cancelled
    }
}
