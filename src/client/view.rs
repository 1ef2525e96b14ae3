use tracing::debug;

use super::api_client::CatalogClient;
use super::dialogs::{CreateProductDialog, DeleteProductDialog, DialogResult};
use super::table::ProductTable;
use crate::dto::ProductResponse;

/// Product list screen: owns the client and the table it renders.
#[derive(Debug)]
pub struct ProductListView {
    client: CatalogClient,
    table: ProductTable,
}

impl ProductListView {
    /// Builds the view and loads the product list.
    pub async fn open(client: CatalogClient) -> Self {
        let mut view = Self {
            client,
            table: ProductTable::default(),
        };
        view.refresh().await;
        view
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn table(&self) -> &ProductTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ProductTable {
        &mut self.table
    }

    pub fn apply_filter(&mut self, raw: &str) {
        self.table.apply_filter(raw);
    }

    /// Messages from the last failed call, if any
    pub fn error_messages(&self) -> Vec<String> {
        self.client.error_messages()
    }

    /// Re-fetches the list; on failure the previous rows stay in place.
    pub async fn refresh(&mut self) {
        match self.client.list_products().await {
            Ok(products) => {
                debug!(count = products.len(), "Product list refreshed");
                self.table.set_rows(products);
            }
            Err(e) => debug!(error = %e, "Product list refresh failed"),
        }
    }

    pub async fn open_create_dialog(&self) -> CreateProductDialog {
        CreateProductDialog::open(&self.client).await
    }

    /// Only a completed create changes the list.
    pub async fn close_create_dialog(&mut self, result: &DialogResult<ProductResponse>) {
        if result.is_completed() {
            self.refresh().await;
        }
    }

    pub fn open_delete_dialog(&self, product_id: i32) -> Option<DeleteProductDialog> {
        self.table
            .find(product_id)
            .cloned()
            .map(DeleteProductDialog::new)
    }

    /// The list is re-fetched however the delete dialog ended.
    pub async fn close_delete_dialog(&mut self, _result: &DialogResult<()>) {
        self.refresh().await;
    }
}
