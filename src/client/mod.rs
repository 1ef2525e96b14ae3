//! Client side of the catalog: a typed HTTP client plus the table, form,
//! dialog and list-view state a front-end drives over it.

pub mod api_client;
pub mod dialogs;
pub mod forms;
pub mod table;
pub mod view;

pub use api_client::{CatalogClient, ClientError};
pub use dialogs::{CreateCategoryDialog, CreateProductDialog, DeleteProductDialog, DialogResult};
pub use forms::{CategoryForm, FormErrors, ProductForm};
pub use table::{ProductTable, SortColumn, SortDirection, DEFAULT_PAGE_SIZE};
pub use view::ProductListView;
