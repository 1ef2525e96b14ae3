use crate::db::DbPool;
use crate::repositories::SeaOrmCatalogRepository;
use crate::services::CatalogService;
use std::sync::Arc;

pub mod categories;
pub mod common;
pub mod products;

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
}

impl AppServices {
    /// Wires the sea-orm backed catalog onto `db_pool`.
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        let repository = Arc::new(SeaOrmCatalogRepository::new(db_pool));
        Self {
            catalog: Arc::new(CatalogService::new(repository)),
        }
    }
}
