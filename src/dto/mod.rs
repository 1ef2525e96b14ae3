//! Wire shapes shared by the HTTP handlers and the client.

pub mod catalog;

pub use catalog::{CategoryInput, CategoryResponse, ProductInput, ProductResponse};
