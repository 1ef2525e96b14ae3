pub mod product;
pub mod product_category;

pub use product::Entity as Product;
pub use product_category::Entity as ProductCategory;
