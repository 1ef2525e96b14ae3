use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{CategoryInput, CategoryResponse, ProductInput, ProductResponse};
use crate::errors::ErrorResponse;
use crate::handlers::{categories, products};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Manager API",
        version = "0.1.0",
        description = r#"
# Product Manager API

CRUD endpoints for a product catalog: products and the categories they belong to.

## Error Handling

Failures share one body shape:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "errors": ["name: Name must have a minimum of 3 and a maximum of 50 characters"],
  "request_id": "6f1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Internal failures are reported as `500` with the message `Internal server error`.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    paths(
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
    ),
    components(schemas(
        ProductInput,
        ProductResponse,
        CategoryInput,
        CategoryResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Products", description = "Product endpoints"),
        (name = "Categories", description = "Product category endpoints"),
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_catalog_path() {
        let doc = ApiDocV1::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/products",
            "/api/products/{id}",
            "/api/products/categories",
            "/api/products/categories/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn document_declares_wire_schemas() {
        let doc = ApiDocV1::openapi();
        let schemas = &doc.components.expect("components").schemas;
        assert!(schemas.contains_key("ProductResponse"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
