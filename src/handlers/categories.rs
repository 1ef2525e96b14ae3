use crate::dto::{CategoryInput, CategoryResponse};
use crate::errors::ApiError;
use crate::handlers::common::{
    empty_ok_response, map_service_error, success_response, EntityId, ValidatedJson,
};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, routing::get, Router};

/// Creates the router for product category endpoints
pub fn categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

/// List all product categories
#[utoipa::path(
    get,
    path = "/api/products/categories",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .catalog
        .list_categories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(categories))
}

/// Get a product category by id
#[utoipa::path(
    get,
    path = "/api/products/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, description = "Malformed id", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .get_category(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Create a product category
#[utoipa::path(
    post,
    path = "/api/products/categories",
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .create_category(payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Rename a product category
#[utoipa::path(
    put,
    path = "/api/products/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .update_category(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Delete a product category
#[utoipa::path(
    delete,
    path = "/api/products/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Category still referenced by products", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .catalog
        .delete_category(id)
        .await
        .map_err(map_service_error)?;

    Ok(empty_ok_response())
}
