mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{response_bytes, response_json, TestApp};

#[tokio::test]
async fn created_category_can_be_fetched_by_id() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/products/categories",
            Some(json!({ "name": "Tools" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = response_json(response).await;
    assert_eq!(created, json!({ "id": 1, "name": "Tools" }));

    let response = app
        .request(Method::GET, "/api/products/categories/1", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["name"], "Tools");
}

#[tokio::test]
async fn listing_includes_every_created_category() {
    let app = TestApp::new().await;
    let names = ["Tools", "Garden", "Kitchen"];
    for name in names {
        app.seed_category(name).await;
    }

    let response = app
        .request(Method::GET, "/api/products/categories", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let listed: Vec<&str> = body
        .as_array()
        .expect("array of categories")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();

    assert!(listed.len() >= names.len());
    for name in names {
        assert!(listed.contains(&name), "missing {name}");
    }
}

#[tokio::test]
async fn update_renames_and_keeps_id() {
    let app = TestApp::new().await;
    let id = app.seed_category("Tools").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/products/categories/{id}"),
            Some(json!({ "name": "Hand tools" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({ "id": id, "name": "Hand tools" })
    );

    let response = app
        .request(Method::GET, &format!("/api/products/categories/{id}"), None)
        .await;
    assert_eq!(
        response_json(response).await,
        json!({ "id": id, "name": "Hand tools" })
    );
}

#[tokio::test]
async fn deleted_category_is_not_found_afterwards() {
    let app = TestApp::new().await;
    let id = app.seed_category("Tools").await;

    let response = app
        .request(Method::DELETE, &format!("/api/products/categories/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_bytes(response).await.is_empty());

    let response = app
        .request(Method::GET, &format!("/api/products/categories/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_category_ids_answer_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/products/categories/99", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("Category 99"));

    let response = app
        .request(
            Method::PUT,
            "/api/products/categories/99",
            Some(json!({ "name": "Nothing" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(Method::DELETE, "/api/products/categories/99", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_category_payloads_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/products/categories",
            Some(json!({ "name": "ab" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(
        body["errors"],
        json!(["name: Name must have a minimum of 3 and a maximum of 50 characters"])
    );

    let response = app
        .request(Method::POST, "/api/products/categories", Some(json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request_raw(
            Method::POST,
            "/api/products/categories",
            "application/json",
            "{not json",
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::GET, "/api/products/categories/abc", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn referenced_category_cannot_be_deleted() {
    let app = TestApp::new().await;
    let category_id = app.seed_category("Tools").await;
    let product_id = app.seed_product("Hammer", 9.99, category_id).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/products/categories/{category_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // still there, and removable once unreferenced
    let response = app
        .request(
            Method::GET,
            &format!("/api/products/categories/{category_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    app.request(Method::DELETE, &format!("/api/products/{product_id}"), None)
        .await;
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/products/categories/{category_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
