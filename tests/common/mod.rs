#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use productmanager_api::{app_router, config::AppConfig, db, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Helper harness for spinning up the full router over an in-memory SQLite store.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with a freshly migrated store.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // every pooled connection to sqlite::memory: is its own database
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self { router, state }
    }

    /// Serves the router on an ephemeral local port and returns its base URL.
    pub async fn spawn_server(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });
        format!("http://{addr}")
    }

    /// Send a request against the router, with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.send(request).await
    }

    /// Send a request with a raw body and content type.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &str,
    ) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Creates a category through the API and returns its id.
    pub async fn seed_category(&self, name: &str) -> i64 {
        let response = self
            .request(
                Method::POST,
                "/api/products/categories",
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        response_json(response).await["id"]
            .as_i64()
            .expect("category id")
    }

    /// Creates a product through the API and returns its id.
    pub async fn seed_product(&self, name: &str, price: f64, category_id: i64) -> i64 {
        let response = self
            .request(
                Method::POST,
                "/api/products",
                Some(serde_json::json!({
                    "name": name,
                    "description": "",
                    "price": price,
                    "categoryId": category_id,
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        response_json(response).await["id"]
            .as_i64()
            .expect("product id")
    }
}

pub async fn response_bytes(response: Response) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes")
        .to_vec()
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response_bytes(response).await;
    serde_json::from_slice(&bytes).expect("json response")
}
