//! Product Manager API Library
//!
//! Product catalog backend (products and product categories over a
//! relational store) together with a typed client for the same HTTP surface.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod client;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod mapper;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::errors::ServiceError;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: AppConfig) -> Self {
        Self {
            services: handlers::AppServices::new(db.clone()),
            db,
            config: Arc::new(config),
        }
    }
}

/// Catalog routes, mounted under `/api/products`
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/api/products", handlers::products::products_routes())
}

/// Full application router: catalog API, health probes and API docs, with
/// request ids, HTTP tracing and the body size limit applied.
pub fn app_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_size;

    Router::new()
        .merge(api_routes())
        .nest("/health", health::health_routes())
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

/// Builds the CORS layer described by the configuration.
///
/// Explicit origins win; otherwise development (or an explicit opt-in)
/// gets a permissive layer and anything else is a configuration error.
pub fn build_cors_layer(cfg: &AppConfig) -> Result<CorsLayer, ServiceError> {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        return Ok(CorsLayer::permissive());
    }

    Err(ServiceError::InternalError(
        "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true"
            .to_string(),
    ))
}

#[cfg(test)]
mod cors_tests {
    use super::*;

    fn config(environment: &str) -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            environment.into(),
        )
    }

    #[test]
    fn production_without_origins_is_rejected() {
        assert!(build_cors_layer(&config("production")).is_err());
    }

    #[test]
    fn explicit_origins_or_development_are_accepted() {
        let mut cfg = config("production");
        cfg.cors_allowed_origins = Some("http://localhost:4200".into());
        assert!(build_cors_layer(&cfg).is_ok());
        assert!(build_cors_layer(&config("development")).is_ok());
    }
}
