use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::dto::{CategoryInput, CategoryResponse, ProductInput, ProductResponse};
use crate::errors::ErrorResponse;

const PRODUCTS_PATH: &str = "api/products";
const CATEGORIES_PATH: &str = "api/products/categories";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request rejected with {status}: {}", .messages.join("; "))]
    Api {
        status: StatusCode,
        messages: Vec<String>,
    },
}

impl ClientError {
    /// Messages a user should see for this failure
    pub fn messages(&self) -> Vec<String> {
        match self {
            ClientError::Api { messages, .. } => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            ClientError::InvalidUrl(_) => None,
        }
    }
}

/// Typed client for the catalog HTTP API.
///
/// Every failed call replaces the captured error messages, readable through
/// [`CatalogClient::error_messages`]. Calls are never retried.
#[derive(Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    errors: Mutex<Vec<String>>,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Self::with_http_client(http, base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            errors: Mutex::new(Vec::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Messages captured from the most recent failed call
    pub fn error_messages(&self) -> Vec<String> {
        self.lock_errors().clone()
    }

    pub fn clear_errors(&self) {
        self.lock_errors().clear();
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ClientError> {
        let url = self.url(CATEGORIES_PATH)?;
        self.fetch(self.http.get(url)).await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i32) -> Result<CategoryResponse, ClientError> {
        let url = self.url(&format!("{CATEGORIES_PATH}/{id}"))?;
        self.fetch(self.http.get(url)).await
    }

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: &CategoryInput,
    ) -> Result<CategoryResponse, ClientError> {
        let url = self.url(CATEGORIES_PATH)?;
        self.send_json(Method::POST, url, input).await
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: i32,
        input: &CategoryInput,
    ) -> Result<CategoryResponse, ClientError> {
        let url = self.url(&format!("{CATEGORIES_PATH}/{id}"))?;
        self.send_json(Method::PUT, url, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ClientError> {
        let url = self.url(&format!("{CATEGORIES_PATH}/{id}"))?;
        self.execute(self.http.delete(url)).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductResponse>, ClientError> {
        let url = self.url(PRODUCTS_PATH)?;
        self.fetch(self.http.get(url)).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> Result<ProductResponse, ClientError> {
        let url = self.url(&format!("{PRODUCTS_PATH}/{id}"))?;
        self.fetch(self.http.get(url)).await
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<ProductResponse, ClientError> {
        let url = self.url(PRODUCTS_PATH)?;
        self.send_json(Method::POST, url, input).await
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: i32,
        input: &ProductInput,
    ) -> Result<ProductResponse, ClientError> {
        let url = self.url(&format!("{PRODUCTS_PATH}/{id}"))?;
        self.send_json(Method::PUT, url, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ClientError> {
        let url = self.url(&format!("{PRODUCTS_PATH}/{id}"))?;
        self.execute(self.http.delete(url)).await.map(|_| ())
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| self.capture(ClientError::InvalidUrl(e)))
    }

    async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.http.request(method, url).json(body)).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.execute(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| self.capture(ClientError::Transport(e)))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.capture(ClientError::Transport(e)))?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "Catalog API responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let messages = messages_from_body(status, &body);
        warn!(status = %status, ?messages, "Catalog API call failed");
        Err(self.capture(ClientError::Api { status, messages }))
    }

    fn capture(&self, error: ClientError) -> ClientError {
        *self.lock_errors() = error.messages();
        error
    }

    fn lock_errors(&self) -> MutexGuard<'_, Vec<String>> {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Validation arrays win over the summary message; anything unparseable is
/// reported as the raw body, or the status text when the body is empty.
fn messages_from_body(status: StatusCode, body: &str) -> Vec<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return match parsed.errors {
            Some(errors) if !errors.is_empty() => errors,
            _ => vec![parsed.message],
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        vec![status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()]
    } else {
        vec![trimmed.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_take_precedence() {
        let body = r#"{"error":"Bad Request","message":"Validation failed","errors":["name: too short"],"timestamp":"2024-01-01T00:00:00Z"}"#;
        assert_eq!(
            messages_from_body(StatusCode::BAD_REQUEST, body),
            vec!["name: too short".to_string()]
        );
    }

    #[test]
    fn falls_back_to_message_then_raw_body() {
        let body = r#"{"error":"Not Found","message":"Product not found","timestamp":"2024-01-01T00:00:00Z"}"#;
        assert_eq!(
            messages_from_body(StatusCode::NOT_FOUND, body),
            vec!["Product not found".to_string()]
        );
        assert_eq!(
            messages_from_body(StatusCode::BAD_GATEWAY, " upstream down \n"),
            vec!["upstream down".to_string()]
        );
        assert_eq!(
            messages_from_body(StatusCode::SERVICE_UNAVAILABLE, ""),
            vec!["Service Unavailable".to_string()]
        );
    }

    #[test]
    fn base_url_keeps_its_path_prefix() {
        let client = CatalogClient::new("http://localhost:8080/catalog").unwrap();
        assert_eq!(
            client.url(PRODUCTS_PATH).unwrap().as_str(),
            "http://localhost:8080/catalog/api/products"
        );
        assert_eq!(
            client.url(&format!("{CATEGORIES_PATH}/3")).unwrap().as_str(),
            "http://localhost:8080/catalog/api/products/categories/3"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            CatalogClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
