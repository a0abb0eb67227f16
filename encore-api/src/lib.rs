//! API clients for the Encore backend
//!
//! One module per backend router. Each client is a thin request/response
//! handler returning results or errors, decoupled from any rendering.

use encore_core::{EncoreError, EncoreResult, ErrorContext};
use serde::de::DeserializeOwned;

pub mod auth;
pub mod courses;
pub mod marketplace;
pub mod schedule;
pub mod types;


pub use auth::AuthApi;
pub use courses::CoursesApi;
pub use marketplace::MarketplaceApi;
pub use schedule::ScheduleApi;
pub use types::*;

/// Configuration for API clients
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API (paths are resolved relative to it)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_seconds: 30,
            user_agent: "encore/0.1".to_string(),
        }
    }
}

impl ApiClientConfig {
    /// Configuration pointing at a specific backend
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Build a full request URL from a relative endpoint path
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl From<&encore_core::EncoreConfig> for ApiClientConfig {
    fn from(config: &encore_core::EncoreConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            timeout_seconds: config.api.timeout_seconds,
            user_agent: config.api.user_agent.clone(),
        }
    }
}

/// Facade bundling the per-router clients over one shared HTTP client
pub struct ApiClient {
    pub auth: AuthApi,
    pub courses: CoursesApi,
    pub marketplace: MarketplaceApi,
    pub schedule: ScheduleApi,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> EncoreResult<Self> {
        let client = create_http_client(&config)?;

        Ok(Self {
            auth: AuthApi::with_client(client.clone(), config.clone()),
            courses: CoursesApi::with_client(client.clone(), config.clone()),
            marketplace: MarketplaceApi::with_client(client.clone(), config.clone()),
            schedule: ScheduleApi::with_client(client, config),
        })
    }
}

/// Build the bearer + JSON content-type header map for authenticated calls
pub fn bearer_headers(token: &str) -> EncoreResult<reqwest::header::HeaderMap> {
    let mut headers = reqwest::header::HeaderMap::new();

    let auth_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| EncoreError::Validation {
            message: format!("Token is not a valid header value: {}", e),
            field: Some("token".to_string()),
            context: ErrorContext::new("api_client").with_operation("bearer_headers"),
        })?;
    headers.insert(reqwest::header::AUTHORIZATION, auth_value);
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    Ok(headers)
}

/// Helper function to create an HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiClientConfig) -> EncoreResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            EncoreError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| EncoreError::Config {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?;

    Ok(client)
}

/// Map a transport-level failure to a network error
pub(crate) fn transport_error(e: reqwest::Error, operation: &str) -> EncoreError {
    EncoreError::Network {
        message: format!("Request failed: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("api_client")
            .with_operation(operation)
            .with_suggestion("Check network connectivity and the configured base URL"),
    }
}

/// Error body shape used by the backend for every rejection
#[derive(Debug, serde::Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Extract the backend's `detail` message from a non-2xx response
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> EncoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorDetail>(&body)
        .map(|d| d.detail)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body
            }
        });

    EncoreError::Api {
        status: status.as_u16(),
        message,
        context: ErrorContext::new("api_client")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                401 => "Log in again to obtain a fresh token",
                403 => "Your role does not allow this operation",
                404 => "Resource not found on the backend",
                _ => "Check the backend status",
            }),
    }
}

/// Parse a successful JSON response body
pub(crate) async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> EncoreResult<T> {
    response.json().await.map_err(|e| EncoreError::Internal {
        message: format!("Failed to parse response body: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("api_client").with_operation(operation),
    })
}
