//! Unified error handling
//!
//! Structured error types with context and recovery suggestions, shared by
//! the API client, the session manager and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type EncoreResult<T> = Result<T, EncoreError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the Encore client
#[derive(Error, Debug)]
pub enum EncoreError {
    /// Bad credentials, or a non-2xx response from the token endpoint.
    /// `message` carries the backend's `detail` text verbatim.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    /// Non-2xx response from the registration endpoint.
    #[error("Registration failed: {message}")]
    Registration {
        message: String,
        context: ErrorContext,
    },

    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// Any other non-2xx response from the backend.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl EncoreError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            EncoreError::Authentication { context, .. } => Some(context),
            EncoreError::Registration { context, .. } => Some(context),
            EncoreError::Network { context, .. } => Some(context),
            EncoreError::Api { context, .. } => Some(context),
            EncoreError::Storage { context, .. } => Some(context),
            EncoreError::Config { context, .. } => Some(context),
            EncoreError::Validation { context, .. } => Some(context),
            EncoreError::NotFound { context, .. } => Some(context),
            EncoreError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Check if error is recoverable by retrying the operation
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EncoreError::Network { .. })
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            EncoreError::Network { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Network error (may be recoverable)"
                );
            }
            EncoreError::Authentication { .. } | EncoreError::Registration { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Request rejected by backend"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! auth_error {
    ($msg:expr, $component:expr) => {
        EncoreError::Authentication {
            message: $msg.to_string(),
            context: ErrorContext::new($component)
                .with_suggestion("Check the email and password and try again"),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        EncoreError::Config {
            message: $msg.to_string(),
            source: None,
            context: ErrorContext::new($component)
                .with_suggestion("Check your configuration file"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        EncoreError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        EncoreError::NotFound {
            resource: $resource.to_string(),
            context: ErrorContext::new($component)
                .with_suggestion("Verify the resource id or URL"),
        }
    };
}
