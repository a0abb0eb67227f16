//! Unified logging system
//!
//! Structured logging with configurable format and filtering.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (pretty, compact)
    pub format: LogFormat,
    /// Whether to include file and line information
    pub include_location: bool,
    /// Custom filter directives
    pub filter_directives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Pretty,
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            include_location: false,
            filter_directives: vec![
                "encore_core=debug".to_string(),
                "encore_api=debug".to_string(),
                "encore_session=debug".to_string(),
            ],
        }
    }
}

/// Initialize the logging system
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    for directive in &config.filter_directives {
        filter = filter.add_directive(directive.parse()?);
    }

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            registry.with(fmt_layer).init();
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            registry.with(fmt_layer).init();
        }
    }

    Ok(())
}

/// Logging macros for common patterns
#[macro_export]
macro_rules! log_operation_start {
    ($operation:expr) => {
        tracing::info!(operation = $operation, "Starting operation");
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::info!(operation = $operation, $($field)*, "Starting operation");
    };
}

#[macro_export]
macro_rules! log_operation_success {
    ($operation:expr) => {
        tracing::info!(operation = $operation, "Operation completed successfully");
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::info!(operation = $operation, $($field)*, "Operation completed successfully");
    };
}

#[macro_export]
macro_rules! log_operation_error {
    ($operation:expr, $error:expr) => {
        tracing::error!(operation = $operation, error = %$error, "Operation failed");
    };
}
