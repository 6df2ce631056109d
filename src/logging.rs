//! # Structured Logging
//!
//! Environment-aware tracing setup: compact console output in
//! development, JSON in production, `RUST_LOG` always wins.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize tracing with environment-specific configuration.
/// Idempotent; safe to call from tests and the binary alike.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_log_level(&environment)));

        let subscriber = tracing_subscriber::registry();

        // Use try_init to avoid panic if a global subscriber is already set
        let init_result = if environment == "production" {
            subscriber
                .with(fmt::layer().json().with_target(true).with_filter(filter))
                .try_init()
        } else {
            subscriber
                .with(fmt::layer().compact().with_target(true).with_filter(filter))
                .try_init()
        };

        if init_result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(environment = %environment, "Logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("PRODUCTION_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get default log level based on environment
fn default_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}
