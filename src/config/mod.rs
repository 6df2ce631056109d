//! # Service Configuration
//!
//! Typed configuration with explicit validation. Every tuning knob the
//! consumer and publisher need is an explicit value here; nothing in
//! the core hard-codes a queue name or destination. Loading (TOML file
//! layered under `PRODUCTION__` environment variables) lives in
//! [`loader`].

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::constants::queues;
use crate::error::ConfigurationError;

pub use loader::load as load_config;

/// Root configuration for the production service
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProductionConfig {
    /// Queue names and transport connection settings
    pub queues: QueueConfig,

    /// Consumer loop tuning
    pub consumer: ConsumerConfig,
}

/// Queue transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Connection string for the pgmq-backed transport
    pub database_url: String,

    /// Queue the consumer polls for inbound order events
    pub inbound_queue: String,

    /// Queue lifecycle events are published to
    pub outbound_queue: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/production_service".to_string(),
            inbound_queue: queues::DEFAULT_INBOUND_QUEUE.to_string(),
            outbound_queue: queues::DEFAULT_OUTBOUND_QUEUE.to_string(),
        }
    }
}

/// Consumer polling loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Maximum messages received per poll
    pub batch_size: i32,

    /// Receive wait window in seconds (long-poll emulation)
    pub wait_time_seconds: u64,

    /// How long a received message stays hidden before redelivery.
    /// Must exceed the expected processing time of a full batch.
    pub visibility_timeout_seconds: u64,

    /// Sleep between polls when a batch came back empty
    pub poll_interval_ms: u64,

    /// Longer backoff applied after a poll-level transport error
    pub error_backoff_ms: u64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            wait_time_seconds: 5,
            visibility_timeout_seconds: 30,
            poll_interval_ms: 1000,
            error_backoff_ms: 5000,
        }
    }
}

impl ProductionConfig {
    /// Validate cross-field constraints. Called after loading; an
    /// invalid configuration never reaches the consumer.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.queues.inbound_queue.is_empty() {
            return Err(ConfigurationError::invalid(
                "queues.inbound_queue",
                "queue name must not be empty",
            ));
        }
        if self.queues.outbound_queue.is_empty() {
            return Err(ConfigurationError::invalid(
                "queues.outbound_queue",
                "queue name must not be empty",
            ));
        }
        if self.consumer.batch_size <= 0 {
            return Err(ConfigurationError::invalid(
                "consumer.batch_size",
                "batch size must be positive",
            ));
        }
        if self.consumer.visibility_timeout_seconds <= self.consumer.wait_time_seconds {
            return Err(ConfigurationError::invalid(
                "consumer.visibility_timeout_seconds",
                "visibility timeout must exceed the receive wait window",
            ));
        }
        Ok(())
    }
}
