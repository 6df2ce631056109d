//! # Error Types
//!
//! Structured error handling for the production service using thiserror
//! for typed errors instead of `Box<dyn Error>` patterns. Each concern
//! has its own type; [`ProductionError`] aggregates them at the crate
//! boundary.

use thiserror::Error;

use crate::state_machine::ProductionStatus;

/// A message body that could not be decoded by either inbound format.
///
/// Non-retryable as-is, but the message is left on the queue for
/// redelivery: a deploy may fix the consumer's parsing, and dead-letter
/// routing after N redeliveries is the transport's job, not ours.
#[derive(Error, Debug)]
#[error("Failed to decode inbound message ({reason}): {body}")]
pub struct DecodeError {
    /// The raw message body, carried so nothing is silently dropped
    pub body: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(body: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            reason: reason.into(),
        }
    }
}

/// An illegal status transition was requested.
///
/// Fatal for the triggering operation: it signals a logic bug or a
/// duplicate/out-of-order event, never a transient fault.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Illegal status transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: ProductionStatus,
    pub to: ProductionStatus,
}

/// A storage backend failure, tagged with the operation and key.
///
/// Never retried internally; retry belongs to the consumer via message
/// redelivery.
#[derive(Error, Debug)]
#[error("Store operation {operation} failed for key {key}: {message}")]
pub struct StoreError {
    pub operation: String,
    pub key: String,
    pub message: String,
}

impl StoreError {
    pub fn new(
        operation: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Queue transport error types
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Queue operation failed: {queue_name}: {operation}: {message}")]
    QueueOperation {
        queue_name: String,
        operation: String,
        message: String,
    },

    #[error("Message serialization error: {message}")]
    MessageSerialization { message: String },

    #[error("Message deserialization error: {message}")]
    MessageDeserialization { message: String },
}

impl MessagingError {
    /// Create a queue operation error
    pub fn queue_operation(
        queue_name: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::QueueOperation {
            queue_name: queue_name.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a message serialization error
    pub fn message_serialization(message: impl Into<String>) -> Self {
        Self::MessageSerialization {
            message: message.into(),
        }
    }

    /// Create a message deserialization error
    pub fn message_deserialization(message: impl Into<String>) -> Self {
        Self::MessageDeserialization {
            message: message.into(),
        }
    }
}

/// Conversion from serde_json::Error to MessagingError
impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            MessagingError::message_deserialization(err.to_string())
        } else {
            MessagingError::message_serialization(err.to_string())
        }
    }
}

/// Conversion from pgmq::errors::PgmqError to MessagingError
impl From<pgmq::errors::PgmqError> for MessagingError {
    fn from(err: pgmq::errors::PgmqError) -> Self {
        MessagingError::queue_operation("unknown", "pgmq", err.to_string())
    }
}

/// Invalid or unloadable configuration
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {message}")]
    Load { message: String },

    #[error("Invalid configuration: {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigurationError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(err: config::ConfigError) -> Self {
        ConfigurationError::load(err.to_string())
    }
}

/// Crate-wide error aggregation
#[derive(Error, Debug)]
pub enum ProductionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Unknown production id; maps to a 404-equivalent at the API layer
    #[error("Production not found: {id}")]
    NotFound { id: String },
}

impl ProductionError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Result type alias for production service operations
pub type Result<T> = std::result::Result<T, ProductionError>;
