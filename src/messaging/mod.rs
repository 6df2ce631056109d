//! # Queue Transport Seam
//!
//! Narrow traits over the at-least-once message transport. The consumer
//! receives and acknowledges through [`InboundQueue`]; the publisher
//! emits through [`OutboundQueue`]. Adapters: [`pgmq_client::PgmqQueueClient`]
//! for the real transport, [`memory::InMemoryQueue`] for tests and local
//! runs.

pub mod memory;
pub mod pgmq_client;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::MessagingError;

pub use memory::InMemoryQueue;
pub use pgmq_client::PgmqQueueClient;

/// A raw message received from the inbound queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Transport-assigned id, used to acknowledge/delete
    pub message_id: i64,
    /// Raw JSON body, decoded by the event codec
    pub body: String,
}

/// Receive/acknowledge contract for the inbound order queue.
///
/// Semantics are at-least-once: a received message becomes invisible for
/// `visibility_timeout` and is redelivered unless deleted in time.
#[async_trait]
pub trait InboundQueue: Send + Sync {
    /// Long-poll receive of up to `max_messages`, waiting up to `wait`
    /// for the first message to arrive.
    async fn receive_batch(
        &self,
        max_messages: i32,
        wait: Duration,
        visibility_timeout: Duration,
    ) -> Result<Vec<QueueMessage>, MessagingError>;

    /// Acknowledge successful processing; the message will not be
    /// redelivered.
    async fn delete_message(&self, message_id: i64) -> Result<(), MessagingError>;
}

/// Send contract for the outbound lifecycle event queue.
#[async_trait]
pub trait OutboundQueue: Send + Sync {
    /// Enqueue a JSON body, returning the transport-assigned message id.
    async fn send(&self, body: &str) -> Result<i64, MessagingError>;
}
