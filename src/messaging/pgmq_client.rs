//! # PostgreSQL Message Queue Adapter (pgmq-rs)
//!
//! [`InboundQueue`]/[`OutboundQueue`] adapter over the pgmq-rs crate.
//! The queue name is injected at construction; nothing in the core
//! hard-codes a destination. pgmq has no server-side long poll, so the
//! receive wait window is emulated by bounded re-polling.

use std::time::Duration;

use async_trait::async_trait;
use pgmq::PGMQueue;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use super::{InboundQueue, OutboundQueue, QueueMessage};
use crate::error::MessagingError;

/// Re-poll interval while emulating the receive wait window
const POLL_STEP: Duration = Duration::from_millis(250);

/// pgmq-backed queue client bound to a single queue
#[derive(Debug, Clone)]
pub struct PgmqQueueClient {
    pgmq: PGMQueue,
    queue_name: String,
}

impl PgmqQueueClient {
    /// Connect to pgmq and bind this client to `queue_name`.
    pub async fn new(database_url: &str, queue_name: &str) -> Result<Self, MessagingError> {
        info!(queue_name, "Connecting to pgmq");

        let pgmq = PGMQueue::new(database_url.to_string())
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "connect", e.to_string()))?;

        info!(queue_name, "Connected to pgmq");
        Ok(Self {
            pgmq,
            queue_name: queue_name.to_string(),
        })
    }

    /// Create the bound queue if it doesn't exist. Called once during
    /// startup wiring.
    pub async fn create_queue(&self) -> Result<(), MessagingError> {
        debug!(queue_name = %self.queue_name, "Creating queue");

        self.pgmq.create(&self.queue_name).await.map_err(|e| {
            MessagingError::queue_operation(&self.queue_name, "create", e.to_string())
        })?;

        info!(queue_name = %self.queue_name, "Queue ready");
        Ok(())
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    async fn read_once(
        &self,
        max_messages: i32,
        visibility_timeout: Duration,
    ) -> Result<Vec<QueueMessage>, MessagingError> {
        let vt = visibility_timeout.as_secs().min(i32::MAX as u64) as i32;
        let messages = self
            .pgmq
            .read_batch::<serde_json::Value>(&self.queue_name, Some(vt), max_messages)
            .await
            .map_err(|e| {
                MessagingError::queue_operation(&self.queue_name, "read_batch", e.to_string())
            })?
            .unwrap_or_default();

        Ok(messages
            .into_iter()
            .map(|m| QueueMessage {
                message_id: m.msg_id,
                body: m.message.to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl InboundQueue for PgmqQueueClient {
    async fn receive_batch(
        &self,
        max_messages: i32,
        wait: Duration,
        visibility_timeout: Duration,
    ) -> Result<Vec<QueueMessage>, MessagingError> {
        let deadline = Instant::now() + wait;
        loop {
            let messages = self.read_once(max_messages, visibility_timeout).await?;
            if !messages.is_empty() || Instant::now() >= deadline {
                debug!(
                    queue_name = %self.queue_name,
                    message_count = messages.len(),
                    "Receive window finished"
                );
                return Ok(messages);
            }
            sleep(POLL_STEP.min(deadline - Instant::now())).await;
        }
    }

    async fn delete_message(&self, message_id: i64) -> Result<(), MessagingError> {
        debug!(queue_name = %self.queue_name, message_id, "Deleting message");

        self.pgmq
            .delete(&self.queue_name, message_id)
            .await
            .map_err(|e| {
                MessagingError::queue_operation(&self.queue_name, "delete", e.to_string())
            })?;
        Ok(())
    }
}

#[async_trait]
impl OutboundQueue for PgmqQueueClient {
    async fn send(&self, body: &str) -> Result<i64, MessagingError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        let message_id = self
            .pgmq
            .send(&self.queue_name, &value)
            .await
            .map_err(|e| {
                MessagingError::queue_operation(&self.queue_name, "send", e.to_string())
            })?;

        debug!(queue_name = %self.queue_name, message_id, "Message sent");
        Ok(message_id)
    }
}
