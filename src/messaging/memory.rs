//! # In-Memory Queue
//!
//! Queue adapter with real visibility-timeout semantics: a received
//! message is hidden for the timeout window and redelivered afterwards
//! unless deleted. Backs the consumer tests and local runs without a
//! database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{sleep, Instant};

use super::{InboundQueue, OutboundQueue, QueueMessage};
use crate::error::MessagingError;

const POLL_STEP: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
struct StoredMessage {
    id: i64,
    body: String,
    visible_at: Instant,
}

#[derive(Debug, Default)]
struct QueueInner {
    messages: Vec<StoredMessage>,
    next_id: i64,
}

/// In-memory inbound/outbound queue for tests and the reference binary.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQueue {
    inner: Arc<Mutex<QueueInner>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message body, immediately visible.
    pub fn push(&self, body: impl Into<String>) -> i64 {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.messages.push(StoredMessage {
            id,
            body: body.into(),
            visible_at: Instant::now(),
        });
        id
    }

    /// Number of messages still on the queue, visible or not.
    pub fn len(&self) -> usize {
        self.inner.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every body currently on the queue, in arrival order. Test hook
    /// for asserting on published events.
    pub fn sent_bodies(&self) -> Vec<String> {
        self.inner
            .lock()
            .messages
            .iter()
            .map(|m| m.body.clone())
            .collect()
    }

    fn take_visible(
        &self,
        max_messages: i32,
        visibility_timeout: Duration,
    ) -> Vec<QueueMessage> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let mut received = Vec::new();
        for message in inner.messages.iter_mut() {
            if received.len() >= max_messages as usize {
                break;
            }
            if message.visible_at <= now {
                message.visible_at = now + visibility_timeout;
                received.push(QueueMessage {
                    message_id: message.id,
                    body: message.body.clone(),
                });
            }
        }
        received
    }
}

#[async_trait]
impl InboundQueue for InMemoryQueue {
    async fn receive_batch(
        &self,
        max_messages: i32,
        wait: Duration,
        visibility_timeout: Duration,
    ) -> Result<Vec<QueueMessage>, MessagingError> {
        let deadline = Instant::now() + wait;
        loop {
            let messages = self.take_visible(max_messages, visibility_timeout);
            if !messages.is_empty() || Instant::now() >= deadline {
                return Ok(messages);
            }
            sleep(POLL_STEP).await;
        }
    }

    async fn delete_message(&self, message_id: i64) -> Result<(), MessagingError> {
        let mut inner = self.inner.lock();
        let before = inner.messages.len();
        inner.messages.retain(|m| m.id != message_id);
        if inner.messages.len() == before {
            return Err(MessagingError::queue_operation(
                "in-memory",
                "delete",
                format!("message {message_id} not found"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OutboundQueue for InMemoryQueue {
    async fn send(&self, body: &str) -> Result<i64, MessagingError> {
        Ok(self.push(body))
    }
}
