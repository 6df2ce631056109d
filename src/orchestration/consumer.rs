//! # Order Queue Consumer
//!
//! Polling loop over the inbound order queue: receive a bounded batch,
//! decode each message, hand it to the orchestrator, and delete on
//! success. A message that fails decoding or orchestration is left on
//! the queue; the transport redelivers it after the visibility timeout.
//! One bad message never blocks the rest of its batch.
//!
//! The loop runs as a dedicated tokio task with an explicit shutdown
//! signal checked at each wait point; shutdown finishes the in-flight
//! batch before stopping so no acknowledgement is lost.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

use super::lifecycle::LifecycleOrchestrator;
use crate::config::ConsumerConfig;
use crate::error::{MessagingError, Result};
use crate::events::decode_inbound;
use crate::messaging::{InboundQueue, QueueMessage};

/// Consumes inbound order events and drives the lifecycle orchestrator.
#[derive(Clone)]
pub struct OrderConsumer {
    queue: Arc<dyn InboundQueue>,
    orchestrator: LifecycleOrchestrator,
    config: ConsumerConfig,
    running: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
}

impl OrderConsumer {
    pub fn new(
        queue: Arc<dyn InboundQueue>,
        orchestrator: LifecycleOrchestrator,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            queue,
            orchestrator,
            config,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_notify: Arc::new(Notify::new()),
        }
    }

    /// Run the polling loop until [`Self::shutdown`] is called.
    ///
    /// Message-level failures are logged and isolated; poll-level
    /// failures back off and re-poll. Neither crashes the loop.
    pub async fn run(&self) {
        self.running.store(true, Ordering::Release);
        info!(
            batch_size = self.config.batch_size,
            wait_time_seconds = self.config.wait_time_seconds,
            visibility_timeout_seconds = self.config.visibility_timeout_seconds,
            "Order consumer started"
        );

        while self.running.load(Ordering::Acquire) {
            match self.process_batch().await {
                Ok(processed_count) => {
                    if processed_count > 0 {
                        // Keep draining while the queue has work.
                        continue;
                    }
                    self.pause(Duration::from_millis(self.config.poll_interval_ms))
                        .await;
                }
                Err(e) => {
                    error!(error = %e, "Error polling order queue");
                    self.pause(Duration::from_millis(self.config.error_backoff_ms))
                        .await;
                }
            }
        }

        info!("Order consumer stopped");
    }

    /// Signal the loop to stop after its in-flight batch.
    pub fn shutdown(&self) {
        info!("Order consumer shutdown requested");
        self.running.store(false, Ordering::Release);
        self.shutdown_notify.notify_waiters();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Sleep that a shutdown signal can interrupt.
    async fn pause(&self, duration: Duration) {
        let shutdown = self.shutdown_notify.notified();
        tokio::pin!(shutdown);
        // Register interest before re-checking the flag so a signal
        // fired mid-batch is not lost.
        shutdown.as_mut().enable();
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        tokio::select! {
            _ = sleep(duration) => {}
            _ = &mut shutdown => {}
        }
    }

    /// Receive one batch and process its messages sequentially.
    /// Returns the number of successfully processed messages.
    async fn process_batch(&self) -> std::result::Result<usize, MessagingError> {
        let messages = self
            .queue
            .receive_batch(
                self.config.batch_size,
                Duration::from_secs(self.config.wait_time_seconds),
                Duration::from_secs(self.config.visibility_timeout_seconds),
            )
            .await?;

        if messages.is_empty() {
            return Ok(0);
        }

        debug!(message_count = messages.len(), "Processing message batch");

        let mut processed_count = 0;
        for message in messages {
            match self.process_message(&message).await {
                Ok(()) => {
                    if let Err(e) = self.queue.delete_message(message.message_id).await {
                        error!(
                            message_id = message.message_id,
                            error = %e,
                            "Failed to delete processed message"
                        );
                    } else {
                        debug!(message_id = message.message_id, "Message processed and deleted");
                        processed_count += 1;
                    }
                }
                Err(e) => {
                    // Left on the queue; the transport redelivers after
                    // the visibility timeout.
                    error!(
                        message_id = message.message_id,
                        error = %e,
                        "Failed to process message, leaving for redelivery"
                    );
                }
            }
        }

        Ok(processed_count)
    }

    #[instrument(skip(self, message), fields(message_id = message.message_id))]
    async fn process_message(&self, message: &QueueMessage) -> Result<()> {
        let order = decode_inbound(&message.body)?;
        self.orchestrator.handle_inbound_order(order).await?;
        Ok(())
    }
}
