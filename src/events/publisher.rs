//! # Lifecycle Event Publisher
//!
//! Builds outbound lifecycle events and emits them to the configured
//! downstream queue, best-effort. A publish failure is logged and
//! swallowed: the persisted state change that triggered it has already
//! succeeded, so callers must never treat the emit as fatal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::constants::events;
use crate::error::MessagingError;
use crate::events::envelope::OutboundEvent;
use crate::messaging::OutboundQueue;
use crate::models::Production;
use crate::state_machine::ProductionStatus;

/// Transition-relevant fields carried in lifecycle event payloads
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductionEventPayload<'a> {
    order_id: i64,
    production_id: &'a str,
    status: ProductionStatus,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

/// Emits production lifecycle events to the downstream order service.
#[derive(Clone)]
pub struct EventPublisher {
    queue: Arc<dyn OutboundQueue>,
}

impl EventPublisher {
    pub fn new(queue: Arc<dyn OutboundQueue>) -> Self {
        Self { queue }
    }

    /// Emit `production-started-event` for a production that just
    /// entered IN_PROGRESS.
    pub async fn publish_production_started(&self, production: &Production) {
        let payload = ProductionEventPayload {
            order_id: production.order_id,
            production_id: &production.id,
            status: production.status,
            started_at: production.started_at,
            estimated_time: Some(production.estimated_time),
            completed_at: None,
        };
        self.publish(events::PRODUCTION_STARTED, production.order_id, payload)
            .await;
    }

    /// Emit `production-completed-event` for a production that just
    /// entered DONE.
    pub async fn publish_production_completed(&self, production: &Production) {
        let payload = ProductionEventPayload {
            order_id: production.order_id,
            production_id: &production.id,
            status: production.status,
            started_at: production.started_at,
            estimated_time: None,
            completed_at: production.finished_at,
        };
        self.publish(events::PRODUCTION_COMPLETED, production.order_id, payload)
            .await;
    }

    async fn publish(&self, event_name: &str, order_id: i64, payload: ProductionEventPayload<'_>) {
        match self.try_publish(event_name, payload).await {
            Ok(()) => {
                info!(event_name, order_id, "Published lifecycle event");
            }
            Err(e) => {
                // Best-effort: the state change already persisted.
                error!(event_name, order_id, error = %e, "Failed to publish lifecycle event");
            }
        }
    }

    async fn try_publish(
        &self,
        event_name: &str,
        payload: ProductionEventPayload<'_>,
    ) -> Result<(), MessagingError> {
        let payload = serde_json::to_value(&payload)?;
        let event = OutboundEvent::production_event(event_name, payload);
        let body = serde_json::to_string(&event)?;
        let message_id = self.queue.send(&body).await?;
        debug!(event_name, message_id, "Lifecycle event enqueued");
        Ok(())
    }
}
