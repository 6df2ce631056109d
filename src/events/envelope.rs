//! # Outbound Event Envelope
//!
//! Canonical envelope for lifecycle events emitted to the downstream
//! order service. Field names follow the cross-service event contract
//! (snake_case meta keys, `accepted_events` advertisement).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::events;

/// Routing and identity metadata carried on every outbound event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMeta {
    /// Fresh random id per emitted event
    pub event_id: String,
    /// Emission time, RFC 3339 on the wire
    pub event_date: DateTime<Utc>,
    pub event_target: String,
    pub event_source: String,
    pub event_name: String,
}

impl EventMeta {
    /// Metadata for an event emitted by this service toward the order
    /// service.
    pub fn for_production(event_name: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            event_date: Utc::now(),
            event_target: events::EVENT_TARGET.to_string(),
            event_source: events::EVENT_SOURCE.to_string(),
            event_name: event_name.into(),
        }
    }
}

/// Outbound lifecycle event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub accepted_events: Vec<String>,
    pub meta: EventMeta,
    pub payload: serde_json::Value,
}

impl OutboundEvent {
    /// Wrap an event-specific payload in the canonical envelope.
    pub fn production_event(event_name: &str, payload: serde_json::Value) -> Self {
        Self {
            accepted_events: events::ACCEPTED_EVENTS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            meta: EventMeta::for_production(event_name),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let event = OutboundEvent::production_event(
            events::PRODUCTION_STARTED,
            serde_json::json!({"orderId": 123}),
        );

        assert_eq!(event.accepted_events.len(), 5);
        assert_eq!(event.meta.event_source, "production-service");
        assert_eq!(event.meta.event_target, "order-service");
        assert_eq!(event.meta.event_name, "production-started-event");
        assert!(!event.meta.event_id.is_empty());

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("accepted_events").is_some());
        assert!(json["meta"].get("event_id").is_some());
        assert!(json["meta"].get("event_date").is_some());
        assert_eq!(json["payload"]["orderId"], 123);
    }

    #[test]
    fn test_event_ids_are_fresh_per_call() {
        let a = EventMeta::for_production(events::PRODUCTION_STARTED);
        let b = EventMeta::for_production(events::PRODUCTION_STARTED);
        assert_ne!(a.event_id, b.event_id);
    }
}
