//! # System Constants
//!
//! Event names, envelope routing identifiers, and operational defaults
//! shared across the service.

/// Lifecycle event names on the wire
pub mod events {
    /// Inbound structured-envelope event that starts a production
    pub const PAYMENT_COMPLETED: &str = "payment-completed";

    /// Emitted on the transition into IN_PROGRESS
    pub const PRODUCTION_STARTED: &str = "production-started-event";
    /// Emitted on the transition into DONE
    pub const PRODUCTION_COMPLETED: &str = "production-completed-event";

    /// Event names advertised in every outbound envelope
    pub const ACCEPTED_EVENTS: [&str; 5] = [
        "payment-created-event",
        "payment-completed-event",
        "payment-failed-event",
        PRODUCTION_STARTED,
        PRODUCTION_COMPLETED,
    ];

    /// `meta.event_source` on every outbound envelope
    pub const EVENT_SOURCE: &str = "production-service";
    /// `meta.event_target` on every outbound envelope
    pub const EVENT_TARGET: &str = "order-service";
}

/// Default queue names; deployments override via configuration
pub mod queues {
    pub const DEFAULT_INBOUND_QUEUE: &str = "production_orders_queue";
    pub const DEFAULT_OUTBOUND_QUEUE: &str = "order_service_queue";
}

/// Advisory estimation: minutes of production time per ordered product
pub const MINUTES_PER_PRODUCT: u32 = 5;
