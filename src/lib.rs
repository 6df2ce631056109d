#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Production Service
//!
//! Message-driven production lifecycle manager. Consumes order/payment
//! events from an inbound queue, tracks a production record through a
//! bounded status graph, and republishes lifecycle events to the
//! downstream order service.
//!
//! ## Architecture
//!
//! Data flow: inbound queue → [`orchestration::OrderConsumer`] →
//! [`events::codec`] → [`orchestration::LifecycleOrchestrator`] (dedup +
//! state transition) → [`store`] (persist) → [`events::EventPublisher`]
//! (emit) → outbound queue.
//!
//! The transport is at-least-once: messages that fail processing are
//! left for redelivery after a visibility timeout, and creation is
//! deduplicated by order id with a conditional write at the store layer.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Status enum and the legal transition graph
//! - [`models`] - The production entity
//! - [`events`] - Dual-format inbound decoding, outbound envelopes, publishing
//! - [`store`] - Persistence trait + in-memory reference implementation
//! - [`orchestration`] - Lifecycle orchestrator and queue consumer
//! - [`messaging`] - Queue transport traits + pgmq and in-memory adapters
//! - [`config`] - Typed, validated configuration
//! - [`error`] - Structured error handling

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod state_machine;
pub mod store;

pub use config::{ConsumerConfig, ProductionConfig, QueueConfig};
pub use error::{
    ConfigurationError, DecodeError, MessagingError, ProductionError, Result, StoreError,
    TransitionError,
};
pub use events::{decode_inbound, EventPublisher, InboundOrder, OutboundEvent};
pub use models::Production;
pub use orchestration::{LifecycleOrchestrator, OrderConsumer};
pub use state_machine::{can_transition, transition, ProductionStatus};
pub use store::{CreateOutcome, InMemoryProductionStore, ProductionStore};
