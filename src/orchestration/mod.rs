//! Lifecycle orchestration and the inbound queue consumer.

pub mod consumer;
pub mod lifecycle;

pub use consumer::OrderConsumer;
pub use lifecycle::LifecycleOrchestrator;
