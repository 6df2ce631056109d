//! Inbound decoding, outbound envelopes, and lifecycle event emission.

pub mod codec;
pub mod envelope;
pub mod publisher;

pub use codec::{decode_inbound, InboundOrder};
pub use envelope::{EventMeta, OutboundEvent};
pub use publisher::EventPublisher;
