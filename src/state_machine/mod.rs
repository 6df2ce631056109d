//! Production status definitions and the legal transition graph.

pub mod machine;
pub mod states;

pub use machine::{can_transition, transition};
pub use states::ProductionStatus;
