//! Domain entities.

pub mod production;

pub use production::{estimated_minutes, Production};
