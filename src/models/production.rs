//! # Production Entity
//!
//! The tracked unit of fulfillment work created in response to one
//! upstream order. Mutated only through the state machine's
//! [`transition`](crate::state_machine::transition) operation; never
//! deleted by this service (deletion is an external administrative
//! operation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MINUTES_PER_PRODUCT;
use crate::state_machine::ProductionStatus;

/// A production record, persisted by the [`ProductionStore`](crate::store::ProductionStore).
///
/// Wire representation is camelCase to match the upstream order service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    /// Opaque unique identifier, generated at creation, immutable
    pub id: String,
    /// Identifier of the upstream order; at most one non-cancelled
    /// production may exist per order id
    pub order_id: i64,
    /// Ordered item identifiers from the originating order
    pub product_ids: Vec<i64>,
    pub status: ProductionStatus,
    /// Set at creation, immutable
    pub started_at: DateTime<Utc>,
    /// Stamped exactly once, the first time status becomes terminal
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Advisory estimate in minutes, derived from the item count
    pub estimated_time: u32,
    /// Sortable creation marker used as the status index sort key;
    /// stamped by the store on first save if absent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Production {
    /// Build a fresh production in the initial `PENDING` state with a
    /// generated id and a derived time estimate.
    pub fn new(order_id: i64, product_ids: Vec<i64>) -> Self {
        let estimated_time = estimated_minutes(product_ids.len());
        Self {
            id: Uuid::new_v4().to_string(),
            order_id,
            product_ids,
            status: ProductionStatus::Pending,
            started_at: Utc::now(),
            finished_at: None,
            estimated_time,
            created_at: None,
        }
    }

    /// True once the production has reached DONE, ERROR, or CANCELLED
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Simple estimation: a fixed number of minutes per ordered product.
pub fn estimated_minutes(product_count: usize) -> u32 {
    product_count as u32 * MINUTES_PER_PRODUCT
}
