//! # Production Store
//!
//! Persistence seam for production records: key-value by id with
//! secondary lookups by order id and by status. Real deployments back
//! this with an external document store; [`memory::InMemoryProductionStore`]
//! is the reference implementation and the test double.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Production;
use crate::state_machine::ProductionStatus;

pub use memory::InMemoryProductionStore;

/// Result of a conditional creation keyed by order id
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// No production existed for the order id; this one was persisted
    Created(Production),
    /// A production already existed; nothing was written
    AlreadyExists(Production),
}

/// Storage contract for production records.
///
/// Backend failures surface as [`StoreError`] with the operation name
/// and key; the store never retries internally — retry belongs to the
/// consumer via message redelivery.
#[async_trait]
pub trait ProductionStore: Send + Sync {
    /// Upsert by id, last-writer-wins. Assigns an id if the record
    /// carries an empty one and stamps `created_at` if absent.
    async fn save(&self, production: Production) -> Result<Production, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Production>, StoreError>;

    /// Unique-ish secondary lookup; an indexed query, never a scan.
    async fn find_by_order_id(&self, order_id: i64) -> Result<Option<Production>, StoreError>;

    /// All productions in a status, ordered by `created_at`.
    async fn find_by_status(
        &self,
        status: ProductionStatus,
    ) -> Result<Vec<Production>, StoreError>;

    /// Union of indexed status queries, preserving per-status
    /// `created_at` order.
    async fn find_by_status_in(
        &self,
        statuses: &[ProductionStatus],
    ) -> Result<Vec<Production>, StoreError>;

    async fn count_by_status(&self, status: ProductionStatus) -> Result<usize, StoreError>;

    /// `find_by_order_id(..).is_some()`. NOT atomic with a subsequent
    /// `save`; the check-then-act pair has a known duplicate-creation
    /// race under concurrent consumers. Use [`Self::create_if_absent`]
    /// for race-free creation.
    async fn exists_by_order_id(&self, order_id: i64) -> Result<bool, StoreError>;

    /// Conditional write keyed by `order_id`, resolved atomically at the
    /// store layer. The orchestrator's creation path.
    async fn create_if_absent(&self, production: Production) -> Result<CreateOutcome, StoreError>;

    /// Full scan, for operational/reporting use only; not on any hot
    /// path.
    async fn find_all(&self) -> Result<Vec<Production>, StoreError>;
}
