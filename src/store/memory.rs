//! # In-Memory Production Store
//!
//! Reference [`ProductionStore`] backed by a primary map plus order-id
//! and status indexes, mirroring the table + OrderIdIndex + StatusIndex
//! layout of the external document store. Cross-index consistency
//! requires the single write lock; `create_if_absent` claims the order
//! index entry under it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{CreateOutcome, ProductionStore};
use crate::error::StoreError;
use crate::models::Production;
use crate::state_machine::ProductionStatus;

#[derive(Debug, Default)]
struct StoreInner {
    /// Primary table keyed by production id
    productions: HashMap<String, Production>,
    /// OrderIdIndex: order id -> production id
    order_index: HashMap<i64, String>,
    /// StatusIndex: status -> production ids (sorted by created_at at
    /// query time)
    status_index: HashMap<ProductionStatus, Vec<String>>,
}

impl StoreInner {
    fn upsert(&mut self, mut production: Production) -> Production {
        if production.id.is_empty() {
            production.id = Uuid::new_v4().to_string();
        }
        if production.created_at.is_none() {
            production.created_at = Some(Utc::now());
        }

        // Drop index entries for the previous version of this record.
        if let Some(previous) = self.productions.get(&production.id) {
            if let Some(ids) = self.status_index.get_mut(&previous.status) {
                ids.retain(|id| id != &production.id);
            }
            if self.order_index.get(&previous.order_id) == Some(&production.id) {
                self.order_index.remove(&previous.order_id);
            }
        }

        self.order_index
            .insert(production.order_id, production.id.clone());
        self.status_index
            .entry(production.status)
            .or_default()
            .push(production.id.clone());
        self.productions
            .insert(production.id.clone(), production.clone());
        production
    }

    fn by_status(&self, status: ProductionStatus) -> Vec<Production> {
        let mut records: Vec<Production> = self
            .status_index
            .get(&status)
            .into_iter()
            .flatten()
            .filter_map(|id| self.productions.get(id).cloned())
            .collect();
        records.sort_by_key(|p| p.created_at);
        records
    }
}

/// Thread-safe in-memory store shared across consumer tasks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductionStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryProductionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductionStore for InMemoryProductionStore {
    async fn save(&self, production: Production) -> Result<Production, StoreError> {
        let mut inner = self.inner.write();
        let saved = inner.upsert(production);
        debug!(production_id = %saved.id, order_id = saved.order_id, status = %saved.status, "Saved production");
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Production>, StoreError> {
        Ok(self.inner.read().productions.get(id).cloned())
    }

    async fn find_by_order_id(&self, order_id: i64) -> Result<Option<Production>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .order_index
            .get(&order_id)
            .and_then(|id| inner.productions.get(id))
            .cloned())
    }

    async fn find_by_status(
        &self,
        status: ProductionStatus,
    ) -> Result<Vec<Production>, StoreError> {
        Ok(self.inner.read().by_status(status))
    }

    async fn find_by_status_in(
        &self,
        statuses: &[ProductionStatus],
    ) -> Result<Vec<Production>, StoreError> {
        let inner = self.inner.read();
        let mut records = Vec::new();
        for status in statuses {
            records.extend(inner.by_status(*status));
        }
        Ok(records)
    }

    async fn count_by_status(&self, status: ProductionStatus) -> Result<usize, StoreError> {
        Ok(self
            .inner
            .read()
            .status_index
            .get(&status)
            .map_or(0, Vec::len))
    }

    async fn exists_by_order_id(&self, order_id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.read().order_index.contains_key(&order_id))
    }

    async fn create_if_absent(&self, production: Production) -> Result<CreateOutcome, StoreError> {
        let mut inner = self.inner.write();
        if let Some(existing) = inner
            .order_index
            .get(&production.order_id)
            .and_then(|id| inner.productions.get(id))
            .cloned()
        {
            debug!(order_id = production.order_id, existing_id = %existing.id, "Order already has a production");
            return Ok(CreateOutcome::AlreadyExists(existing));
        }
        let created = inner.upsert(production);
        Ok(CreateOutcome::Created(created))
    }

    async fn find_all(&self) -> Result<Vec<Production>, StoreError> {
        let mut records: Vec<Production> =
            self.inner.read().productions.values().cloned().collect();
        records.sort_by_key(|p| p.created_at);
        Ok(records)
    }
}
