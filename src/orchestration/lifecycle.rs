//! # Lifecycle Orchestrator
//!
//! Creates productions for accepted inbound orders and advances them
//! through the status graph. Creation is idempotent at the store layer:
//! a duplicate delivery for an already-tracked order is a success-no-op.
//!
//! Publish points: nothing is published at creation/PREPARING;
//! `production-started-event` goes out on the transition into
//! IN_PROGRESS and `production-completed-event` on the transition into
//! DONE.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{ProductionError, Result};
use crate::events::{EventPublisher, InboundOrder};
use crate::models::Production;
use crate::state_machine::{transition, ProductionStatus};
use crate::store::{CreateOutcome, ProductionStore};

/// Orchestrates production creation and status advancement.
#[derive(Clone)]
pub struct LifecycleOrchestrator {
    store: Arc<dyn ProductionStore>,
    publisher: EventPublisher,
}

impl LifecycleOrchestrator {
    pub fn new(store: Arc<dyn ProductionStore>, publisher: EventPublisher) -> Self {
        Self { store, publisher }
    }

    /// Accept an inbound order event.
    ///
    /// Creates a PENDING production through the store's conditional
    /// write and immediately moves it to PREPARING. A duplicate
    /// delivery returns the existing record untouched.
    #[instrument(skip(self, order), fields(order_id = order.order_id))]
    pub async fn handle_inbound_order(&self, order: InboundOrder) -> Result<Production> {
        let production = Production::new(order.order_id, order.product_ids);

        let mut production = match self.store.create_if_absent(production).await? {
            CreateOutcome::AlreadyExists(existing) => {
                warn!(
                    order_id = existing.order_id,
                    production_id = %existing.id,
                    "Production already exists for order, treating as duplicate delivery"
                );
                return Ok(existing);
            }
            CreateOutcome::Created(created) => {
                info!(
                    order_id = created.order_id,
                    production_id = %created.id,
                    estimated_time = created.estimated_time,
                    "Created production"
                );
                created
            }
        };

        transition(&mut production, ProductionStatus::Preparing)?;
        let production = self.store.save(production).await?;

        info!(
            order_id = production.order_id,
            production_id = %production.id,
            status = %production.status,
            "Production moved to preparation"
        );
        Ok(production)
    }

    /// Advance a production to `new_status`, persisting the result and
    /// publishing the corresponding lifecycle event where one exists.
    #[instrument(skip(self))]
    pub async fn advance_status(
        &self,
        production_id: &str,
        new_status: ProductionStatus,
    ) -> Result<Production> {
        let mut production = self
            .store
            .find_by_id(production_id)
            .await?
            .ok_or_else(|| ProductionError::not_found(production_id))?;

        transition(&mut production, new_status)?;
        let production = self.store.save(production).await?;

        info!(
            production_id = %production.id,
            order_id = production.order_id,
            status = %production.status,
            "Production status advanced"
        );

        match new_status {
            ProductionStatus::InProgress => {
                self.publisher.publish_production_started(&production).await;
            }
            ProductionStatus::Done => {
                self.publisher
                    .publish_production_completed(&production)
                    .await;
            }
            _ => {}
        }

        Ok(production)
    }

    // Read facade consumed by the REST layer.

    pub async fn get(&self, production_id: &str) -> Result<Production> {
        self.store
            .find_by_id(production_id)
            .await?
            .ok_or_else(|| ProductionError::not_found(production_id))
    }

    pub async fn find_by_order_id(&self, order_id: i64) -> Result<Option<Production>> {
        Ok(self.store.find_by_order_id(order_id).await?)
    }

    pub async fn find_by_status(&self, status: ProductionStatus) -> Result<Vec<Production>> {
        Ok(self.store.find_by_status(status).await?)
    }

    pub async fn find_by_status_in(
        &self,
        statuses: &[ProductionStatus],
    ) -> Result<Vec<Production>> {
        Ok(self.store.find_by_status_in(statuses).await?)
    }

    pub async fn count_by_status(&self, status: ProductionStatus) -> Result<usize> {
        Ok(self.store.count_by_status(status).await?)
    }

    /// Per-status record counts across every status, for the
    /// operational stats endpoint.
    pub async fn status_counts(&self) -> Result<HashMap<ProductionStatus, usize>> {
        let mut counts = HashMap::with_capacity(ProductionStatus::ALL.len());
        for status in ProductionStatus::ALL {
            counts.insert(status, self.store.count_by_status(status).await?);
        }
        Ok(counts)
    }

    pub async fn find_all(&self) -> Result<Vec<Production>> {
        Ok(self.store.find_all().await?)
    }
}
