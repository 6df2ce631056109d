//! End-to-end orchestrator tests: idempotent creation, status
//! advancement, and the publish points for lifecycle events.

use std::sync::Arc;

use production_service::error::ProductionError;
use production_service::events::{decode_inbound, EventPublisher};
use production_service::messaging::InMemoryQueue;
use production_service::orchestration::LifecycleOrchestrator;
use production_service::state_machine::ProductionStatus;
use production_service::store::{InMemoryProductionStore, ProductionStore};

fn orchestrator() -> (LifecycleOrchestrator, Arc<InMemoryProductionStore>, Arc<InMemoryQueue>) {
    let store = Arc::new(InMemoryProductionStore::new());
    let outbound = Arc::new(InMemoryQueue::new());
    let publisher = EventPublisher::new(outbound.clone());
    let orchestrator = LifecycleOrchestrator::new(store.clone(), publisher);
    (orchestrator, store, outbound)
}

#[tokio::test]
async fn inbound_order_creates_a_preparing_production() {
    let (orchestrator, store, outbound) = orchestrator();

    let order = decode_inbound(r#"{"orderId": 555, "productIds": [9, 10]}"#).unwrap();
    let production = orchestrator.handle_inbound_order(order).await.unwrap();

    assert_eq!(production.order_id, 555);
    assert_eq!(production.status, ProductionStatus::Preparing);
    assert_eq!(production.estimated_time, 10);
    assert!(production.created_at.is_some());

    // The persisted record matches what was returned.
    let persisted = store.find_by_order_id(555).await.unwrap().unwrap();
    assert_eq!(persisted, production);

    // Nothing is published at creation; the started event belongs to
    // the IN_PROGRESS transition.
    assert!(outbound.is_empty());
}

#[tokio::test]
async fn duplicate_delivery_is_a_success_no_op() {
    let (orchestrator, store, _outbound) = orchestrator();

    let order = decode_inbound(r#"{"orderId": 555, "productIds": [9, 10]}"#).unwrap();
    let first = orchestrator.handle_inbound_order(order.clone()).await.unwrap();
    let second = orchestrator.handle_inbound_order(order).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(store.find_all().await.unwrap().len(), 1);
    // The existing record keeps its advanced status.
    assert_eq!(second.status, ProductionStatus::Preparing);
}

#[tokio::test]
async fn full_lifecycle_publishes_started_and_completed_events() {
    let (orchestrator, _store, outbound) = orchestrator();

    let order = decode_inbound(r#"{"orderId": 555, "productIds": [9, 10]}"#).unwrap();
    let production = orchestrator.handle_inbound_order(order).await.unwrap();

    let production = orchestrator
        .advance_status(&production.id, ProductionStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(production.status, ProductionStatus::InProgress);

    let sent = outbound.sent_bodies();
    assert_eq!(sent.len(), 1);
    let started: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
    assert_eq!(started["meta"]["event_name"], "production-started-event");
    assert_eq!(started["payload"]["orderId"], 555);
    assert_eq!(started["payload"]["status"], "IN_PROGRESS");
    assert_eq!(started["payload"]["estimatedTime"], 10);

    let production = orchestrator
        .advance_status(&production.id, ProductionStatus::Done)
        .await
        .unwrap();
    assert!(production.finished_at.is_some());

    let sent = outbound.sent_bodies();
    assert_eq!(sent.len(), 2);
    let completed: serde_json::Value = serde_json::from_str(&sent[1]).unwrap();
    assert_eq!(completed["meta"]["event_name"], "production-completed-event");
    assert_eq!(completed["payload"]["status"], "DONE");
    assert!(completed["payload"].get("completedAt").is_some());

    // A terminal production accepts no further advancement.
    let err = orchestrator
        .advance_status(&production.id, ProductionStatus::InProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, ProductionError::Transition(_)));
    // ...and no event was published for the rejected attempt.
    assert_eq!(outbound.sent_bodies().len(), 2);
}

#[tokio::test]
async fn intermediate_transitions_publish_nothing() {
    let (orchestrator, _store, outbound) = orchestrator();

    let order = decode_inbound(r#"{"orderId": 1, "productIds": [1]}"#).unwrap();
    let production = orchestrator.handle_inbound_order(order).await.unwrap();

    orchestrator
        .advance_status(&production.id, ProductionStatus::Cancelled)
        .await
        .unwrap();

    assert!(outbound.is_empty());
}

#[tokio::test]
async fn advance_status_for_unknown_id_is_not_found() {
    let (orchestrator, _store, _outbound) = orchestrator();

    let err = orchestrator
        .advance_status("no-such-id", ProductionStatus::InProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, ProductionError::NotFound { .. }));
}

#[tokio::test]
async fn read_facade_exposes_counts_and_lookups() {
    let (orchestrator, _store, _outbound) = orchestrator();

    for order_id in 1..=3 {
        let order = decode_inbound(&format!(r#"{{"orderId": {order_id}, "productIds": [1]}}"#))
            .unwrap();
        orchestrator.handle_inbound_order(order).await.unwrap();
    }

    assert_eq!(
        orchestrator
            .count_by_status(ProductionStatus::Preparing)
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        orchestrator
            .find_by_status(ProductionStatus::Preparing)
            .await
            .unwrap()
            .len(),
        3
    );

    let counts = orchestrator.status_counts().await.unwrap();
    assert_eq!(counts[&ProductionStatus::Preparing], 3);
    assert_eq!(counts[&ProductionStatus::Pending], 0);
    assert_eq!(counts.len(), ProductionStatus::ALL.len());

    let production = orchestrator.find_by_order_id(2).await.unwrap().unwrap();
    assert_eq!(orchestrator.get(&production.id).await.unwrap(), production);
    assert_eq!(orchestrator.find_all().await.unwrap().len(), 3);
}
