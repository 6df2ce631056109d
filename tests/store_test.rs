//! Tests for the in-memory production store: indexes, ordering, and
//! the conditional-create path versus the check-then-act race.

use std::sync::Arc;

use futures::future::join_all;

use production_service::models::Production;
use production_service::state_machine::ProductionStatus;
use production_service::store::{CreateOutcome, InMemoryProductionStore, ProductionStore};

#[tokio::test]
async fn save_then_find_by_id_and_order_id() {
    let store = InMemoryProductionStore::new();
    let saved = store.save(Production::new(100, vec![1, 2])).await.unwrap();

    let by_id = store.find_by_id(&saved.id).await.unwrap().unwrap();
    assert_eq!(by_id, saved);

    let by_order = store.find_by_order_id(100).await.unwrap().unwrap();
    assert_eq!(by_order.id, saved.id);

    assert!(store.find_by_id("no-such-id").await.unwrap().is_none());
    assert!(store.find_by_order_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn save_is_an_upsert_last_writer_wins() {
    let store = InMemoryProductionStore::new();
    let mut p = store.save(Production::new(1, vec![1])).await.unwrap();

    p.status = ProductionStatus::Preparing;
    store.save(p.clone()).await.unwrap();
    p.status = ProductionStatus::InProgress;
    store.save(p.clone()).await.unwrap();

    let found = store.find_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(found.status, ProductionStatus::InProgress);
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn find_by_status_orders_by_created_at() {
    let store = InMemoryProductionStore::new();
    let first = store.save(Production::new(1, vec![1])).await.unwrap();
    let second = store.save(Production::new(2, vec![1])).await.unwrap();
    let third = store.save(Production::new(3, vec![1])).await.unwrap();

    let pending = store
        .find_by_status(ProductionStatus::Pending)
        .await
        .unwrap();
    let ids: Vec<&str> = pending.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![&first.id, &second.id, &third.id]);

    assert_eq!(
        store
            .count_by_status(ProductionStatus::Pending)
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        store.count_by_status(ProductionStatus::Done).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn find_by_status_in_unions_indexed_queries() {
    let store = InMemoryProductionStore::new();
    let mut a = store.save(Production::new(1, vec![1])).await.unwrap();
    a.status = ProductionStatus::Preparing;
    store.save(a).await.unwrap();

    let mut b = store.save(Production::new(2, vec![1])).await.unwrap();
    b.status = ProductionStatus::InProgress;
    store.save(b).await.unwrap();

    store.save(Production::new(3, vec![1])).await.unwrap();

    let active = store
        .find_by_status_in(&[ProductionStatus::Preparing, ProductionStatus::InProgress])
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|p| p.status.is_active()));
}

#[tokio::test]
async fn exists_by_order_id_matches_find() {
    let store = InMemoryProductionStore::new();
    assert!(!store.exists_by_order_id(5).await.unwrap());
    store.save(Production::new(5, vec![1])).await.unwrap();
    assert!(store.exists_by_order_id(5).await.unwrap());
}

#[tokio::test]
async fn create_if_absent_reports_conflicts() {
    let store = InMemoryProductionStore::new();

    let outcome = store
        .create_if_absent(Production::new(77, vec![1]))
        .await
        .unwrap();
    let created = match outcome {
        CreateOutcome::Created(p) => p,
        CreateOutcome::AlreadyExists(_) => panic!("first creation must succeed"),
    };

    let outcome = store
        .create_if_absent(Production::new(77, vec![9, 9]))
        .await
        .unwrap();
    match outcome {
        CreateOutcome::AlreadyExists(existing) => {
            assert_eq!(existing.id, created.id);
            // the duplicate's fields never reached the store
            assert_eq!(existing.product_ids, vec![1]);
        }
        CreateOutcome::Created(_) => panic!("duplicate creation must be rejected"),
    }
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

/// The check-then-act pair is NOT atomic: two consumers that both pass
/// the existence check before either saves will both persist a record.
/// This documents the race the conditional write exists to close.
#[tokio::test]
async fn exists_then_save_admits_duplicates_under_interleaving() {
    let store = InMemoryProductionStore::new();

    // Both "consumers" check before either saves.
    assert!(!store.exists_by_order_id(8).await.unwrap());
    assert!(!store.exists_by_order_id(8).await.unwrap());

    store.save(Production::new(8, vec![1])).await.unwrap();
    store.save(Production::new(8, vec![1])).await.unwrap();

    let duplicates = store
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.order_id == 8)
        .count();
    assert_eq!(duplicates, 2, "the non-atomic path produces duplicates");
}

/// The conditional write closes the race: many concurrent creations for
/// the same order id yield exactly one record.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn create_if_absent_is_race_free_under_concurrency() {
    let store = Arc::new(InMemoryProductionStore::new());

    let attempts = (0..16).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.create_if_absent(Production::new(8, vec![1])).await })
    });

    let outcomes = join_all(attempts).await;
    let created_count = outcomes
        .into_iter()
        .map(|join| join.unwrap().unwrap())
        .filter(|outcome| matches!(outcome, CreateOutcome::Created(_)))
        .count();

    assert_eq!(created_count, 1);
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}
