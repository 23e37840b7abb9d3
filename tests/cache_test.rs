//! Integration tests for the reactive collection cache: fetch lifecycle,
//! invalidation coalescing, and error retention.

mod common;

use std::time::Duration;

use centime::cache::{Collection, EntityKind};
use centime::error::GatewayError;
use common::{init_tracing, wait_until, ScriptedSource};

#[tokio::test]
async fn test_startup_fetch_populates_snapshot() {
    init_tracing();
    let (source, mut requests) = ScriptedSource::new();
    let collection: Collection<String> = Collection::spawn(EntityKind::Budgets, source.clone());

    // Before any response arrives the snapshot is empty and loading.
    let snap = collection.snapshot();
    assert!(snap.entities.is_empty());
    assert!(snap.is_loading);
    assert!(snap.last_synced.is_none());

    let responder = requests.recv().await.expect("startup fetch dispatched");
    responder.send(Ok(vec!["a".into()])).unwrap();

    wait_until("startup fetch applied", || !collection.snapshot().is_loading).await;
    let snap = collection.snapshot();
    assert_eq!(snap.entities, vec!["a".to_string()]);
    assert!(snap.last_error.is_none());
    assert!(snap.last_synced.is_some());
}

#[tokio::test]
async fn test_invalidation_triggers_refetch() {
    init_tracing();
    let (source, mut requests) = ScriptedSource::new();
    let collection: Collection<String> = Collection::spawn(EntityKind::Expenses, source.clone());

    requests
        .recv()
        .await
        .unwrap()
        .send(Ok(vec!["a".into()]))
        .unwrap();
    wait_until("startup fetch applied", || !collection.snapshot().is_loading).await;

    collection.invalidate();

    let responder = requests.recv().await.expect("refetch dispatched");
    responder.send(Ok(vec!["a".into(), "b".into()])).unwrap();

    wait_until("refetch applied", || {
        collection.snapshot().entities.len() == 2
    })
    .await;
    assert_eq!(source.calls(), 2);
}

/// N invalidations issued while a fetch is in flight coalesce into exactly
/// one follow-up fetch, and the final state matches the data returned by the
/// last fetch actually issued.
#[tokio::test]
async fn test_in_flight_invalidations_coalesce() {
    init_tracing();
    let (source, mut requests) = ScriptedSource::new();
    let collection: Collection<String> = Collection::spawn(EntityKind::Budgets, source.clone());

    requests
        .recv()
        .await
        .unwrap()
        .send(Ok(vec!["a".into()]))
        .unwrap();
    wait_until("startup fetch applied", || !collection.snapshot().is_loading).await;

    // Kick off a refetch and hold it open.
    collection.invalidate();
    let in_flight = requests.recv().await.expect("refetch dispatched");

    // Pile on invalidations while that fetch is still running.
    for _ in 0..5 {
        collection.invalidate();
    }
    in_flight.send(Ok(vec!["b".into()])).unwrap();

    // Exactly one follow-up fetch covers all five invalidations.
    let follow_up = requests.recv().await.expect("follow-up fetch dispatched");
    follow_up.send(Ok(vec!["c".into()])).unwrap();

    wait_until("follow-up applied", || {
        collection.snapshot().entities == vec!["c".to_string()]
    })
    .await;

    // No further fetches are queued up.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.calls(), 3, "expected startup + refetch + one follow-up");
    assert!(requests.try_recv().is_err());
}

/// A failed fetch surfaces its error but leaves the previous collection
/// untouched, and the loading flag returns to false.
#[tokio::test]
async fn test_fetch_error_retains_previous_snapshot() {
    init_tracing();
    let (source, mut requests) = ScriptedSource::new();
    let collection: Collection<String> = Collection::spawn(EntityKind::Expenses, source.clone());

    requests
        .recv()
        .await
        .unwrap()
        .send(Ok(vec!["a".into()]))
        .unwrap();
    wait_until("startup fetch applied", || !collection.snapshot().is_loading).await;

    collection.invalidate();
    let responder = requests.recv().await.unwrap();
    responder
        .send(Err(GatewayError::Remote("Unauthorized".into())))
        .unwrap();

    wait_until("error recorded", || {
        collection.snapshot().last_error.is_some()
    })
    .await;

    let snap = collection.snapshot();
    assert_eq!(snap.entities, vec!["a".to_string()], "snapshot must be retained");
    assert_eq!(snap.last_error.as_deref(), Some("Unauthorized"));
    assert!(!snap.is_loading);

    // A later successful refetch clears the error again.
    collection.invalidate();
    let responder = requests.recv().await.unwrap();
    responder.send(Ok(vec!["fresh".into()])).unwrap();
    wait_until("recovery applied", || {
        collection.snapshot().last_error.is_none()
    })
    .await;
    assert_eq!(collection.snapshot().entities, vec!["fresh".to_string()]);
}

/// An auth failure is treated like any other fetch failure at the cache
/// boundary: retained snapshot, surfaced detail.
#[tokio::test]
async fn test_auth_failure_is_surfaced_not_thrown() {
    init_tracing();
    let (source, mut requests) = ScriptedSource::new();
    let collection: Collection<String> = Collection::spawn(EntityKind::Budgets, source.clone());

    let responder = requests.recv().await.unwrap();
    responder
        .send(Err(GatewayError::AuthFailed("token refresh failed".into())))
        .unwrap();

    wait_until("error recorded", || {
        collection.snapshot().last_error.is_some()
    })
    .await;
    let snap = collection.snapshot();
    assert!(snap.entities.is_empty());
    assert!(snap
        .last_error
        .as_deref()
        .unwrap()
        .contains("token refresh failed"));
    assert!(!snap.is_loading);
}
