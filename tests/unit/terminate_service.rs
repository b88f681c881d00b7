//! Tests for the termination orchestrator.

use instance_gateway::application::services::terminate::{
    BulkOutcome, terminate_all, terminate_one,
};
use instance_gateway::domain::GatewayError;

use crate::helpers::{MemoryStore, MockCloud, anonymous, record, verified};

// ── Single termination ────────────────────────────────────────────────────────

#[tokio::test]
async fn single_issues_exactly_one_terminate_call_without_identity() {
    let cloud = MockCloud::default();
    let store = MemoryStore::default();

    terminate_one(&cloud, &store, &anonymous(), "i-0123")
        .await
        .expect("terminate");

    assert_eq!(cloud.termination_batches(), vec![vec!["i-0123".to_owned()]]);
    assert!(store.delete_calls().is_empty());
}

#[tokio::test]
async fn single_with_identity_prunes_the_record() {
    let cloud = MockCloud::default();
    let store = MemoryStore::with_records(vec![record("user-1", "i-0123")]);

    terminate_one(&cloud, &store, &verified("user-1"), "i-0123")
        .await
        .expect("terminate");

    assert_eq!(
        store.delete_calls(),
        vec![("user-1".to_owned(), "i-0123".to_owned())]
    );
    assert!(store.stored_records().is_empty());
}

#[tokio::test]
async fn single_record_delete_failure_is_swallowed() {
    let cloud = MockCloud::default();
    let store = MemoryStore {
        records: std::sync::Mutex::new(vec![record("user-1", "i-0123")]),
        delete_error: true,
        ..MemoryStore::default()
    };

    terminate_one(&cloud, &store, &verified("user-1"), "i-0123")
        .await
        .expect("record failure must not surface");
    assert_eq!(cloud.termination_batches().len(), 1);
}

#[tokio::test]
async fn single_terminate_failure_surfaces() {
    let mut cloud = MockCloud::default();
    cloud.terminate_error = Some("not permitted".to_owned());
    let store = MemoryStore::with_records(vec![record("user-1", "i-0123")]);

    let err = terminate_one(&cloud, &store, &verified("user-1"), "i-0123")
        .await
        .expect_err("should fail");
    assert!(matches!(err, GatewayError::Internal(_)));
    // Termination is the entire purpose of the call; nothing was pruned.
    assert_eq!(store.stored_records().len(), 1);
    assert!(store.delete_calls().is_empty());
}

// ── Bulk termination ──────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_requires_an_authenticated_identity() {
    let cloud = MockCloud::default();
    let store = MemoryStore::with_records(vec![record("user-1", "i-1")]);

    let err = terminate_all(&cloud, &store, &anonymous())
        .await
        .expect_err("should fail");
    assert!(matches!(err, GatewayError::IdentityRequired));
    assert!(cloud.termination_batches().is_empty());
}

#[tokio::test]
async fn bulk_with_no_records_is_an_empty_success() {
    let cloud = MockCloud::default();
    let store = MemoryStore::default();

    let outcome = terminate_all(&cloud, &store, &verified("user-1"))
        .await
        .expect("bulk");
    assert_eq!(outcome, BulkOutcome::Empty);
    assert!(cloud.termination_batches().is_empty());
}

#[tokio::test]
async fn bulk_terminates_all_owned_instances_in_one_batch() {
    let cloud = MockCloud::default();
    let store = MemoryStore::with_records(vec![
        record("user-1", "i-1"),
        record("user-1", "i-2"),
        record("user-2", "i-other"),
    ]);

    let outcome = terminate_all(&cloud, &store, &verified("user-1"))
        .await
        .expect("bulk");
    assert_eq!(
        outcome,
        BulkOutcome::Terminated(vec!["i-1".to_owned(), "i-2".to_owned()])
    );

    // One batch call for the caller's instances only.
    assert_eq!(
        cloud.termination_batches(),
        vec![vec!["i-1".to_owned(), "i-2".to_owned()]]
    );

    // Only the other owner's record survives.
    let remaining = store.stored_records();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].owner_id, "user-2");
}

#[tokio::test]
async fn bulk_terminate_failure_leaves_all_records_intact() {
    let mut cloud = MockCloud::default();
    cloud.terminate_error = Some("batch failed".to_owned());
    let store = MemoryStore::with_records(vec![
        record("user-1", "i-1"),
        record("user-1", "i-2"),
    ]);

    let err = terminate_all(&cloud, &store, &verified("user-1"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, GatewayError::TerminationFailed(_)));
    assert_eq!(store.stored_records().len(), 2);
    assert!(store.delete_calls().is_empty());
}

#[tokio::test]
async fn bulk_per_record_delete_failure_is_not_fatal() {
    let cloud = MockCloud::default();
    let store = MemoryStore {
        records: std::sync::Mutex::new(vec![record("user-1", "i-1"), record("user-1", "i-2")]),
        delete_error: true,
        ..MemoryStore::default()
    };

    let outcome = terminate_all(&cloud, &store, &verified("user-1"))
        .await
        .expect("bulk must still succeed");
    assert_eq!(
        outcome,
        BulkOutcome::Terminated(vec!["i-1".to_owned(), "i-2".to_owned()])
    );
    // Both deletes were attempted even though each failed.
    assert_eq!(store.delete_calls().len(), 2);
}
