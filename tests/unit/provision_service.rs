//! Tests for the provisioning orchestrator.

use instance_gateway::application::services::provision::{
    ProvisionContext, ProvisionRequest, provision,
};
use instance_gateway::domain::GatewayError;

use crate::helpers::{MemoryStore, MockCloud, anonymous, verified};

fn ctx() -> ProvisionContext<'static> {
    ProvisionContext {
        region: "us-east-1",
        image_override: None,
        default_instance_type: "t2.micro",
    }
}

#[tokio::test]
async fn happy_path_launches_tags_and_records() {
    let cloud = MockCloud::default();
    let store = MemoryStore::default();
    let identity = verified("user-1");

    let instance_id = provision(&cloud, &store, &identity, &ctx(), &ProvisionRequest::default())
        .await
        .expect("provision");
    assert_eq!(instance_id, "i-0abc");

    let specs = cloud.launched_specs();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].image_id, "ami-newest");
    assert_eq!(specs[0].instance_type, "t2.micro");
    assert_eq!(specs[0].subnet_id, "subnet-a");
    assert_eq!(specs[0].boundary_id, "sg-default");
    assert_eq!(specs[0].key_name, None);

    let tags = cloud.applied_tags();
    assert_eq!(
        tags,
        vec![(
            "i-0abc".to_owned(),
            "CreatedBy".to_owned(),
            "instance-gateway".to_owned()
        )]
    );

    let records = store.put_calls();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner_id, "user-1");
    assert_eq!(records[0].instance_id, "i-0abc");
    assert_eq!(records[0].state, "pending");
    assert_eq!(records[0].region, "us-east-1");
    assert_eq!(records[0].contact.as_deref(), Some("user-1@example.com"));
}

#[tokio::test]
async fn requested_type_and_key_override_defaults() {
    let cloud = MockCloud::default();
    let store = MemoryStore::default();
    let request = ProvisionRequest {
        instance_type: Some("t3.large".to_owned()),
        key_name: Some("my-key".to_owned()),
    };

    provision(&cloud, &store, &anonymous(), &ctx(), &request)
        .await
        .expect("provision");

    let specs = cloud.launched_specs();
    assert_eq!(specs[0].instance_type, "t3.large");
    assert_eq!(specs[0].key_name.as_deref(), Some("my-key"));
}

#[tokio::test]
async fn anonymous_identity_writes_no_record() {
    let cloud = MockCloud::default();
    let store = MemoryStore::default();

    let instance_id = provision(
        &cloud,
        &store,
        &anonymous(),
        &ctx(),
        &ProvisionRequest::default(),
    )
    .await
    .expect("provision");
    assert_eq!(instance_id, "i-0abc");
    assert!(store.put_calls().is_empty());
}

#[tokio::test]
async fn tag_failure_does_not_mask_the_created_instance() {
    let mut cloud = MockCloud::default();
    cloud.tag_error = Some("tagging denied".to_owned());
    let store = MemoryStore::default();
    let identity = verified("user-1");

    let instance_id = provision(&cloud, &store, &identity, &ctx(), &ProvisionRequest::default())
        .await
        .expect("provision must still succeed");
    assert_eq!(instance_id, "i-0abc");
    // Bookkeeping still ran after the failed tag.
    assert_eq!(store.put_calls().len(), 1);
}

#[tokio::test]
async fn record_write_failure_does_not_mask_the_created_instance() {
    let cloud = MockCloud::default();
    let store = MemoryStore {
        put_error: true,
        ..MemoryStore::default()
    };
    let identity = verified("user-1");

    let instance_id = provision(&cloud, &store, &identity, &ctx(), &ProvisionRequest::default())
        .await
        .expect("provision must still succeed");
    assert_eq!(instance_id, "i-0abc");
}

#[tokio::test]
async fn image_override_in_context_skips_the_catalog() {
    let cloud = MockCloud::default();
    let store = MemoryStore::default();
    let ctx = ProvisionContext {
        image_override: Some("ami-static"),
        ..ctx()
    };

    provision(&cloud, &store, &anonymous(), &ctx, &ProvisionRequest::default())
        .await
        .expect("provision");

    assert_eq!(cloud.catalog_query_count(), 0);
    assert_eq!(cloud.launched_specs()[0].image_id, "ami-static");
}

#[tokio::test]
async fn unresolved_image_aborts_before_launch() {
    let mut cloud = MockCloud::default();
    cloud.images.clear();
    let store = MemoryStore::default();

    let err = provision(
        &cloud,
        &store,
        &anonymous(),
        &ctx(),
        &ProvisionRequest::default(),
    )
    .await
    .expect_err("should fail");
    assert!(matches!(err, GatewayError::NoImageFound));
    assert!(cloud.launched_specs().is_empty());
}

#[tokio::test]
async fn unresolved_placement_aborts_before_launch() {
    let mut cloud = MockCloud::default();
    cloud.network = None;
    let store = MemoryStore::default();

    let err = provision(
        &cloud,
        &store,
        &anonymous(),
        &ctx(),
        &ProvisionRequest::default(),
    )
    .await
    .expect_err("should fail");
    assert!(matches!(err, GatewayError::NetworkUnavailable(_)));
    assert!(cloud.launched_specs().is_empty());
}

#[tokio::test]
async fn launch_failure_writes_no_record() {
    let mut cloud = MockCloud::default();
    cloud.launch_error = Some("capacity exhausted".to_owned());
    let store = MemoryStore::default();
    let identity = verified("user-1");

    let err = provision(&cloud, &store, &identity, &ctx(), &ProvisionRequest::default())
        .await
        .expect_err("should fail");
    assert!(matches!(err, GatewayError::Internal(_)));
    assert!(store.put_calls().is_empty());
    assert!(cloud.applied_tags().is_empty());
}
