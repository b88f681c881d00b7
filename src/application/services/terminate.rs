//! Termination use-cases: single instance by id, or all instances owned by
//! the caller.

use crate::application::ports::{InstanceLifecycle, OwnershipStore};
use crate::application::services::provision::best_effort;
use crate::domain::{GatewayError, Identity};

/// Result of a bulk termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// The owner had no records; no terminate call was issued.
    Empty,
    /// All owned instances were terminated in one batch call.
    Terminated(Vec<String>),
}

/// Terminate one instance by id.
///
/// Exactly one terminate call is issued regardless of identity. Unlike
/// provisioning's tagging step, the terminate call itself must succeed;
/// termination is the entire purpose of the call. Record cleanup afterwards
/// is best-effort and requires an authenticated identity.
///
/// # Errors
///
/// Propagates the compute-service failure when the terminate call fails.
pub async fn terminate_one<C, S>(
    cloud: &C,
    store: &S,
    identity: &Identity,
    instance_id: &str,
) -> Result<(), GatewayError>
where
    C: InstanceLifecycle + ?Sized,
    S: OwnershipStore + ?Sized,
{
    cloud.terminate(&[instance_id.to_owned()]).await?;

    if let Some(owner_id) = identity.owner_id() {
        best_effort(
            "deleting ownership record",
            store.delete(owner_id, instance_id).await,
        );
    }
    Ok(())
}

/// Terminate every instance owned by the caller.
///
/// Requires an authenticated identity. Zero records is an empty success, not
/// an error. Otherwise all found ids go into one batch terminate call: either
/// the batch succeeds or no record is pruned, so a failed bulk terminate can
/// be retried against the full set. Per-record deletion failures after a
/// successful batch are logged only.
///
/// # Errors
///
/// `IdentityRequired` without an owner id; `TerminationFailed` when the
/// batch call fails.
pub async fn terminate_all<C, S>(
    cloud: &C,
    store: &S,
    identity: &Identity,
) -> Result<BulkOutcome, GatewayError>
where
    C: InstanceLifecycle + ?Sized,
    S: OwnershipStore + ?Sized,
{
    let Some(owner_id) = identity.owner_id() else {
        return Err(GatewayError::IdentityRequired);
    };

    let records = store.query_by_owner(owner_id).await?;
    if records.is_empty() {
        return Ok(BulkOutcome::Empty);
    }

    let instance_ids: Vec<String> = records.into_iter().map(|r| r.instance_id).collect();
    cloud
        .terminate(&instance_ids)
        .await
        .map_err(GatewayError::TerminationFailed)?;

    for instance_id in &instance_ids {
        best_effort(
            "deleting ownership record",
            store.delete(owner_id, instance_id).await,
        );
    }
    Ok(BulkOutcome::Terminated(instance_ids))
}
