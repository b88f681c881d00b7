//! Provisioning use-case.
//!
//! Resolves environment state (image, network placement), launches exactly
//! one instance, then runs the bookkeeping steps. Launch success is the
//! point of no return: tagging and ownership-record writes after it are
//! best-effort and never mask a created instance.

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::application::ports::{CloudProvider, OwnershipStore};
use crate::application::services::{image, placement};
use crate::domain::{GatewayError, Identity, LaunchSpec, OwnershipRecord};

/// Ownership tag applied to every instance this gateway creates.
pub const CREATED_BY_TAG: (&str, &str) = ("CreatedBy", "instance-gateway");

/// State written for freshly provisioned instances. The only state this
/// gateway ever writes.
pub const RECORD_STATE_PENDING: &str = "pending";

/// Launch parameters taken from the request body. Both fields are optional;
/// a missing or malformed body degrades to the defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub key_name: Option<String>,
}

/// Configuration inputs the provisioning flow needs.
#[derive(Debug, Clone, Copy)]
pub struct ProvisionContext<'a> {
    pub region: &'a str,
    /// Static image override; when set the catalog is never queried.
    pub image_override: Option<&'a str>,
    pub default_instance_type: &'a str,
}

/// Provision one instance on behalf of `identity`.
///
/// Steps run strictly in order, one attempt each: resolve image, resolve
/// placement, launch, best-effort tag, best-effort ownership record (only
/// when the identity carries a subject). Returns the new instance id.
///
/// # Errors
///
/// `NoImageFound` and `NetworkUnavailable` abort before anything is created;
/// a launch failure propagates from the compute service. Failures after the
/// launch are logged and swallowed.
pub async fn provision<C, S>(
    cloud: &C,
    store: &S,
    identity: &Identity,
    ctx: &ProvisionContext<'_>,
    request: &ProvisionRequest,
) -> Result<String, GatewayError>
where
    C: CloudProvider + ?Sized,
    S: OwnershipStore + ?Sized,
{
    let image_id = image::resolve_image(cloud, ctx.image_override).await?;
    let placement = placement::resolve_placement(cloud).await?;

    let instance_type = request
        .instance_type
        .clone()
        .unwrap_or_else(|| ctx.default_instance_type.to_owned());

    let spec = LaunchSpec {
        image_id,
        instance_type: instance_type.clone(),
        subnet_id: placement.subnet_id,
        boundary_id: placement.boundary_id,
        key_name: request.key_name.clone(),
    };
    let instance_id = cloud.launch(&spec).await?;

    // The instance exists from here on; nothing below may fail the call.
    best_effort(
        "tagging instance",
        cloud
            .tag(&instance_id, CREATED_BY_TAG.0, CREATED_BY_TAG.1)
            .await,
    );

    if let Some(owner_id) = identity.owner_id() {
        let record = OwnershipRecord {
            owner_id: owner_id.to_owned(),
            instance_id: instance_id.clone(),
            created_at: Utc::now(),
            region: ctx.region.to_owned(),
            instance_type,
            state: RECORD_STATE_PENDING.to_owned(),
            contact: identity.contact().map(str::to_owned),
        };
        best_effort("writing ownership record", store.put(&record).await);
    }

    Ok(instance_id)
}

/// Log-and-continue wrapper for secondary effects: the failure is recorded,
/// the caller-visible outcome is unchanged.
pub(crate) fn best_effort<T>(what: &str, result: anyhow::Result<T>) {
    if let Err(err) = result {
        warn!("{what} failed (non-fatal): {err:#}");
    }
}
