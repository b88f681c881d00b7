//! Value types shared by the orchestrators and the store.

use chrono::{DateTime, Utc};

/// The network/subnet/boundary tuple a new instance launches into.
///
/// Resolved fresh on every provisioning call, never cached or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPlacement {
    pub network_id: String,
    pub subnet_id: String,
    pub boundary_id: String,
}

/// Launch parameters for exactly one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub image_id: String,
    pub instance_type: String,
    pub subnet_id: String,
    pub boundary_id: String,
    /// Key-pair reference. `None` means no key material is injected.
    pub key_name: Option<String>,
}

/// Persisted mapping from (owner, instance) to provisioning metadata.
///
/// A record exists while the gateway believes the instance is live. Only the
/// `pending` state is ever written; successful termination removes the record,
/// and the record may outlive the instance if termination of the underlying
/// resource fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub owner_id: String,
    pub instance_id: String,
    pub created_at: DateTime<Utc>,
    pub region: String,
    pub instance_type: String,
    pub state: String,
    pub contact: Option<String>,
}
