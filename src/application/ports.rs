//! Port trait definitions for the application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`
//! or `crate::gateway`. Traits are `async_trait` so they stay object-safe
//! and their futures are `Send` for use inside axum handlers.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{LaunchSpec, OwnershipRecord};

// ── Value types ───────────────────────────────────────────────────────────────

/// Catalog entry returned by [`ImageCatalog::images_by_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub image_id: String,
    /// Publication timestamp as the catalog reports it. Compared
    /// lexicographically, never parsed.
    pub creation_date: String,
}

// ── Compute ports ─────────────────────────────────────────────────────────────

/// Machine-image catalog queries.
#[async_trait]
pub trait ImageCatalog {
    /// Vendor-owned, available images whose name matches `pattern`.
    async fn images_by_name(&self, pattern: &str) -> Result<Vec<ImageSummary>>;
}

/// Discovery of the network placement a new instance launches into.
#[async_trait]
pub trait NetworkDiscovery {
    /// The account/region default network, if one exists.
    async fn default_network(&self) -> Result<Option<String>>;
    /// All subnets belonging to the network.
    async fn subnets_of(&self, network_id: &str) -> Result<Vec<String>>;
    /// The traffic-filtering boundary with `name`, scoped to the network.
    async fn boundary_named(&self, network_id: &str, name: &str) -> Result<Option<String>>;
}

/// Instance lifecycle operations.
#[async_trait]
pub trait InstanceLifecycle {
    /// Launch exactly one instance and return its id.
    async fn launch(&self, spec: &LaunchSpec) -> Result<String>;
    /// Terminate a batch of instances in one call.
    async fn terminate(&self, instance_ids: &[String]) -> Result<()>;
    /// Apply one tag to an instance.
    async fn tag(&self, instance_id: &str, key: &str, value: &str) -> Result<()>;
}

/// Composite trait: any type implementing all three compute sub-traits is a
/// `CloudProvider`.
pub trait CloudProvider: ImageCatalog + NetworkDiscovery + InstanceLifecycle {}

impl<T> CloudProvider for T where T: ImageCatalog + NetworkDiscovery + InstanceLifecycle {}

// ── Ownership record store ────────────────────────────────────────────────────

/// Persistence for (owner, instance) ownership records.
///
/// Writes and deletes are issued best-effort by the orchestrators; the store
/// itself reports failures normally and leaves the suppression decision to
/// the caller.
#[async_trait]
pub trait OwnershipStore {
    async fn put(&self, record: &OwnershipRecord) -> Result<()>;
    async fn delete(&self, owner_id: &str, instance_id: &str) -> Result<()>;
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<OwnershipRecord>>;
}

// ── Command runner port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program and capture its output, with the instance's default
    /// timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program with a custom timeout override. On timeout the child
    /// process must be killed, not left orphaned.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}
