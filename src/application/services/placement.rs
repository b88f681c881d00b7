//! Network placement discovery.

use crate::application::ports::NetworkDiscovery;
use crate::domain::{GatewayError, NetworkPlacement};

/// Name of the boundary construct every placement resolves.
pub const DEFAULT_BOUNDARY: &str = "default";

/// Resolve the placement target for a new instance: the default network,
/// one of its subnets, and its boundary named `default`.
///
/// Resolved fresh on every call. Subnet selection among multiple candidates
/// is arbitrary but deterministic within a call (first result).
///
/// # Errors
///
/// `NetworkUnavailable` naming the missing piece when any discovery step
/// yields zero results. Failure here aborts provisioning before any instance
/// is created.
pub async fn resolve_placement<N>(network: &N) -> Result<NetworkPlacement, GatewayError>
where
    N: NetworkDiscovery + ?Sized,
{
    let network_id = network
        .default_network()
        .await?
        .ok_or_else(|| GatewayError::NetworkUnavailable("no default network".to_owned()))?;

    let subnet_id = network
        .subnets_of(&network_id)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::NetworkUnavailable(format!("no subnet in {network_id}")))?;

    let boundary_id = network
        .boundary_named(&network_id, DEFAULT_BOUNDARY)
        .await?
        .ok_or_else(|| {
            GatewayError::NetworkUnavailable(format!(
                "no '{DEFAULT_BOUNDARY}' boundary in {network_id}"
            ))
        })?;

    Ok(NetworkPlacement {
        network_id,
        subnet_id,
        boundary_id,
    })
}
