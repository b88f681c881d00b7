//! Domain layer: pure types, claim handling, and typed errors.
//!
//! This module has zero imports from `crate::infra`, `crate::gateway`,
//! `crate::application`, `tokio`, or `std::process`. All functions are
//! synchronous and take data in, returning data out.

pub mod error;
pub mod identity;
pub mod record;

pub use error::{GatewayError, ServiceError};
pub use identity::{Claims, Identity};
pub use record::{LaunchSpec, NetworkPlacement, OwnershipRecord};
