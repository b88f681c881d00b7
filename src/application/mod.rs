//! Application layer: port traits and orchestration services.

pub mod ports;
pub mod services;
