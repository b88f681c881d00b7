//! Orchestration use-cases over injected ports.
//!
//! Services import only from `crate::domain` and `crate::application::ports`;
//! all I/O happens behind the port traits so tests can inject mocks.

pub mod image;
pub mod placement;
pub mod provision;
pub mod terminate;
