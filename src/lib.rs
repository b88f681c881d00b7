//! Instance gateway library, exposing modules for integration testing.

pub mod application;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod infra;
