//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. The HTTP status mapping lives in
//! `crate::gateway`, not here.

use serde::Serialize;
use thiserror::Error;

/// Request-scoped failures the gateway maps to HTTP responses.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// One or more identity-provider settings are absent. Surfaced before
    /// any routing happens.
    #[error("Missing configuration for Cognito redirect")]
    ConfigurationMissing,

    /// No static override was set and no catalog image matched any name
    /// pattern.
    #[error("No AMI found")]
    NoImageFound,

    /// Default-network, subnet, or boundary discovery came back empty.
    #[error("network placement unavailable: {0}")]
    NetworkUnavailable(String),

    /// Bulk termination was requested without an authenticated identity.
    #[error("identity required")]
    IdentityRequired,

    /// The batch terminate call failed. No ownership records were pruned, so
    /// a retry still sees every owned instance.
    #[error("failed to terminate instances")]
    TerminationFailed(anyhow::Error),

    /// Anything unanticipated, caught at the gateway boundary.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Structured failure reported by an external service call.
///
/// Infrastructure adapters build these from the AWS CLI's stderr so the
/// gateway can surface the service code and detail in error bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ServiceError {
    /// Parse the CLI's standard error line:
    /// `An error occurred (Code) when calling the X operation: detail`.
    ///
    /// The error line is the last non-empty line of stderr; anything that
    /// does not match the standard shape becomes a code-less message.
    #[must_use]
    pub fn from_cli_stderr(stderr: &str) -> Self {
        let line = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("");

        let (code, detail) = match line
            .strip_prefix("An error occurred (")
            .and_then(|rest| rest.split_once(')'))
        {
            Some((code, rest)) => (
                Some(code.to_owned()),
                rest.split_once(": ").map(|(_, d)| d.to_owned()),
            ),
            None => (None, None),
        };

        let message = if line.is_empty() {
            "external service call failed".to_owned()
        } else {
            line.to_owned()
        };

        Self {
            message,
            code,
            detail,
        }
    }
}
