//! Environment configuration.
//!
//! Loaded once at startup via `envy`; each field maps to its
//! SCREAMING_SNAKE_CASE env var (`COGNITO_CLIENT_ID`, `AWS_REGION`, ...).
//! The identity-provider fields are optional here and checked per request,
//! so a misconfigured deployment still serves structured 500 responses
//! instead of refusing to boot.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Identity-provider hosted-UI domain prefix.
    pub cognito_domain_prefix: Option<String>,

    /// Identity-provider app client id.
    pub cognito_client_id: Option<String>,

    /// URI the hosted UI redirects back to after login/logout.
    pub cognito_redirect_uri: Option<String>,

    #[serde(default = "default_region")]
    pub aws_region: String,

    /// Static machine-image override. When set, the image catalog is never
    /// queried.
    pub ami_id: Option<String>,

    /// Instance type used when the request body does not name one.
    #[serde(default = "default_instance_type")]
    pub instance_type: String,

    /// Name of the ownership-record table.
    #[serde(default = "default_table")]
    pub instances_table: String,
}

/// Identity-provider settings required for redirect construction.
#[derive(Debug, Clone, Copy)]
pub struct IdpConfig<'a> {
    pub domain_prefix: &'a str,
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
}

impl Config {
    /// All three redirect settings, or `None` if any is absent.
    #[must_use]
    pub fn idp(&self) -> Option<IdpConfig<'_>> {
        Some(IdpConfig {
            domain_prefix: self.cognito_domain_prefix.as_deref()?,
            client_id: self.cognito_client_id.as_deref()?,
            redirect_uri: self.cognito_redirect_uri.as_deref()?,
        })
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_owned()
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

fn default_instance_type() -> String {
    "t2.micro".to_owned()
}

fn default_table() -> String {
    "InstanceManagementTable".to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cognito_domain_prefix: None,
            cognito_client_id: None,
            cognito_redirect_uri: None,
            aws_region: default_region(),
            ami_id: None,
            instance_type: default_instance_type(),
            instances_table: default_table(),
        }
    }
}
