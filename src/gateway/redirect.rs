//! Identity-provider redirect construction.
//!
//! Only URLs are built here; token issuance and validation happen upstream
//! of the gateway.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::info;

use crate::config::IdpConfig;

/// Hosted-UI domain suffix of the identity provider.
const IDP_DOMAIN_SUFFIX: &str = "amazoncognito.com";

/// 302 to the authorize endpoint. Implicit flow (`response_type=token`);
/// `state=login` mitigates CSRF on the redirect back.
pub fn login(idp: &IdpConfig<'_>, region: &str) -> Response {
    let url = format!(
        "https://{}/oauth2/authorize?client_id={}&response_type=token&scope=openid+email&redirect_uri={}&state=login",
        hosted_domain(idp, region),
        encode(idp.client_id),
        encode(idp.redirect_uri),
    );
    redirect(url)
}

/// 302 to the logout endpoint. Carries no `response_type`.
pub fn logout(idp: &IdpConfig<'_>, region: &str) -> Response {
    let url = format!(
        "https://{}/logout?client_id={}&logout_uri={}",
        hosted_domain(idp, region),
        encode(idp.client_id),
        encode(idp.redirect_uri),
    );
    redirect(url)
}

fn hosted_domain(idp: &IdpConfig<'_>, region: &str) -> String {
    format!("{}.auth.{region}.{IDP_DOMAIN_SUFFIX}", idp.domain_prefix)
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn redirect(url: String) -> Response {
    info!(%url, "redirecting");
    (StatusCode::FOUND, [(header::LOCATION, url)], "").into_response()
}
