//! Identity-claim extraction.
//!
//! Derives a stable owner identifier (and optional contact) from one of two
//! shapes of evidence: pre-verified authorizer claims, or the payload of a
//! raw bearer token. No signature verification happens here; the result is
//! only good for namespacing ownership records, never for an authorization
//! decision on its own. The `Identity` enum keeps the trust level explicit
//! so call sites cannot confuse the two.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use serde::Deserialize;
use serde_json::Value;

/// Claim set carried by either identity source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Subject: the stable owner identifier.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "cognito:username", alias = "username")]
    pub username: Option<String>,
}

impl Claims {
    /// Contact identifier, preferring email over username.
    #[must_use]
    pub fn contact(&self) -> Option<&str> {
        self.email.as_deref().or(self.username.as_deref())
    }
}

/// Identity evidence, tagged by trust level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Claims attached by an upstream authorizer that already verified them.
    Verified(Claims),
    /// Claims decoded from a bearer token without signature verification.
    Unverified(Claims),
    /// No usable identity evidence.
    Anonymous,
}

impl Identity {
    /// Derive identity from pre-verified authorizer claims, falling back to
    /// best-effort bearer decoding. Never fails: malformed evidence degrades
    /// to `Anonymous` and only disables identity-bound behaviour.
    #[must_use]
    pub fn extract(authorizer: Option<&Value>, authorization: Option<&str>) -> Identity {
        if let Some(claims) = authorizer.and_then(claims_from_authorizer) {
            return Identity::Verified(claims);
        }
        let bearer = authorization.and_then(|h| h.strip_prefix("Bearer "));
        if let Some(claims) = bearer.and_then(decode_bearer_payload) {
            return Identity::Unverified(claims);
        }
        Identity::Anonymous
    }

    /// Stable owner identifier, if any source yielded a subject.
    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Identity::Verified(c) | Identity::Unverified(c) => Some(&c.sub),
            Identity::Anonymous => None,
        }
    }

    #[must_use]
    pub fn contact(&self) -> Option<&str> {
        match self {
            Identity::Verified(c) | Identity::Unverified(c) => c.contact(),
            Identity::Anonymous => None,
        }
    }
}

/// Authorizer contexts come in two shapes: the claims map itself, or an
/// object wrapping it under a `claims` key. Accept both.
fn claims_from_authorizer(value: &Value) -> Option<Claims> {
    let map = value.get("claims").unwrap_or(value);
    serde_json::from_value(map.clone()).ok()
}

/// Decode the middle segment of a three-segment bearer token as a JSON claim
/// set. Padding is corrected to a multiple of 4 before base64url decoding.
fn decode_bearer_payload(token: &str) -> Option<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }
    let mut payload = segments[1].to_owned();
    while payload.len() % 4 != 0 {
        payload.push('=');
    }
    let bytes = URL_SAFE.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
