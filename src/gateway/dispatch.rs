//! Pure (path, method) dispatch table.

use axum::http::Method;

/// Action selected for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Logout,
    Provision,
    TerminateAll,
    TerminateOne(String),
    /// Unmatched requests fall back to the login redirect.
    Default,
}

/// Map a raw path and method to a route.
///
/// The auth and provisioning paths are suffix-matched so a stage prefix in
/// front of them is tolerated; the instance collection is prefix-matched at
/// the root with the instance id as the segment after it.
#[must_use]
pub fn dispatch(path: &str, method: &Method) -> Route {
    if *method == Method::GET && path.ends_with("/logout") {
        return Route::Logout;
    }
    if *method == Method::GET && path.ends_with("/login") {
        return Route::Login;
    }
    if *method == Method::POST && path.ends_with("/create-ec2") {
        return Route::Provision;
    }
    if *method == Method::DELETE {
        if let Some(rest) = path.strip_prefix("/instances") {
            let id = rest.trim_start_matches('/');
            if id.is_empty() {
                return Route::TerminateAll;
            }
            if rest.starts_with('/') {
                let id = id.split('/').next().unwrap_or(id);
                return Route::TerminateOne(id.to_owned());
            }
            return Route::Default;
        }
    }
    Route::Default
}
