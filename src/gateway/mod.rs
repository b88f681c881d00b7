//! Single-entry HTTP gateway: request typing, dispatch, and response mapping.
//!
//! One fallback handler owns all path matching so the dispatch table, not
//! axum's router, decides the route, mirroring the upstream trigger that
//! hands the gateway a raw path and method. The request is typed once at the
//! boundary; everything past [`GatewayRequest`] works with structured data.

mod dispatch;
mod redirect;

pub use dispatch::{Route, dispatch};

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::application::ports::{CloudProvider, OwnershipStore};
use crate::application::services::provision::{ProvisionContext, ProvisionRequest, provision};
use crate::application::services::terminate::{BulkOutcome, terminate_all, terminate_one};
use crate::config::Config;
use crate::domain::{GatewayError, Identity, ServiceError};

/// Header a trusted fronting proxy uses to forward pre-verified claims, as
/// a JSON object. Absence just means no verified identity.
pub const AUTHORIZER_HEADER: &str = "x-authorizer-claims";

/// Shared state for the axum service.
pub struct AppState {
    pub config: Config,
    pub cloud: Arc<dyn CloudProvider + Send + Sync>,
    pub store: Arc<dyn OwnershipStore + Send + Sync>,
}

/// Build the axum router: a single fallback route so every path reaches the
/// dispatch table.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().fallback(handle).with_state(state)
}

async fn handle(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = GatewayRequest::new(uri.path().to_owned(), method, &headers, &body);
    state.serve(request).await
}

/// Typed view of one incoming request, populated once at the boundary.
#[derive(Debug)]
pub struct GatewayRequest {
    pub path: String,
    pub method: Method,
    /// Raw `Authorization` header value, if any.
    pub authorization: Option<String>,
    /// Pre-verified claims forwarded by a trusted proxy.
    pub authorizer: Option<Value>,
    /// Raw body text. Parsed per route; malformed bodies degrade to defaults.
    pub body: String,
}

impl GatewayRequest {
    fn new(path: String, method: Method, headers: &HeaderMap, body: &[u8]) -> Self {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let authorizer = headers
            .get(AUTHORIZER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| serde_json::from_str(s).ok());
        Self {
            path,
            method,
            authorization,
            authorizer,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    fn identity(&self) -> Identity {
        Identity::extract(self.authorizer.as_ref(), self.authorization.as_deref())
    }

    fn provision_request(&self) -> ProvisionRequest {
        serde_json::from_str(&self.body).unwrap_or_default()
    }
}

impl AppState {
    async fn serve(&self, request: GatewayRequest) -> Response {
        // Configuration problems surface before any routing.
        let Some(idp) = self.config.idp() else {
            return error_response(&GatewayError::ConfigurationMissing);
        };

        let route = dispatch(&request.path, &request.method);
        debug!(path = %request.path, method = %request.method, ?route, "dispatching");

        let result = match route {
            Route::Login | Route::Default => {
                return redirect::login(&idp, &self.config.aws_region);
            }
            Route::Logout => return redirect::logout(&idp, &self.config.aws_region),
            Route::Provision => self.provision(&request).await,
            Route::TerminateOne(id) => self.terminate_one(&request, &id).await,
            Route::TerminateAll => self.terminate_all(&request).await,
        };

        match result {
            Ok(body) => json_response(StatusCode::OK, &body),
            Err(err) => error_response(&err),
        }
    }

    async fn provision(&self, request: &GatewayRequest) -> Result<Value, GatewayError> {
        let identity = request.identity();
        let ctx = ProvisionContext {
            region: &self.config.aws_region,
            image_override: self.config.ami_id.as_deref(),
            default_instance_type: &self.config.instance_type,
        };
        let instance_id = provision(
            self.cloud.as_ref(),
            self.store.as_ref(),
            &identity,
            &ctx,
            &request.provision_request(),
        )
        .await?;
        info!(%instance_id, "instance provisioned");
        Ok(json!({ "instance_id": instance_id }))
    }

    async fn terminate_one(
        &self,
        request: &GatewayRequest,
        instance_id: &str,
    ) -> Result<Value, GatewayError> {
        let identity = request.identity();
        terminate_one(
            self.cloud.as_ref(),
            self.store.as_ref(),
            &identity,
            instance_id,
        )
        .await?;
        info!(%instance_id, "instance terminated");
        Ok(json!({ "terminated": instance_id }))
    }

    async fn terminate_all(&self, request: &GatewayRequest) -> Result<Value, GatewayError> {
        let identity = request.identity();
        match terminate_all(self.cloud.as_ref(), self.store.as_ref(), &identity).await? {
            BulkOutcome::Empty => Ok(json!({ "message": "No instances found for user" })),
            BulkOutcome::Terminated(ids) => {
                info!(count = ids.len(), "instances terminated");
                Ok(json!({ "terminated": ids }))
            }
        }
    }
}

fn status_for(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::IdentityRequired => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Pull a structured compute-service error out of the failure chain, if any.
fn service_error(err: &GatewayError) -> Option<&ServiceError> {
    match err {
        GatewayError::Internal(source) | GatewayError::TerminationFailed(source) => {
            source.downcast_ref::<ServiceError>()
        }
        _ => None,
    }
}

fn error_response(err: &GatewayError) -> Response {
    let status = status_for(err);
    error!(%status, error = %err, "request failed");
    let body = match service_error(err) {
        Some(service) => json!({ "error": service }),
        None => json!({ "message": err.to_string() }),
    };
    json_response(status, &body)
}

fn json_response(status: StatusCode, body: &Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}
