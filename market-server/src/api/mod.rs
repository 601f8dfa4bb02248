//! HTTP API - routes and the middleware stack
//!
//! # Structure
//!
//! - [`health`] - health probes (public)
//! - [`orders`] - order placement and lifecycle (JWT required)
//!
//! Authentication is enforced per handler through the [`CurrentUser`]
//! extractor, so routes that never mention it stay public.
//!
//! [`CurrentUser`]: crate::auth::CurrentUser

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod health;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Order API - JWT required via the CurrentUser extractor
        .merge(orders::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
///
/// This is used by both the HTTP server and the integration tests.
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        .with_state(state.clone())
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Propagate the request ID to the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Request ID - generate a unique ID for each request; must sit
        // outside the propagation layer so generated IDs reach responses
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Cap concurrent in-flight requests
        .layer(GlobalConcurrencyLimitLayer::new(
            state.config.max_connections,
        ))
}
