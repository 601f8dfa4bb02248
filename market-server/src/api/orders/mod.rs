//! Order API Module
//!
//! # Routes
//!
//! | Path | Method | Description | Who |
//! |------|--------|-------------|-----|
//! | /api/orders | POST | Place an order | customer |
//! | /api/orders | GET | List own orders, newest first | any role |
//! | /api/orders/{id} | GET | Full order detail | participants, admin |
//! | /api/orders/{id}/status | PATCH | Advance the lifecycle | merchant, rider |
//! | /api/orders/{id}/cancel | POST | Cancel while the window is open | customer, merchant |
//! | /api/orders/{id}/tracking | GET | Delivery timeline | participants, admin |
//! | /api/orders/{id}/assign | POST | Assign a rider | admin |
//!
//! Every route resolves the actor through the [`CurrentUser`] extractor;
//! requests without a valid bearer token never reach a handler.
//!
//! [`CurrentUser`]: crate::auth::CurrentUser

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/tracking", get(handler::tracking))
        .route("/{id}/assign", post(handler::assign_rider))
}
