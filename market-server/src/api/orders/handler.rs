//! Order API Handlers
//!
//! Handlers stay thin: resolve the actor, delegate to [`OrderService`],
//! wrap the result. Authorization lives in the service and its status
//! gate, not here.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::StatusCode;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::{
    AssignRiderRequest, CancelRequest, CreateOrderRequest, OrderCreated, OrderService,
    OrderSummaryView, OrderView, TrackingView, UpdateStatusRequest,
};
use crate::utils::AppResult;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Place an order from the actor's cart
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderCreated>)> {
    let service = OrderService::from_state(&state);
    let created = service.create_order(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the actor's orders (paginated, newest first)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderSummaryView>>> {
    let service = OrderService::from_state(&state);
    let orders = service.list_orders(&user, query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderView>> {
    let service = OrderService::from_state(&state);
    let order = service.get_order(&user, id).await?;
    Ok(Json(order))
}

/// Advance the order lifecycle by one transition
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<OrderView>> {
    let service = OrderService::from_state(&state);
    service.update_status(&user, id, payload).await?;
    let order = service.get_order(&user, id).await?;
    Ok(Json(order))
}

/// Cancel an order while the cancellation window is open
///
/// The body is optional; a bare POST cancels without a recorded reason.
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    payload: Option<Json<CancelRequest>>,
) -> AppResult<Json<OrderView>> {
    let service = OrderService::from_state(&state);
    let req = payload.map(|Json(req)| req).unwrap_or_default();
    service.cancel_order(&user, id, req).await?;
    let order = service.get_order(&user, id).await?;
    Ok(Json(order))
}

/// Delivery tracking timeline
pub async fn tracking(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<TrackingView>> {
    let service = OrderService::from_state(&state);
    let view = service.track_order(&user, id).await?;
    Ok(Json(view))
}

/// Assign a rider to an order (admin only)
pub async fn assign_rider(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<AssignRiderRequest>,
) -> AppResult<Json<OrderView>> {
    let service = OrderService::from_state(&state);
    service.assign_rider(&user, id, payload).await?;
    let order = service.get_order(&user, id).await?;
    Ok(Json(order))
}
