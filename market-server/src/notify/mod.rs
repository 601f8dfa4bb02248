//! Notification seam
//!
//! Push/SMS/email dispatch lives in an external collaborator; this trait
//! is the contract order flows call after a commit, always spawned and
//! never inline-blocking the request.

use async_trait::async_trait;
use shared::types::OrderStatus;

#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn order_created(&self, order_id: i64, order_number: &str);
    async fn order_status_changed(&self, order_id: i64, status: OrderStatus);
}

/// Tracing-backed no-op notifier used until a real dispatcher is wired in
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl OrderNotifier for LogNotifier {
    async fn order_created(&self, order_id: i64, order_number: &str) {
        tracing::info!(target: "notify", order_id, order_number, "order created");
    }

    async fn order_status_changed(&self, order_id: i64, status: OrderStatus) {
        tracing::info!(target: "notify", order_id, status = status.as_str(), "order status changed");
    }
}
