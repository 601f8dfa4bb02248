//! Order domain
//!
//! The pipeline from cart to stored order and onward through the
//! delivery lifecycle: decimal money helpers, the pricing engine, the
//! quantity cap validator, the status/authorization gate, the response
//! presenter, and the service façade gluing them to storage.

pub mod money;
pub mod presenter;
pub mod pricing;
pub mod quantity;
pub mod service;
pub mod status;

pub use presenter::{OrderSummaryView, OrderView, TrackingView};
pub use service::{
    AssignRiderRequest, CancelRequest, CartItemRequest, CartSelectionRequest, CreateOrderRequest,
    OrderCreated, OrderService, UpdateStatusRequest,
};
pub use status::StatusGate;
