//! Storage models
//!
//! Write models carry their pre-generated snowflake id outside the
//! serialized body (the id becomes the record key); read models get the
//! numeric key back through a `record::id(id) AS id` projection.

use serde::{Deserialize, Serialize};
use shared::types::{ModifierKind, OrderStatus, PaymentStatus};

/// Store row
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRow {
    pub id: i64,
    /// Merchant user id owning this store
    pub owner_id: i64,
    pub name: String,
    pub category: String,
    pub is_active: bool,
}

/// Price, display name and cap of a catalog item
#[derive(Debug, Clone, Deserialize)]
pub struct ItemPricing {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub max_quantity: Option<i64>,
}

/// Normalized modifier row, regardless of which kind table it came from
#[derive(Debug, Clone, Deserialize)]
pub struct ModifierRow {
    pub name: String,
    pub price: f64,
}

/// New order header, written inside the creation transaction
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    #[serde(skip_serializing)]
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub store_id: i64,
    pub merchant_id: i64,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub status: OrderStatus,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
    pub created_at: i64,
}

/// New order line, prices snapshotted at placement
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    #[serde(skip_serializing)]
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
}

/// New line modifier, name and price snapshotted at placement
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderSelection {
    #[serde(skip_serializing)]
    pub id: i64,
    pub order_item_id: i64,
    pub selection_id: i64,
    pub kind: ModifierKind,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// New status history entry
#[derive(Debug, Clone, Serialize)]
pub struct NewHistoryEntry {
    #[serde(skip_serializing)]
    pub id: i64,
    pub order_id: i64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
}

/// Order header as read for gates and status updates
#[derive(Debug, Clone, Deserialize)]
pub struct OrderHeader {
    pub id: i64,
    pub customer_id: i64,
    pub store_id: i64,
    pub merchant_id: i64,
    #[serde(default)]
    pub rider_id: Option<i64>,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Full order detail: header plus lines, modifiers and history
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub store_id: i64,
    pub merchant_id: i64,
    #[serde(default)]
    pub rider_id: Option<i64>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub status: OrderStatus,
    pub delivery_address: String,
    #[serde(default)]
    pub delivery_instructions: Option<String>,
    #[serde(default)]
    pub customer_note: Option<String>,
    #[serde(default)]
    pub merchant_note: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub accepted_at: Option<i64>,
    #[serde(default)]
    pub ready_at: Option<i64>,
    #[serde(default)]
    pub picked_up_at: Option<i64>,
    #[serde(default)]
    pub delivered_at: Option<i64>,
    #[serde(default)]
    pub cancelled_at: Option<i64>,
    #[serde(default)]
    pub items: Vec<OrderItemDetail>,
    #[serde(default)]
    pub history: Vec<StatusHistoryEntry>,
}

impl OrderDetail {
    /// Header view of this detail, as the authorization gate consumes it
    pub fn header(&self) -> OrderHeader {
        OrderHeader {
            id: self.id,
            customer_id: self.customer_id,
            store_id: self.store_id,
            merchant_id: self.merchant_id,
            rider_id: self.rider_id,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// One order line with its modifiers
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemDetail {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
    #[serde(default)]
    pub selections: Vec<SelectionDetail>,
}

/// One line modifier
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionDetail {
    pub selection_id: i64,
    pub kind: ModifierKind,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// One status history entry
#[derive(Debug, Clone, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: i64,
}

/// Order summary row for listings
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummaryRow {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub store_id: i64,
    pub merchant_id: i64,
    #[serde(default)]
    pub rider_id: Option<i64>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total: f64,
    pub created_at: i64,
}
