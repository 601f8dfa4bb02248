//! Order Presenter
//!
//! Shapes a stored order graph for a given viewer. Food stores render
//! each line's modifiers, non-food stores omit them; the merchant note
//! stays between the merchant and admins; the affordance flags fall out
//! of the status machine alone.

use crate::auth::CurrentUser;
use crate::db::models::{OrderDetail, OrderSummaryRow, StoreRow};
use crate::utils::time::time_ago;
use serde::Serialize;
use shared::types::{ModifierKind, OrderStatus, PaymentStatus, Role};

/// Full order response shape
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order_id: i64,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub store_id: i64,
    pub customer_id: i64,
    pub merchant_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_id: Option<i64>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
    /// Only rendered for the merchant and admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_note: Option<String>,
    pub items: Vec<ItemView>,
    pub created_at: i64,
    pub time_ago: String,
    pub can_cancel: bool,
    pub can_accept: bool,
    pub can_prepare: bool,
    pub can_ready: bool,
}

/// One rendered line item
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub item_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
    /// Present for food stores only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selections: Option<Vec<SelectionView>>,
}

/// One rendered line modifier
#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub selection_id: i64,
    pub kind: ModifierKind,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Listing row shape
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummaryView {
    pub order_id: i64,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub store_id: i64,
    pub total: f64,
    pub created_at: i64,
    pub time_ago: String,
}

/// Tracking payload: current status, lifecycle timestamps, and the
/// append-only history as a timeline
#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub order_id: i64,
    pub order_number: String,
    pub status: OrderStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    pub timeline: Vec<TimelineEntry>,
}

/// One step of the tracking timeline
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub time_ago: String,
}

/// Store categories mentioning food or restaurants render modifiers
pub fn is_food_store(category: &str) -> bool {
    let lower = category.to_lowercase();
    lower.contains("food") || lower.contains("restaurant")
}

/// Render the full order view for a viewer.
///
/// `store` may be gone for very old orders; those render as non-food.
pub fn present_order(
    detail: &OrderDetail,
    store: Option<&StoreRow>,
    viewer: &CurrentUser,
    now: i64,
) -> OrderView {
    let food = store.map(|s| is_food_store(&s.category)).unwrap_or(false);

    let items = detail
        .items
        .iter()
        .map(|item| ItemView {
            item_id: item.item_id,
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total,
            selections: food.then(|| {
                item.selections
                    .iter()
                    .map(|sel| SelectionView {
                        selection_id: sel.selection_id,
                        kind: sel.kind,
                        name: sel.name.clone(),
                        unit_price: sel.unit_price,
                        quantity: sel.quantity,
                    })
                    .collect()
            }),
        })
        .collect();

    let merchant_note = match viewer.role {
        Role::Merchant | Role::Admin => detail.merchant_note.clone(),
        Role::Customer | Role::Rider => None,
    };

    OrderView {
        order_id: detail.id,
        order_number: detail.order_number.clone(),
        status: detail.status,
        payment_status: detail.payment_status,
        payment_method: detail.payment_method.clone(),
        store_id: detail.store_id,
        customer_id: detail.customer_id,
        merchant_id: detail.merchant_id,
        rider_id: detail.rider_id,
        subtotal: detail.subtotal,
        delivery_fee: detail.delivery_fee,
        tax: detail.tax,
        total: detail.total,
        delivery_address: detail.delivery_address.clone(),
        delivery_instructions: detail.delivery_instructions.clone(),
        customer_note: detail.customer_note.clone(),
        merchant_note,
        items,
        created_at: detail.created_at,
        time_ago: time_ago(detail.created_at, now),
        can_cancel: detail.status.can_cancel(),
        can_accept: detail.status == OrderStatus::Pending,
        can_prepare: detail.status == OrderStatus::Accepted,
        can_ready: detail.status == OrderStatus::Preparing,
    }
}

/// Render one listing row
pub fn present_summary(row: &OrderSummaryRow, now: i64) -> OrderSummaryView {
    OrderSummaryView {
        order_id: row.id,
        order_number: row.order_number.clone(),
        status: row.status,
        payment_status: row.payment_status,
        store_id: row.store_id,
        total: row.total,
        created_at: row.created_at,
        time_ago: time_ago(row.created_at, now),
    }
}

/// Render the tracking payload
pub fn present_tracking(detail: &OrderDetail, now: i64) -> TrackingView {
    TrackingView {
        order_id: detail.id,
        order_number: detail.order_number.clone(),
        status: detail.status,
        created_at: detail.created_at,
        accepted_at: detail.accepted_at,
        ready_at: detail.ready_at,
        picked_up_at: detail.picked_up_at,
        delivered_at: detail.delivered_at,
        cancelled_at: detail.cancelled_at,
        timeline: detail
            .history
            .iter()
            .map(|entry| TimelineEntry {
                status: entry.status,
                note: entry.note.clone(),
                created_at: entry.created_at,
                time_ago: time_ago(entry.created_at, now),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderItemDetail, SelectionDetail, StatusHistoryEntry};

    fn viewer(role: Role, id: i64) -> CurrentUser {
        CurrentUser { id, role }
    }

    fn store(category: &str) -> StoreRow {
        StoreRow {
            id: 100,
            owner_id: 20,
            name: "Test Store".to_string(),
            category: category.to_string(),
            is_active: true,
        }
    }

    fn sample_detail(status: OrderStatus, created_at: i64) -> OrderDetail {
        OrderDetail {
            id: 900,
            order_number: "ORD-20260823-00AB".to_string(),
            customer_id: 10,
            store_id: 100,
            merchant_id: 20,
            rider_id: None,
            subtotal: 2200.0,
            delivery_fee: 500.0,
            tax: 110.0,
            total: 2810.0,
            payment_status: PaymentStatus::Pending,
            payment_method: Some("cash".to_string()),
            status,
            delivery_address: "1 Mango Street".to_string(),
            delivery_instructions: None,
            customer_note: None,
            merchant_note: Some("extra napkins packed".to_string()),
            created_at,
            accepted_at: None,
            ready_at: None,
            picked_up_at: None,
            delivered_at: None,
            cancelled_at: None,
            items: vec![OrderItemDetail {
                id: 1,
                item_id: 7,
                name: "Jollof Rice".to_string(),
                unit_price: 1000.0,
                quantity: 2,
                line_total: 2000.0,
                selections: vec![SelectionDetail {
                    selection_id: 3,
                    kind: ModifierKind::Side,
                    name: "Plantain".to_string(),
                    unit_price: 200.0,
                    quantity: 1,
                }],
            }],
            history: vec![StatusHistoryEntry {
                status: OrderStatus::Pending,
                note: None,
                created_at,
            }],
        }
    }

    #[test]
    fn food_stores_render_selections() {
        let detail = sample_detail(OrderStatus::Pending, 0);
        let view = present_order(&detail, Some(&store("Fast Food")), &viewer(Role::Customer, 10), 0);
        let selections = view.items[0].selections.as_ref().unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].name, "Plantain");
    }

    #[test]
    fn non_food_stores_omit_selections() {
        let detail = sample_detail(OrderStatus::Pending, 0);
        let view = present_order(&detail, Some(&store("Electronics")), &viewer(Role::Customer, 10), 0);
        assert!(view.items[0].selections.is_none());
    }

    #[test]
    fn restaurant_counts_as_food() {
        assert!(is_food_store("Italian Restaurant"));
        assert!(is_food_store("FOOD COURT"));
        assert!(!is_food_store("Grocery"));
        assert!(!is_food_store("Pharmacy"));
    }

    #[test]
    fn merchant_note_is_for_merchant_eyes() {
        let detail = sample_detail(OrderStatus::Pending, 0);
        let s = store("Fast Food");

        let customer = present_order(&detail, Some(&s), &viewer(Role::Customer, 10), 0);
        assert!(customer.merchant_note.is_none());

        let rider = present_order(&detail, Some(&s), &viewer(Role::Rider, 30), 0);
        assert!(rider.merchant_note.is_none());

        let merchant = present_order(&detail, Some(&s), &viewer(Role::Merchant, 20), 0);
        assert_eq!(merchant.merchant_note.as_deref(), Some("extra napkins packed"));

        let admin = present_order(&detail, Some(&s), &viewer(Role::Admin, 1), 0);
        assert!(admin.merchant_note.is_some());
    }

    #[test]
    fn affordances_follow_status() {
        let s = store("Fast Food");
        let pending = present_order(
            &sample_detail(OrderStatus::Pending, 0),
            Some(&s),
            &viewer(Role::Customer, 10),
            0,
        );
        assert!(pending.can_cancel && pending.can_accept);
        assert!(!pending.can_prepare && !pending.can_ready);

        let preparing = present_order(
            &sample_detail(OrderStatus::Preparing, 0),
            Some(&s),
            &viewer(Role::Customer, 10),
            0,
        );
        assert!(preparing.can_cancel && preparing.can_ready);
        assert!(!preparing.can_accept && !preparing.can_prepare);

        let delivered = present_order(
            &sample_detail(OrderStatus::Delivered, 0),
            Some(&s),
            &viewer(Role::Customer, 10),
            0,
        );
        assert!(
            !delivered.can_cancel
                && !delivered.can_accept
                && !delivered.can_prepare
                && !delivered.can_ready
        );
    }

    #[test]
    fn relative_age_renders_human_words() {
        let now = 1_700_000_000_000;
        let s = store("Fast Food");

        let young = present_order(
            &sample_detail(OrderStatus::Pending, now - 30_000),
            Some(&s),
            &viewer(Role::Customer, 10),
            now,
        );
        assert_eq!(young.time_ago, "Just now");

        let older = present_order(
            &sample_detail(OrderStatus::Pending, now - 90_000),
            Some(&s),
            &viewer(Role::Customer, 10),
            now,
        );
        assert_eq!(older.time_ago, "1 min ago");
    }

    #[test]
    fn tracking_exposes_the_timeline() {
        let mut detail = sample_detail(OrderStatus::Accepted, 1000);
        detail.accepted_at = Some(2000);
        detail.history.push(StatusHistoryEntry {
            status: OrderStatus::Accepted,
            note: Some("on it".to_string()),
            created_at: 2000,
        });

        let tracking = present_tracking(&detail, 2000);
        assert_eq!(tracking.status, OrderStatus::Accepted);
        assert_eq!(tracking.accepted_at, Some(2000));
        assert_eq!(tracking.timeline.len(), 2);
        assert_eq!(tracking.timeline[1].note.as_deref(), Some("on it"));
    }

    #[test]
    fn missing_store_renders_as_non_food() {
        let detail = sample_detail(OrderStatus::Pending, 0);
        let view = present_order(&detail, None, &viewer(Role::Customer, 10), 0);
        assert!(view.items[0].selections.is_none());
    }
}
