//! End-to-end order pipeline tests against an in-memory database
//!
//! Run: cargo test -p market-server --test order_flow

use std::sync::Arc;

use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use market_server::auth::{CurrentUser, JwtConfig, JwtService};
use market_server::db::models::{NewHistoryEntry, NewOrder, NewOrderItem, NewOrderSelection};
use market_server::db::repository::OrderRepository;
use market_server::notify::LogNotifier;
use market_server::orders::{
    AssignRiderRequest, CancelRequest, CartItemRequest, CartSelectionRequest, CreateOrderRequest,
    OrderService, UpdateStatusRequest,
};
use market_server::{Config, ErrorCode, ServerState};
use shared::types::{ModifierKind, OrderStatus, PaymentStatus, Role};
use shared::util::{now_millis, snowflake_id};

// ==================== Fixture ====================

const CUSTOMER_ID: i64 = 10;
const OTHER_CUSTOMER_ID: i64 = 11;
const MERCHANT_ID: i64 = 20;
const RIDER_ID: i64 = 30;
const OTHER_RIDER_ID: i64 = 31;

const FOOD_STORE_ID: i64 = 100;
const RETAIL_STORE_ID: i64 = 101;
const INACTIVE_STORE_ID: i64 = 102;

const BURGER_ID: i64 = 1000; // 1000.0, uncapped
const DRINK_ID: i64 = 1001; // 200.0, uncapped
const FRIES_ID: i64 = 1002; // 400.0, capped at 3 per line
const PENCIL_ID: i64 = 1100; // 120.0, generic catalog only

const PACK_ID: i64 = 2000; // 150.0, capped at 2 for the burger
const SIDE_ID: i64 = 2001; // 50.0, uncapped
const SECTION_ID: i64 = 2002; // 30.0, capped at 2 on the section row

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-integration-test".to_string(),
        expiration_minutes: 60,
        issuer: "mango-accounts".to_string(),
        audience: "mango-market".to_string(),
    }
}

async fn test_state() -> ServerState {
    let db: Surreal<Db> = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("mango").use_db("market").await.unwrap();
    market_server::db::schema::apply(&db).await.unwrap();

    let mut config = Config::with_overrides("/tmp/mango-order-flow", 0);
    config.delivery_fee = 500.0;
    config.tax_rate = 0.05;
    config.db_timeout_ms = 10_000;

    let jwt = Arc::new(JwtService::new(jwt_config()));
    let state = ServerState::new(config, db, jwt, Arc::new(LogNotifier));
    seed_catalog(&state.db).await;
    state
}

async fn create_with_id(db: &Surreal<Db>, table: &str, id: i64, content: serde_json::Value) {
    db.query(format!("CREATE type::thing('{table}', $id) CONTENT $content"))
        .bind(("id", id))
        .bind(("content", content))
        .await
        .unwrap()
        .check()
        .unwrap();
}

async fn create_row(db: &Surreal<Db>, table: &str, content: serde_json::Value) {
    db.query(format!("CREATE {table} CONTENT $content"))
        .bind(("content", content))
        .await
        .unwrap()
        .check()
        .unwrap();
}

async fn seed_catalog(db: &Surreal<Db>) {
    create_with_id(
        db,
        "store",
        FOOD_STORE_ID,
        json!({ "owner_id": MERCHANT_ID, "name": "Mango Diner", "category": "food", "is_active": true }),
    )
    .await;
    create_with_id(
        db,
        "store",
        RETAIL_STORE_ID,
        json!({ "owner_id": MERCHANT_ID, "name": "Corner Mart", "category": "retail", "is_active": true }),
    )
    .await;
    create_with_id(
        db,
        "store",
        INACTIVE_STORE_ID,
        json!({ "owner_id": MERCHANT_ID, "name": "Closed Kitchen", "category": "food", "is_active": false }),
    )
    .await;

    create_with_id(
        db,
        "food_item",
        BURGER_ID,
        json!({ "store_id": FOOD_STORE_ID, "name": "Classic Burger", "price": 1000.0, "is_active": true }),
    )
    .await;
    create_with_id(
        db,
        "food_item",
        DRINK_ID,
        json!({ "store_id": FOOD_STORE_ID, "name": "Iced Tea", "price": 200.0, "is_active": true }),
    )
    .await;
    create_with_id(
        db,
        "food_item",
        FRIES_ID,
        json!({ "store_id": FOOD_STORE_ID, "name": "Truffle Fries", "price": 400.0, "max_quantity": 3, "is_active": true }),
    )
    .await;
    create_with_id(
        db,
        "item",
        PENCIL_ID,
        json!({ "store_id": RETAIL_STORE_ID, "name": "HB Pencil", "price": 120.0, "is_active": true }),
    )
    .await;

    create_with_id(
        db,
        "package",
        PACK_ID,
        json!({ "pack_name": "Combo Upgrade", "price": 150.0 }),
    )
    .await;
    create_with_id(
        db,
        "food_side",
        SIDE_ID,
        json!({ "side_name": "Extra Cheese", "extra_price": 50.0 }),
    )
    .await;
    create_with_id(
        db,
        "food_section",
        SECTION_ID,
        json!({ "section_name": "BBQ Dip", "price": 30.0, "max_quantity": 2 }),
    )
    .await;

    create_row(
        db,
        "item_pack",
        json!({ "item_id": BURGER_ID, "pack_id": PACK_ID, "max_quantity": 2 }),
    )
    .await;
    create_row(
        db,
        "item_side",
        json!({ "item_id": BURGER_ID, "side_id": SIDE_ID }),
    )
    .await;
}

fn customer() -> CurrentUser {
    CurrentUser {
        id: CUSTOMER_ID,
        role: Role::Customer,
    }
}

fn other_customer() -> CurrentUser {
    CurrentUser {
        id: OTHER_CUSTOMER_ID,
        role: Role::Customer,
    }
}

fn merchant() -> CurrentUser {
    CurrentUser {
        id: MERCHANT_ID,
        role: Role::Merchant,
    }
}

fn rider() -> CurrentUser {
    CurrentUser {
        id: RIDER_ID,
        role: Role::Rider,
    }
}

fn admin() -> CurrentUser {
    CurrentUser {
        id: 1,
        role: Role::Admin,
    }
}

fn line(item_id: i64, quantity: i64) -> CartItemRequest {
    CartItemRequest {
        item_id,
        quantity,
        selections: Vec::new(),
    }
}

fn selection(selection_id: i64, selection_type: ModifierKind, quantity: i64) -> CartSelectionRequest {
    CartSelectionRequest {
        selection_id,
        selection_type,
        quantity,
    }
}

fn checkout(store_id: i64, items: Vec<CartItemRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        store_id,
        items,
        delivery_address: "12 Mango Lane".to_string(),
        delivery_instructions: None,
        customer_note: None,
        payment_method: Some("card".to_string()),
    }
}

fn transition(status: OrderStatus) -> UpdateStatusRequest {
    UpdateStatusRequest {
        status,
        reason: None,
        notes: None,
    }
}

/// Place the canonical two-burger one-drink order and return its id
async fn place_canonical(service: &OrderService) -> i64 {
    let created = service
        .create_order(
            &customer(),
            checkout(FOOD_STORE_ID, vec![line(BURGER_ID, 2), line(DRINK_ID, 1)]),
        )
        .await
        .unwrap();
    created.order_id
}

/// Record ids currently stored in `table`
async fn table_ids(db: &Surreal<Db>, table: &str) -> Vec<i64> {
    let mut res = db
        .query(format!("SELECT VALUE record::id(id) FROM {table}"))
        .await
        .unwrap();
    res.take(0).unwrap()
}

// ==================== Pricing ====================

#[tokio::test]
async fn canonical_cart_prices_to_the_published_totals() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    let created = service
        .create_order(
            &customer(),
            checkout(FOOD_STORE_ID, vec![line(BURGER_ID, 2), line(DRINK_ID, 1)]),
        )
        .await
        .unwrap();

    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.payment_status, PaymentStatus::Pending);
    assert_eq!(created.total_amount, 2200.0);
    assert_eq!(created.final_amount, 2810.0);
    assert!(created.order_number.starts_with("ORD-"));

    let view = service.get_order(&customer(), created.order_id).await.unwrap();
    assert_eq!(view.subtotal, 2200.0);
    assert_eq!(view.delivery_fee, 500.0);
    assert_eq!(view.tax, 110.0);
    assert_eq!(view.total, 2810.0);
    assert_eq!(view.total, view.subtotal + view.delivery_fee + view.tax);
    assert_eq!(view.status, OrderStatus::Pending);
    assert_eq!(view.customer_id, CUSTOMER_ID);
    assert_eq!(view.merchant_id, MERCHANT_ID);
    assert_eq!(view.rider_id, None);
    assert_eq!(view.items.len(), 2);

    let burger = view.items.iter().find(|i| i.item_id == BURGER_ID).unwrap();
    assert_eq!(burger.name, "Classic Burger");
    assert_eq!(burger.quantity, 2);
    assert_eq!(burger.line_total, 2000.0);

    let tracking = service.track_order(&customer(), created.order_id).await.unwrap();
    assert_eq!(tracking.timeline.len(), 1);
    assert_eq!(tracking.timeline[0].status, OrderStatus::Pending);
}

#[tokio::test]
async fn modifiers_price_into_the_subtotal() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    // Pack quantity sits exactly at its cap of 2
    let mut burger = line(BURGER_ID, 1);
    burger.selections = vec![
        selection(PACK_ID, ModifierKind::Pack, 2),
        selection(SIDE_ID, ModifierKind::Side, 1),
    ];
    let created = service
        .create_order(&customer(), checkout(FOOD_STORE_ID, vec![burger]))
        .await
        .unwrap();

    // 1000 + 2x150 + 50 = 1350; tax 67.5; total 1917.5
    assert_eq!(created.total_amount, 1350.0);
    assert_eq!(created.final_amount, 1917.5);

    let view = service.get_order(&customer(), created.order_id).await.unwrap();
    let item = &view.items[0];
    // Modifiers are priced into the subtotal but never into the line total
    assert_eq!(item.line_total, 1000.0);

    let selections = item.selections.as_ref().unwrap();
    assert_eq!(selections.len(), 2);
    let pack = selections.iter().find(|s| s.selection_id == PACK_ID).unwrap();
    assert_eq!(pack.name, "Combo Upgrade");
    assert_eq!(pack.kind, ModifierKind::Pack);
    assert_eq!(pack.unit_price, 150.0);
    assert_eq!(pack.quantity, 2);
}

// ==================== Quantity caps ====================

#[tokio::test]
async fn item_cap_violation_rejects_the_whole_order() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    let err = service
        .create_order(
            &customer(),
            checkout(FOOD_STORE_ID, vec![line(BURGER_ID, 1), line(FRIES_ID, 5)]),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::QuantityExceedsCap);
    assert!(err.message.contains(&FRIES_ID.to_string()));
    assert!(err.message.contains('3'));
    let details = err.details.unwrap();
    assert_eq!(details.get("item_id").unwrap(), &json!(FRIES_ID));
    assert_eq!(details.get("requested").unwrap(), &json!(5));
    assert_eq!(details.get("max_quantity").unwrap(), &json!(3));

    // Nothing was written, not even the valid first line
    assert!(table_ids(&state.db, "order").await.is_empty());
    assert!(table_ids(&state.db, "order_item").await.is_empty());
}

#[tokio::test]
async fn modifier_cap_violation_rejects_the_whole_order() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    // Pack cap comes from the item_pack link row
    let mut burger = line(BURGER_ID, 1);
    burger.selections = vec![selection(PACK_ID, ModifierKind::Pack, 3)];
    let err = service
        .create_order(&customer(), checkout(FOOD_STORE_ID, vec![burger]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::QuantityExceedsCap);
    let details = err.details.unwrap();
    assert_eq!(details.get("selection_id").unwrap(), &json!(PACK_ID));
    assert_eq!(details.get("kind").unwrap(), &json!("pack"));
    assert_eq!(details.get("max_quantity").unwrap(), &json!(2));

    // Section cap comes from the section row itself
    let mut burger = line(BURGER_ID, 1);
    burger.selections = vec![selection(SECTION_ID, ModifierKind::SectionItem, 3)];
    let err = service
        .create_order(&customer(), checkout(FOOD_STORE_ID, vec![burger]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::QuantityExceedsCap);
    assert_eq!(
        err.details.unwrap().get("kind").unwrap(),
        &json!("section_item")
    );

    assert!(table_ids(&state.db, "order").await.is_empty());
    assert!(table_ids(&state.db, "order_selection").await.is_empty());
}

// ==================== Atomicity ====================

#[tokio::test]
async fn constraint_violation_rolls_back_every_row() {
    let state = test_state().await;
    let repo = OrderRepository::new(state.db.clone());

    let order_id = snowflake_id();
    let item_row_id = snowflake_id();
    let order = NewOrder {
        id: order_id,
        order_number: "ORD-TEST-0001".to_string(),
        customer_id: CUSTOMER_ID,
        store_id: FOOD_STORE_ID,
        merchant_id: MERCHANT_ID,
        subtotal: 1000.0,
        delivery_fee: 500.0,
        tax: 50.0,
        total: 1550.0,
        payment_status: PaymentStatus::Pending,
        payment_method: None,
        status: OrderStatus::Pending,
        delivery_address: "12 Mango Lane".to_string(),
        delivery_instructions: None,
        customer_note: None,
        created_at: now_millis(),
    };
    let items = vec![NewOrderItem {
        id: item_row_id,
        order_id,
        item_id: BURGER_ID,
        name: "Classic Burger".to_string(),
        unit_price: 1000.0,
        quantity: 1,
        line_total: 1000.0,
    }];
    // Quantity 0 violates the order_selection schema assertion
    let selections = vec![NewOrderSelection {
        id: snowflake_id(),
        order_item_id: item_row_id,
        selection_id: PACK_ID,
        kind: ModifierKind::Pack,
        name: "Combo Upgrade".to_string(),
        unit_price: 150.0,
        quantity: 0,
    }];
    let history = NewHistoryEntry {
        id: snowflake_id(),
        order_id,
        status: OrderStatus::Pending,
        note: None,
        created_at: now_millis(),
    };

    let result = repo.create_order(order, items, selections, history).await;
    assert!(result.is_err());

    // The transaction cancelled: no table kept any of the rows
    assert!(table_ids(&state.db, "order").await.is_empty());
    assert!(table_ids(&state.db, "order_item").await.is_empty());
    assert!(table_ids(&state.db, "order_selection").await.is_empty());
    assert!(table_ids(&state.db, "order_status_history").await.is_empty());
}

// ==================== Cart validation ====================

#[tokio::test]
async fn invalid_carts_are_rejected_before_pricing() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    // Empty cart
    let err = service
        .create_order(&customer(), checkout(FOOD_STORE_ID, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    // Unknown store
    let err = service
        .create_order(&customer(), checkout(99_999, vec![line(BURGER_ID, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StoreNotFound);

    // Inactive store
    let err = service
        .create_order(&customer(), checkout(INACTIVE_STORE_ID, vec![line(BURGER_ID, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StoreInactive);

    // Only customers place orders
    let err = service
        .create_order(&merchant(), checkout(FOOD_STORE_ID, vec![line(BURGER_ID, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RoleRequired);

    assert!(table_ids(&state.db, "order").await.is_empty());
}

// ==================== Missing catalog rows ====================

#[tokio::test]
async fn unknown_item_falls_back_to_zero_price() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    let created = service
        .create_order(&customer(), checkout(FOOD_STORE_ID, vec![line(424_242, 1)]))
        .await
        .unwrap();

    // Subtotal 0, so the total is the delivery fee alone
    assert_eq!(created.total_amount, 0.0);
    assert_eq!(created.final_amount, 500.0);

    let view = service.get_order(&customer(), created.order_id).await.unwrap();
    let item = &view.items[0];
    assert_eq!(item.name, "Item");
    assert_eq!(item.unit_price, 0.0);
}

#[tokio::test]
async fn unknown_modifier_falls_back_to_zero_price() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    let mut burger = line(BURGER_ID, 1);
    burger.selections = vec![selection(888_888, ModifierKind::Pack, 1)];
    let created = service
        .create_order(&customer(), checkout(FOOD_STORE_ID, vec![burger]))
        .await
        .unwrap();

    // 1000 + 0 + 500 + 50 tax
    assert_eq!(created.final_amount, 1550.0);

    let view = service.get_order(&customer(), created.order_id).await.unwrap();
    let selections = view.items[0].selections.as_ref().unwrap();
    assert_eq!(selections[0].name, "Selection");
    assert_eq!(selections[0].unit_price, 0.0);
}

#[tokio::test]
async fn generic_catalog_backs_retail_stores() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    let created = service
        .create_order(&customer(), checkout(RETAIL_STORE_ID, vec![line(PENCIL_ID, 3)]))
        .await
        .unwrap();
    // 3x120 = 360; tax 18; total 878
    assert_eq!(created.total_amount, 360.0);
    assert_eq!(created.final_amount, 878.0);

    let view = service.get_order(&customer(), created.order_id).await.unwrap();
    let item = &view.items[0];
    assert_eq!(item.name, "HB Pencil");
    // Retail views never carry a selections block
    assert!(item.selections.is_none());
}

// ==================== Lifecycle ====================

#[tokio::test]
async fn lifecycle_happy_path_runs_to_delivered() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let order_id = place_canonical(&service).await;

    // Merchant accepts with a note for the kitchen
    service
        .update_status(
            &merchant(),
            order_id,
            UpdateStatusRequest {
                status: OrderStatus::Accepted,
                reason: None,
                notes: Some("Packing now".to_string()),
            },
        )
        .await
        .unwrap();

    // The note is merchant-only
    let merchant_view = service.get_order(&merchant(), order_id).await.unwrap();
    assert_eq!(merchant_view.merchant_note.as_deref(), Some("Packing now"));
    let customer_view = service.get_order(&customer(), order_id).await.unwrap();
    assert!(customer_view.merchant_note.is_none());

    service
        .update_status(&merchant(), order_id, transition(OrderStatus::Preparing))
        .await
        .unwrap();
    service
        .update_status(&merchant(), order_id, transition(OrderStatus::ReadyForPickup))
        .await
        .unwrap();

    service
        .assign_rider(&admin(), order_id, AssignRiderRequest { rider_id: RIDER_ID })
        .await
        .unwrap();

    service
        .update_status(&rider(), order_id, transition(OrderStatus::InTransit))
        .await
        .unwrap();
    service
        .update_status(&rider(), order_id, transition(OrderStatus::Delivered))
        .await
        .unwrap();

    let tracking = service.track_order(&customer(), order_id).await.unwrap();
    assert_eq!(tracking.status, OrderStatus::Delivered);
    assert!(tracking.accepted_at.is_some());
    assert!(tracking.ready_at.is_some());
    assert!(tracking.picked_up_at.is_some());
    assert!(tracking.delivered_at.is_some());
    assert!(tracking.cancelled_at.is_none());
    assert_eq!(tracking.timeline.len(), 6);

    // Terminal orders accept nothing further
    let err = service
        .update_status(&merchant(), order_id, transition(OrderStatus::Preparing))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderTerminal);
}

#[tokio::test]
async fn lifecycle_authorization_matrix() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let order_id = place_canonical(&service).await;

    // Customers cannot drive kitchen transitions
    let err = service
        .update_status(&customer(), order_id, transition(OrderStatus::Accepted))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    // Nor can admins; lifecycle transitions belong to the participants
    let err = service
        .update_status(&admin(), order_id, transition(OrderStatus::Accepted))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    // A merchant who does not own the store is turned away
    let foreign_merchant = CurrentUser {
        id: 9999,
        role: Role::Merchant,
    };
    let err = service
        .update_status(&foreign_merchant, order_id, transition(OrderStatus::Accepted))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StoreNotOwned);

    // Skipping ahead is not a legal edge
    let err = service
        .update_status(&merchant(), order_id, transition(OrderStatus::Preparing))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

    // Walk to READY_FOR_PICKUP legitimately
    for status in [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::ReadyForPickup,
    ] {
        service
            .update_status(&merchant(), order_id, transition(status))
            .await
            .unwrap();
    }

    // No rider assigned yet: the pickup transition is blocked
    let err = service
        .update_status(&rider(), order_id, transition(OrderStatus::InTransit))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RiderNotAssigned);

    service
        .assign_rider(&admin(), order_id, AssignRiderRequest { rider_id: RIDER_ID })
        .await
        .unwrap();

    // A different rider cannot act on the order
    let other_rider = CurrentUser {
        id: OTHER_RIDER_ID,
        role: Role::Rider,
    };
    let err = service
        .update_status(&other_rider, order_id, transition(OrderStatus::InTransit))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOrderParticipant);

    // The assigned rider proceeds
    service
        .update_status(&rider(), order_id, transition(OrderStatus::InTransit))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancellation_window_and_parties() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    // Customer cancels a pending order, reason lands in the history
    let order_id = place_canonical(&service).await;
    service
        .cancel_order(
            &customer(),
            order_id,
            CancelRequest {
                reason: Some("Ordered twice by mistake".to_string()),
            },
        )
        .await
        .unwrap();
    let tracking = service.track_order(&customer(), order_id).await.unwrap();
    assert_eq!(tracking.status, OrderStatus::Cancelled);
    assert!(tracking.cancelled_at.is_some());
    let cancelled_entry = tracking
        .timeline
        .iter()
        .find(|e| e.status == OrderStatus::Cancelled)
        .unwrap();
    assert_eq!(
        cancelled_entry.note.as_deref(),
        Some("Ordered twice by mistake")
    );

    // The merchant may cancel while the order is still in the kitchen
    let order_id = place_canonical(&service).await;
    service
        .update_status(&merchant(), order_id, transition(OrderStatus::Accepted))
        .await
        .unwrap();
    service
        .cancel_order(&merchant(), order_id, CancelRequest::default())
        .await
        .unwrap();

    // Riders are never a cancelling party
    let order_id = place_canonical(&service).await;
    let err = service
        .cancel_order(&rider(), order_id, CancelRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    // A customer who does not own the order is not a party either
    let err = service
        .cancel_order(&other_customer(), order_id, CancelRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOrderParticipant);

    // Once the order is ready for pickup the window has closed
    for status in [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::ReadyForPickup,
    ] {
        service
            .update_status(&merchant(), order_id, transition(status))
            .await
            .unwrap();
    }
    let err = service
        .cancel_order(&customer(), order_id, CancelRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CancellationWindowClosed);
}

// ==================== Rider assignment ====================

#[tokio::test]
async fn rider_assignment_rules() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let order_id = place_canonical(&service).await;

    // Only admins dispatch riders
    let err = service
        .assign_rider(&merchant(), order_id, AssignRiderRequest { rider_id: RIDER_ID })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AdminRequired);

    service
        .assign_rider(&admin(), order_id, AssignRiderRequest { rider_id: RIDER_ID })
        .await
        .unwrap();
    let view = service.get_order(&admin(), order_id).await.unwrap();
    assert_eq!(view.rider_id, Some(RIDER_ID));

    // No silent reassignment
    let err = service
        .assign_rider(
            &admin(),
            order_id,
            AssignRiderRequest {
                rider_id: OTHER_RIDER_ID,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RiderAlreadyAssigned);

    // Terminal orders cannot be dispatched
    let cancelled_id = place_canonical(&service).await;
    service
        .cancel_order(&customer(), cancelled_id, CancelRequest::default())
        .await
        .unwrap();
    let err = service
        .assign_rider(&admin(), cancelled_id, AssignRiderRequest { rider_id: RIDER_ID })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderTerminal);
}

// ==================== Read gating ====================

#[tokio::test]
async fn strangers_cannot_read_or_track_an_order() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);
    let order_id = place_canonical(&service).await;

    let err = service.get_order(&other_customer(), order_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOrderParticipant);
    let err = service.track_order(&other_customer(), order_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOrderParticipant);

    // Admins can always read
    assert!(service.get_order(&admin(), order_id).await.is_ok());

    // Missing orders surface as such
    let err = service.get_order(&customer(), 5).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

// ==================== Listing ====================

#[tokio::test]
async fn listing_is_scoped_by_role() {
    let state = test_state().await;
    let service = OrderService::from_state(&state);

    let first = place_canonical(&service).await;
    place_canonical(&service).await;
    service
        .create_order(
            &other_customer(),
            checkout(FOOD_STORE_ID, vec![line(DRINK_ID, 1)]),
        )
        .await
        .unwrap();

    let mine = service.list_orders(&customer(), 50, 0).await.unwrap();
    assert_eq!(mine.len(), 2);
    let theirs = service.list_orders(&other_customer(), 50, 0).await.unwrap();
    assert_eq!(theirs.len(), 1);

    // The merchant sees every order of the store, the admin sees everything
    let store_orders = service.list_orders(&merchant(), 50, 0).await.unwrap();
    assert_eq!(store_orders.len(), 3);
    let all = service.list_orders(&admin(), 50, 0).await.unwrap();
    assert_eq!(all.len(), 3);

    // Riders see nothing until dispatched
    let runs = service.list_orders(&rider(), 50, 0).await.unwrap();
    assert!(runs.is_empty());
    service
        .assign_rider(&admin(), first, AssignRiderRequest { rider_id: RIDER_ID })
        .await
        .unwrap();
    let runs = service.list_orders(&rider(), 50, 0).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].order_id, first);

    let summary = &mine[0];
    assert!(summary.order_number.starts_with("ORD-"));
    assert_eq!(summary.time_ago, "Just now");
    assert!(summary.total > 0.0);
}
