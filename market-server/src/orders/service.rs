//! Order Service
//!
//! Orchestrates the order pipeline: role check, request validation,
//! store and catalog resolution, quantity caps, decimal pricing, the
//! atomic write, and post-commit notification. Status updates run
//! through the authorization gate before anything mutates. Every
//! storage call is bounded by the configured timeout so "timed out,
//! unknown outcome" surfaces distinctly from "rejected".

use super::money::line_total;
use super::presenter::{
    OrderSummaryView, OrderView, TrackingView, present_order, present_summary, present_tracking,
};
use super::pricing::{PricedLine, PricedModifier, compute_totals};
use super::quantity::{LineQuantity, ModifierQuantity, validate_quantities};
use super::status::StatusGate;
use crate::auth::CurrentUser;
use crate::catalog::CatalogResolver;
use crate::core::ServerState;
use crate::db::models::{
    ItemPricing, ModifierRow, NewHistoryEntry, NewOrder, NewOrderItem, NewOrderSelection,
    OrderHeader,
};
use crate::db::repository::{OrderRepository, RepoError, RepoResult, StoreRepository};
use crate::notify::OrderNotifier;
use crate::security_log;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::types::{ModifierKind, OrderStatus, PaymentStatus, Role};
use shared::util::{now_millis, snowflake_id};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

// ==================== Request / response shapes ====================

/// Cart payload for order placement
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub store_id: i64,
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<CartItemRequest>,
    #[validate(length(min = 1, max = 500, message = "Delivery address is required"))]
    pub delivery_address: String,
    pub delivery_instructions: Option<String>,
    pub customer_note: Option<String>,
    pub payment_method: Option<String>,
}

/// One cart line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartItemRequest {
    pub item_id: i64,
    #[validate(range(min = 1, max = 9999, message = "Quantity must be between 1 and 9999"))]
    pub quantity: i64,
    #[serde(default)]
    #[validate(nested)]
    pub selections: Vec<CartSelectionRequest>,
}

/// One modifier on a cart line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartSelectionRequest {
    pub selection_id: i64,
    pub selection_type: ModifierKind,
    #[validate(range(min = 1, max = 9999, message = "Quantity must be between 1 and 9999"))]
    pub quantity: i64,
}

/// Status transition request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    /// Recorded in the status history
    pub reason: Option<String>,
    /// Lands in the order's merchant note when the actor is the merchant
    pub notes: Option<String>,
}

/// Cancellation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// Admin rider assignment
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRiderRequest {
    pub rider_id: i64,
}

/// Creation receipt returned to the customer
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreated {
    pub order_id: i64,
    pub order_number: String,
    pub status: OrderStatus,
    /// Items subtotal before fee and tax
    pub total_amount: f64,
    /// Grand total including delivery fee and tax
    pub final_amount: f64,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
}

// Cart data after the catalog resolution pass
struct ResolvedLine {
    request: CartItemRequest,
    pricing: ItemPricing,
    modifiers: Vec<ResolvedSelection>,
}

struct ResolvedSelection {
    request: CartSelectionRequest,
    row: ModifierRow,
    cap: Option<i64>,
}

// ==================== Service ====================

/// Order pipeline façade over the repositories
#[derive(Clone)]
pub struct OrderService {
    stores: StoreRepository,
    catalog: CatalogResolver,
    orders: OrderRepository,
    notifier: Arc<dyn OrderNotifier>,
    delivery_fee: f64,
    tax_rate: f64,
    db_timeout: Duration,
}

impl OrderService {
    pub fn from_state(state: &ServerState) -> Self {
        let db = state.db.clone();
        Self {
            stores: StoreRepository::new(db.clone()),
            catalog: CatalogResolver::new(db.clone()),
            orders: OrderRepository::new(db),
            notifier: state.notifier.clone(),
            delivery_fee: state.config.delivery_fee,
            tax_rate: state.config.tax_rate,
            db_timeout: Duration::from_millis(state.config.db_timeout_ms),
        }
    }

    /// Place an order: resolve the whole cart, enforce caps, price it,
    /// and persist everything in one transaction.
    pub async fn create_order(
        &self,
        actor: &CurrentUser,
        req: CreateOrderRequest,
    ) -> AppResult<OrderCreated> {
        if actor.role != Role::Customer {
            return Err(AppError::with_message(
                ErrorCode::RoleRequired,
                "Only customers can place orders",
            ));
        }
        req.validate()
            .map_err(|errors| AppError::validation(errors.to_string()))?;

        let store = self
            .db_call("store.find", self.stores.find_by_id(req.store_id))
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::StoreNotFound).with_detail("store_id", req.store_id)
            })?;
        if !store.is_active {
            return Err(AppError::new(ErrorCode::StoreInactive).with_detail("store_id", store.id));
        }

        // Resolve prices and caps for the whole cart before anything writes
        let mut resolved: Vec<ResolvedLine> = Vec::with_capacity(req.items.len());
        for item in &req.items {
            let pricing = self
                .db_call("catalog.item", self.catalog.resolve_item(item.item_id))
                .await?;
            let mut modifiers = Vec::with_capacity(item.selections.len());
            for selection in &item.selections {
                let row = self
                    .db_call(
                        "catalog.modifier",
                        self.catalog
                            .resolve_modifier(selection.selection_type, selection.selection_id),
                    )
                    .await?;
                let cap = self
                    .db_call(
                        "catalog.modifier_cap",
                        self.catalog.resolve_modifier_cap(
                            item.item_id,
                            selection.selection_type,
                            selection.selection_id,
                        ),
                    )
                    .await?;
                modifiers.push(ResolvedSelection {
                    request: selection.clone(),
                    row,
                    cap,
                });
            }
            resolved.push(ResolvedLine {
                request: item.clone(),
                pricing,
                modifiers,
            });
        }

        // Pre-flight cap gate
        let quantities: Vec<LineQuantity> = resolved
            .iter()
            .map(|line| LineQuantity {
                item_id: line.request.item_id,
                requested: line.request.quantity,
                cap: line.pricing.max_quantity,
                modifiers: line
                    .modifiers
                    .iter()
                    .map(|m| ModifierQuantity {
                        selection_id: m.request.selection_id,
                        kind: m.request.selection_type,
                        requested: m.request.quantity,
                        cap: m.cap,
                    })
                    .collect(),
            })
            .collect();
        validate_quantities(&quantities)?;

        let priced: Vec<PricedLine> = resolved
            .iter()
            .map(|line| PricedLine {
                unit_price: line.pricing.price,
                quantity: line.request.quantity,
                modifiers: line
                    .modifiers
                    .iter()
                    .map(|m| PricedModifier {
                        unit_price: m.row.price,
                        quantity: m.request.quantity,
                    })
                    .collect(),
            })
            .collect();
        let totals = compute_totals(&priced, self.delivery_fee, self.tax_rate);

        let now = now_millis();
        let order_id = snowflake_id();
        let order_number = format!(
            "ORD-{}-{:04X}",
            Utc::now().format("%Y%m%d"),
            order_id & 0xFFFF
        );

        let order = NewOrder {
            id: order_id,
            order_number: order_number.clone(),
            customer_id: actor.id,
            store_id: store.id,
            merchant_id: store.owner_id,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            tax: totals.tax,
            total: totals.total,
            payment_status: PaymentStatus::Pending,
            payment_method: req.payment_method.clone(),
            status: OrderStatus::Pending,
            delivery_address: req.delivery_address.clone(),
            delivery_instructions: req.delivery_instructions.clone(),
            customer_note: req.customer_note.clone(),
            created_at: now,
        };

        let mut items = Vec::with_capacity(resolved.len());
        let mut selections = Vec::new();
        for line in &resolved {
            let item_row_id = snowflake_id();
            items.push(NewOrderItem {
                id: item_row_id,
                order_id,
                item_id: line.request.item_id,
                name: line.pricing.name.clone(),
                unit_price: line.pricing.price,
                quantity: line.request.quantity,
                line_total: line_total(line.pricing.price, line.request.quantity),
            });
            for m in &line.modifiers {
                selections.push(NewOrderSelection {
                    id: snowflake_id(),
                    order_item_id: item_row_id,
                    selection_id: m.request.selection_id,
                    kind: m.request.selection_type,
                    name: m.row.name.clone(),
                    unit_price: m.row.price,
                    quantity: m.request.quantity,
                });
            }
        }
        let history = NewHistoryEntry {
            id: snowflake_id(),
            order_id,
            status: OrderStatus::Pending,
            note: None,
            created_at: now,
        };

        self.db_call(
            "order.create",
            self.orders.create_order(order, items, selections, history),
        )
        .await?;

        tracing::info!(
            order_id,
            order_number = %order_number,
            customer_id = actor.id,
            store_id = store.id,
            total = totals.total,
            "order placed"
        );

        let notifier = self.notifier.clone();
        let notified_number = order_number.clone();
        tokio::spawn(async move {
            notifier.order_created(order_id, &notified_number).await;
        });

        Ok(OrderCreated {
            order_id,
            order_number,
            status: OrderStatus::Pending,
            total_amount: totals.subtotal,
            final_amount: totals.total,
            payment_status: PaymentStatus::Pending,
            created_at: now,
        })
    }

    /// Full order view, gated to participants and admins
    pub async fn get_order(&self, actor: &CurrentUser, order_id: i64) -> AppResult<OrderView> {
        let detail = self
            .db_call("order.detail", self.orders.get_detail(order_id))
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
            })?;
        if let Err(err) = StatusGate::authorize_read(actor, &detail.header()) {
            warn_denied("order.get", actor, order_id, &err);
            return Err(err);
        }

        let store = self
            .db_call("store.find", self.stores.find_by_id(detail.store_id))
            .await?;
        Ok(present_order(&detail, store.as_ref(), actor, now_millis()))
    }

    /// Tracking payload, same viewer gating as the full view
    pub async fn track_order(&self, actor: &CurrentUser, order_id: i64) -> AppResult<TrackingView> {
        let detail = self
            .db_call("order.detail", self.orders.get_detail(order_id))
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
            })?;
        if let Err(err) = StatusGate::authorize_read(actor, &detail.header()) {
            warn_denied("order.track", actor, order_id, &err);
            return Err(err);
        }
        Ok(present_tracking(&detail, now_millis()))
    }

    /// Apply one lifecycle transition after the gate clears it
    pub async fn update_status(
        &self,
        actor: &CurrentUser,
        order_id: i64,
        req: UpdateStatusRequest,
    ) -> AppResult<()> {
        let header = self.require_order(order_id).await?;
        if let Err(err) = StatusGate::authorize(actor, &header, req.status) {
            warn_denied("order.update_status", actor, order_id, &err);
            return Err(err);
        }

        let merchant_note = if actor.role == Role::Merchant {
            req.notes.clone()
        } else {
            None
        };
        let history = NewHistoryEntry {
            id: snowflake_id(),
            order_id,
            status: req.status,
            note: req.reason.clone(),
            created_at: now_millis(),
        };
        self.db_call(
            "order.update_status",
            self.orders.update_status(
                order_id,
                req.status,
                StatusGate::timestamp_field(req.status),
                merchant_note,
                history,
            ),
        )
        .await?;

        tracing::info!(
            order_id,
            actor_id = actor.id,
            role = actor.role.as_str(),
            from = header.status.as_str(),
            to = req.status.as_str(),
            "order status changed"
        );

        let notifier = self.notifier.clone();
        let status = req.status;
        tokio::spawn(async move {
            notifier.order_status_changed(order_id, status).await;
        });
        Ok(())
    }

    /// Cancel an order, restricted to the customer or merchant while the
    /// cancellation window is open
    pub async fn cancel_order(
        &self,
        actor: &CurrentUser,
        order_id: i64,
        req: CancelRequest,
    ) -> AppResult<()> {
        self.update_status(
            actor,
            order_id,
            UpdateStatusRequest {
                status: OrderStatus::Cancelled,
                reason: req.reason,
                notes: None,
            },
        )
        .await
    }

    /// Role-scoped listing, newest first
    pub async fn list_orders(
        &self,
        actor: &CurrentUser,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<OrderSummaryView>> {
        let rows = match actor.role {
            Role::Customer => {
                self.db_call(
                    "order.list",
                    self.orders.list_for_customer(actor.id, limit, offset),
                )
                .await?
            }
            Role::Merchant => {
                self.db_call(
                    "order.list",
                    self.orders.list_for_merchant(actor.id, limit, offset),
                )
                .await?
            }
            Role::Rider => {
                self.db_call(
                    "order.list",
                    self.orders.list_for_rider(actor.id, limit, offset),
                )
                .await?
            }
            Role::Admin => {
                self.db_call("order.list", self.orders.list_all(limit, offset))
                    .await?
            }
        };
        let now = now_millis();
        Ok(rows.iter().map(|row| present_summary(row, now)).collect())
    }

    /// Assign a rider to an order (admin only); rejected once the order
    /// is terminal or already has a rider
    pub async fn assign_rider(
        &self,
        actor: &CurrentUser,
        order_id: i64,
        req: AssignRiderRequest,
    ) -> AppResult<()> {
        if !actor.is_admin() {
            let err = AppError::new(ErrorCode::AdminRequired);
            warn_denied("order.assign_rider", actor, order_id, &err);
            return Err(err);
        }
        let header = self.require_order(order_id).await?;
        if header.status.is_terminal() {
            return Err(
                AppError::new(ErrorCode::OrderTerminal).with_detail("status", header.status.as_str())
            );
        }
        if header.rider_id.is_some() {
            return Err(
                AppError::new(ErrorCode::RiderAlreadyAssigned).with_detail("order_id", order_id)
            );
        }
        self.db_call(
            "order.assign_rider",
            self.orders.assign_rider(order_id, req.rider_id),
        )
        .await?;
        tracing::info!(order_id, rider_id = req.rider_id, admin_id = actor.id, "rider assigned");
        Ok(())
    }

    async fn require_order(&self, order_id: i64) -> AppResult<OrderHeader> {
        self.db_call("order.header", self.orders.get_header(order_id))
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
            })
    }

    /// Run a storage future under the configured timeout
    async fn db_call<T, F>(&self, op: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.db_timeout, fut).await {
            Ok(result) => result.map_err(|err| map_repo_error(op, err)),
            Err(_) => {
                tracing::error!(
                    op,
                    timeout_ms = self.db_timeout.as_millis() as u64,
                    "storage operation timed out"
                );
                Err(AppError::timeout())
            }
        }
    }
}

fn warn_denied(op: &'static str, actor: &CurrentUser, order_id: i64, err: &AppError) {
    tracing::warn!(
        op,
        order_id,
        actor_id = actor.id,
        role = actor.role.as_str(),
        code = %err.code,
        "authorization rejected"
    );
    security_log!(
        "WARN",
        "authorization_denied",
        op = op,
        order_id = order_id,
        actor_id = actor.id
    );
}

fn map_repo_error(op: &'static str, err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
        RepoError::Database(msg) => {
            // Query text and internals stay in the log, not the response
            tracing::error!(op, error = %msg, "database operation failed");
            AppError::database("A storage error occurred")
        }
    }
}
