//! Order Repository
//!
//! Order rows live behind numeric snowflake keys. Creation and status
//! mutation run as multi-statement `BEGIN TRANSACTION; ...; COMMIT
//! TRANSACTION;` scripts so a failed step leaves nothing behind.

use super::{BaseRepository, RepoResult};
use crate::db::models::{
    NewHistoryEntry, NewOrder, NewOrderItem, NewOrderSelection, OrderDetail, OrderHeader,
    OrderSummaryRow,
};
use shared::types::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

const SUMMARY_FIELDS: &str = "record::id(id) AS id, order_number, customer_id, store_id, \
                              merchant_id, rider_id, status, payment_status, total, created_at";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist the order header, all line items, their modifiers and the
    /// initial history entry in one transaction.
    ///
    /// Every record id is pre-generated by the caller; any statement
    /// failure (including a schema ASSERT) cancels the whole script.
    pub async fn create_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
        selections: Vec<NewOrderSelection>,
        history: NewHistoryEntry,
    ) -> RepoResult<()> {
        let mut script = String::from("BEGIN TRANSACTION;\n");
        script.push_str("CREATE type::thing('order', $order_id) CONTENT $order;\n");
        for i in 0..items.len() {
            script.push_str(&format!(
                "CREATE type::thing('order_item', $item_id_{i}) CONTENT $item_{i};\n"
            ));
        }
        for i in 0..selections.len() {
            script.push_str(&format!(
                "CREATE type::thing('order_selection', $sel_id_{i}) CONTENT $sel_{i};\n"
            ));
        }
        script.push_str(
            "CREATE type::thing('order_status_history', $history_id) CONTENT $history;\n",
        );
        script.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(script)
            .bind(("order_id", order.id))
            .bind(("order", order))
            .bind(("history_id", history.id))
            .bind(("history", history));
        for (i, item) in items.into_iter().enumerate() {
            query = query
                .bind((format!("item_id_{i}"), item.id))
                .bind((format!("item_{i}"), item));
        }
        for (i, selection) in selections.into_iter().enumerate() {
            query = query
                .bind((format!("sel_id_{i}"), selection.id))
                .bind((format!("sel_{i}"), selection));
        }

        let response = query.await?;
        response.check()?;
        Ok(())
    }

    /// Header fields used by the authorization gate
    pub async fn get_header(&self, order_id: i64) -> RepoResult<Option<OrderHeader>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT record::id(id) AS id, customer_id, store_id, merchant_id, rider_id, \
                 status, created_at FROM order WHERE id = $id",
            )
            .bind(("id", RecordId::from_table_key(TABLE, order_id)))
            .await?;
        let rows: Vec<OrderHeader> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Full order graph: header, lines with their modifiers, and history
    pub async fn get_detail(&self, order_id: i64) -> RepoResult<Option<OrderDetail>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    record::id(id) AS id,
                    order_number,
                    customer_id,
                    store_id,
                    merchant_id,
                    rider_id,
                    subtotal,
                    delivery_fee,
                    tax,
                    total,
                    payment_status,
                    payment_method,
                    status,
                    delivery_address,
                    delivery_instructions,
                    customer_note,
                    merchant_note,
                    created_at,
                    accepted_at,
                    ready_at,
                    picked_up_at,
                    delivered_at,
                    cancelled_at,
                    (
                        SELECT
                            record::id(id) AS id,
                            item_id,
                            name,
                            unit_price,
                            quantity,
                            line_total,
                            (
                                SELECT
                                    selection_id,
                                    kind,
                                    name,
                                    unit_price,
                                    quantity
                                FROM order_selection
                                WHERE order_item_id = record::id($parent.id)
                            ) AS selections
                        FROM order_item
                        WHERE order_id = $oid
                        ORDER BY id
                    ) AS items,
                    (
                        SELECT status, note, created_at
                        FROM order_status_history
                        WHERE order_id = $oid
                        ORDER BY created_at
                    ) AS history
                FROM order WHERE id = $id
                "#,
            )
            .bind(("id", RecordId::from_table_key(TABLE, order_id)))
            .bind(("oid", order_id))
            .await?;
        let rows: Vec<OrderDetail> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Apply a status transition and append its history entry atomically.
    ///
    /// `timestamp_field` names the lifecycle column stamped by this
    /// transition, if any; `merchant_note` lands on the order when present.
    pub async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        timestamp_field: Option<&'static str>,
        merchant_note: Option<String>,
        history: NewHistoryEntry,
    ) -> RepoResult<()> {
        let history_id = history.id;
        let stamped_at = history.created_at;

        let mut set_parts = vec!["status = $status".to_string()];
        if let Some(field) = timestamp_field {
            set_parts.push(format!("{field} = $stamped_at"));
        }
        if merchant_note.is_some() {
            set_parts.push("merchant_note = $merchant_note".to_string());
        }

        let script = format!(
            "BEGIN TRANSACTION;\n\
             UPDATE type::thing('order', $order_id) SET {};\n\
             CREATE type::thing('order_status_history', $history_id) CONTENT $history;\n\
             COMMIT TRANSACTION;",
            set_parts.join(", ")
        );

        let mut query = self
            .base
            .db()
            .query(script)
            .bind(("order_id", order_id))
            .bind(("status", status))
            .bind(("history_id", history_id))
            .bind(("history", history));
        if timestamp_field.is_some() {
            query = query.bind(("stamped_at", stamped_at));
        }
        if let Some(note) = merchant_note {
            query = query.bind(("merchant_note", note));
        }

        let response = query.await?;
        response.check()?;
        Ok(())
    }

    /// Set the assigned rider on an order
    pub async fn assign_rider(&self, order_id: i64, rider_id: i64) -> RepoResult<()> {
        let response = self
            .base
            .db()
            .query("UPDATE type::thing('order', $order_id) SET rider_id = $rider_id")
            .bind(("order_id", order_id))
            .bind(("rider_id", rider_id))
            .await?;
        response.check()?;
        Ok(())
    }

    /// Orders placed by a customer, newest first
    pub async fn list_for_customer(
        &self,
        customer_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<OrderSummaryRow>> {
        self.list_where("WHERE customer_id = $who", Some(customer_id), limit, offset)
            .await
    }

    /// Orders of stores owned by a merchant, newest first
    pub async fn list_for_merchant(
        &self,
        merchant_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<OrderSummaryRow>> {
        self.list_where("WHERE merchant_id = $who", Some(merchant_id), limit, offset)
            .await
    }

    /// Orders assigned to a rider, newest first
    pub async fn list_for_rider(
        &self,
        rider_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<OrderSummaryRow>> {
        self.list_where("WHERE rider_id = $who", Some(rider_id), limit, offset)
            .await
    }

    /// All orders, newest first
    pub async fn list_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<OrderSummaryRow>> {
        self.list_where("", None, limit, offset).await
    }

    async fn list_where(
        &self,
        filter: &str,
        who: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<OrderSummaryRow>> {
        // limit/offset are interpolated, not bound: they are server-side
        // values already clamped to a sane window
        let limit = limit.clamp(1, 200);
        let offset = offset.max(0);
        let sql = format!(
            "SELECT {SUMMARY_FIELDS} FROM order {filter} \
             ORDER BY created_at DESC LIMIT {limit} START {offset}"
        );
        let mut query = self.base.db().query(sql);
        if let Some(who) = who {
            query = query.bind(("who", who));
        }
        let mut result = query.await?;
        let rows: Vec<OrderSummaryRow> = result.take(0)?;
        Ok(rows)
    }
}
