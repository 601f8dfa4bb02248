//! Database schema
//!
//! Table, field and index definitions applied at startup. `OVERWRITE`
//! keeps the statements idempotent across restarts and lets a newer build
//! tighten a definition in place.
//!
//! Record keys are snowflake i64 values generated by the application
//! (`shared::util::snowflake_id`); cross-table references store the plain
//! numeric key in an `*_id` int field rather than a record link, matching
//! the ids that travel over the wire.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::utils::AppError;

const SCHEMA: &str = r#"
-- Stores
DEFINE TABLE OVERWRITE store SCHEMAFULL;
DEFINE FIELD OVERWRITE owner_id ON store TYPE int;
DEFINE FIELD OVERWRITE name ON store TYPE string;
DEFINE FIELD OVERWRITE category ON store TYPE string;
DEFINE FIELD OVERWRITE is_active ON store TYPE bool DEFAULT true;

-- Generic catalog items
DEFINE TABLE OVERWRITE item SCHEMAFULL;
DEFINE FIELD OVERWRITE store_id ON item TYPE int;
DEFINE FIELD OVERWRITE name ON item TYPE string;
DEFINE FIELD OVERWRITE price ON item TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE max_quantity ON item TYPE option<int>;
DEFINE FIELD OVERWRITE is_active ON item TYPE bool DEFAULT true;
DEFINE INDEX OVERWRITE item_store ON item FIELDS store_id;

-- Food catalog items (consulted before the generic catalog)
DEFINE TABLE OVERWRITE food_item SCHEMAFULL;
DEFINE FIELD OVERWRITE store_id ON food_item TYPE int;
DEFINE FIELD OVERWRITE name ON food_item TYPE string;
DEFINE FIELD OVERWRITE price ON food_item TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE max_quantity ON food_item TYPE option<int>;
DEFINE FIELD OVERWRITE is_active ON food_item TYPE bool DEFAULT true;
DEFINE INDEX OVERWRITE food_item_store ON food_item FIELDS store_id;

-- Modifier tables, one per kind, legacy column names preserved
DEFINE TABLE OVERWRITE package SCHEMAFULL;
DEFINE FIELD OVERWRITE pack_name ON package TYPE string;
DEFINE FIELD OVERWRITE price ON package TYPE number ASSERT $value >= 0;

DEFINE TABLE OVERWRITE food_side SCHEMAFULL;
DEFINE FIELD OVERWRITE side_name ON food_side TYPE string;
DEFINE FIELD OVERWRITE extra_price ON food_side TYPE number ASSERT $value >= 0;

DEFINE TABLE OVERWRITE food_section SCHEMAFULL;
DEFINE FIELD OVERWRITE section_name ON food_section TYPE string;
DEFINE FIELD OVERWRITE price ON food_section TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE max_quantity ON food_section TYPE option<int>;

-- Per-item quantity caps for packs and sides
DEFINE TABLE OVERWRITE item_pack SCHEMAFULL;
DEFINE FIELD OVERWRITE item_id ON item_pack TYPE int;
DEFINE FIELD OVERWRITE pack_id ON item_pack TYPE int;
DEFINE FIELD OVERWRITE max_quantity ON item_pack TYPE option<int>;
DEFINE INDEX OVERWRITE item_pack_key ON item_pack FIELDS item_id, pack_id UNIQUE;

DEFINE TABLE OVERWRITE item_side SCHEMAFULL;
DEFINE FIELD OVERWRITE item_id ON item_side TYPE int;
DEFINE FIELD OVERWRITE side_id ON item_side TYPE int;
DEFINE FIELD OVERWRITE max_quantity ON item_side TYPE option<int>;
DEFINE INDEX OVERWRITE item_side_key ON item_side FIELDS item_id, side_id UNIQUE;

-- Order headers
DEFINE TABLE OVERWRITE order SCHEMAFULL;
DEFINE FIELD OVERWRITE order_number ON order TYPE string;
DEFINE FIELD OVERWRITE customer_id ON order TYPE int;
DEFINE FIELD OVERWRITE store_id ON order TYPE int;
DEFINE FIELD OVERWRITE merchant_id ON order TYPE int;
DEFINE FIELD OVERWRITE rider_id ON order TYPE option<int>;
DEFINE FIELD OVERWRITE subtotal ON order TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE delivery_fee ON order TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE tax ON order TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE total ON order TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE payment_status ON order TYPE string
    ASSERT $value INSIDE ['PENDING', 'PAID', 'FAILED', 'REFUNDED'];
DEFINE FIELD OVERWRITE payment_method ON order TYPE option<string>;
DEFINE FIELD OVERWRITE status ON order TYPE string
    ASSERT $value INSIDE ['PENDING', 'ACCEPTED', 'PREPARING', 'READY_FOR_PICKUP', 'IN_TRANSIT', 'DELIVERED', 'CANCELLED'];
DEFINE FIELD OVERWRITE delivery_address ON order TYPE string;
DEFINE FIELD OVERWRITE delivery_instructions ON order TYPE option<string>;
DEFINE FIELD OVERWRITE customer_note ON order TYPE option<string>;
DEFINE FIELD OVERWRITE merchant_note ON order TYPE option<string>;
DEFINE FIELD OVERWRITE created_at ON order TYPE int;
DEFINE FIELD OVERWRITE accepted_at ON order TYPE option<int>;
DEFINE FIELD OVERWRITE ready_at ON order TYPE option<int>;
DEFINE FIELD OVERWRITE picked_up_at ON order TYPE option<int>;
DEFINE FIELD OVERWRITE delivered_at ON order TYPE option<int>;
DEFINE FIELD OVERWRITE cancelled_at ON order TYPE option<int>;
DEFINE INDEX OVERWRITE order_customer ON order FIELDS customer_id;
DEFINE INDEX OVERWRITE order_store ON order FIELDS store_id;
DEFINE INDEX OVERWRITE order_merchant ON order FIELDS merchant_id;
DEFINE INDEX OVERWRITE order_rider ON order FIELDS rider_id;

-- Order line items (price snapshots, immutable after placement)
DEFINE TABLE OVERWRITE order_item SCHEMAFULL;
DEFINE FIELD OVERWRITE order_id ON order_item TYPE int;
DEFINE FIELD OVERWRITE item_id ON order_item TYPE int;
DEFINE FIELD OVERWRITE name ON order_item TYPE string;
DEFINE FIELD OVERWRITE unit_price ON order_item TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE quantity ON order_item TYPE int ASSERT $value >= 1;
DEFINE FIELD OVERWRITE line_total ON order_item TYPE number ASSERT $value >= 0;
DEFINE INDEX OVERWRITE order_item_order ON order_item FIELDS order_id;

-- Order line modifiers (name and price snapshots)
DEFINE TABLE OVERWRITE order_selection SCHEMAFULL;
DEFINE FIELD OVERWRITE order_item_id ON order_selection TYPE int;
DEFINE FIELD OVERWRITE selection_id ON order_selection TYPE int;
DEFINE FIELD OVERWRITE kind ON order_selection TYPE string
    ASSERT $value INSIDE ['pack', 'side', 'section_item'];
DEFINE FIELD OVERWRITE name ON order_selection TYPE string;
DEFINE FIELD OVERWRITE unit_price ON order_selection TYPE number ASSERT $value >= 0;
DEFINE FIELD OVERWRITE quantity ON order_selection TYPE int ASSERT $value >= 1;
DEFINE INDEX OVERWRITE order_selection_item ON order_selection FIELDS order_item_id;

-- Append-only status history
DEFINE TABLE OVERWRITE order_status_history SCHEMAFULL;
DEFINE FIELD OVERWRITE order_id ON order_status_history TYPE int;
DEFINE FIELD OVERWRITE status ON order_status_history TYPE string
    ASSERT $value INSIDE ['PENDING', 'ACCEPTED', 'PREPARING', 'READY_FOR_PICKUP', 'IN_TRANSIT', 'DELIVERED', 'CANCELLED'];
DEFINE FIELD OVERWRITE note ON order_status_history TYPE option<string>;
DEFINE FIELD OVERWRITE created_at ON order_status_history TYPE int;
DEFINE INDEX OVERWRITE history_order ON order_status_history FIELDS order_id;
"#;

/// Apply the schema to the given database handle
pub async fn apply(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Schema statement rejected: {e}")))?;
    Ok(())
}
