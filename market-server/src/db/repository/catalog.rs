//! Catalog Repository
//!
//! Read-only price and quantity-cap lookups across the catalog tables.
//! Modifier kinds go through a static (table, name column, price column)
//! lookup so every kind resolves through the same code path, even though
//! the legacy tables disagree on column names.

use super::{BaseRepository, RepoResult};
use crate::db::models::{ItemPricing, ModifierRow};
use serde::Deserialize;
use shared::types::ModifierKind;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Backing table and column names for one modifier kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierSource {
    pub table: &'static str,
    pub name_column: &'static str,
    pub price_column: &'static str,
}

/// Static kind → source lookup; one canonical column per table
pub const fn modifier_source(kind: ModifierKind) -> ModifierSource {
    match kind {
        ModifierKind::Pack => ModifierSource {
            table: "package",
            name_column: "pack_name",
            price_column: "price",
        },
        ModifierKind::Side => ModifierSource {
            table: "food_side",
            name_column: "side_name",
            price_column: "extra_price",
        },
        ModifierKind::SectionItem => ModifierSource {
            table: "food_section",
            name_column: "section_name",
            price_column: "price",
        },
    }
}

/// Item lookup order: the food catalog wins over the generic catalog
const ITEM_TABLES: [&str; 2] = ["food_item", "item"];

#[derive(Debug, Deserialize)]
struct CapRow {
    #[serde(default)]
    max_quantity: Option<i64>,
}

#[derive(Clone)]
pub struct CatalogRepository {
    base: BaseRepository,
}

impl CatalogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Price, display name and cap for an active item.
    ///
    /// Checks the food-item catalog first, then the generic-item catalog.
    /// Inactive and missing items both come back as `None`.
    pub async fn item_pricing(&self, item_id: i64) -> RepoResult<Option<ItemPricing>> {
        for table in ITEM_TABLES {
            let mut result = self
                .base
                .db()
                .query(format!(
                    "SELECT name, price, max_quantity FROM {table} \
                     WHERE id = $id AND is_active = true"
                ))
                .bind(("id", RecordId::from_table_key(table, item_id)))
                .await?;
            let rows: Vec<ItemPricing> = result.take(0)?;
            if let Some(row) = rows.into_iter().next() {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Name and price of a modifier row, normalized across the kind tables
    pub async fn modifier(
        &self,
        kind: ModifierKind,
        selection_id: i64,
    ) -> RepoResult<Option<ModifierRow>> {
        let source = modifier_source(kind);
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {} AS name, {} AS price FROM {} WHERE id = $id",
                source.name_column, source.price_column, source.table
            ))
            .bind(("id", RecordId::from_table_key(source.table, selection_id)))
            .await?;
        let rows: Vec<ModifierRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Per-item pack cap from the item_pack configuration table
    pub async fn pack_cap(&self, item_id: i64, pack_id: i64) -> RepoResult<Option<i64>> {
        self.link_cap("item_pack", "pack_id", item_id, pack_id).await
    }

    /// Per-item side cap from the item_side configuration table
    pub async fn side_cap(&self, item_id: i64, side_id: i64) -> RepoResult<Option<i64>> {
        self.link_cap("item_side", "side_id", item_id, side_id).await
    }

    /// Section-item cap, carried on the section row itself
    pub async fn section_cap(&self, selection_id: i64) -> RepoResult<Option<i64>> {
        let mut result = self
            .base
            .db()
            .query("SELECT max_quantity FROM food_section WHERE id = $id")
            .bind(("id", RecordId::from_table_key("food_section", selection_id)))
            .await?;
        let rows: Vec<CapRow> = result.take(0)?;
        Ok(rows.into_iter().next().and_then(|row| row.max_quantity))
    }

    async fn link_cap(
        &self,
        table: &str,
        modifier_column: &str,
        item_id: i64,
        modifier_id: i64,
    ) -> RepoResult<Option<i64>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT max_quantity FROM {table} \
                 WHERE item_id = $item_id AND {modifier_column} = $modifier_id LIMIT 1"
            ))
            .bind(("item_id", item_id))
            .bind(("modifier_id", modifier_id))
            .await?;
        let rows: Vec<CapRow> = result.take(0)?;
        Ok(rows.into_iter().next().and_then(|row| row.max_quantity))
    }
}
