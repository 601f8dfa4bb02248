//! Catalog Resolver
//!
//! Read-only lookups with the documented fallbacks: an absent or inactive
//! item prices at zero, and an absent modifier row resolves to the
//! `{name: "Selection", price: 0}` sentinel with a warning log so broken
//! catalog references surface in diagnostics instead of silently pricing
//! orders wrong.

use crate::db::models::{ItemPricing, ModifierRow};
use crate::db::repository::{CatalogRepository, RepoResult};
use shared::types::ModifierKind;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Display name used when an ordered item has no catalog row
pub const MISSING_ITEM_NAME: &str = "Item";

/// Sentinel name used when a modifier row cannot be resolved
pub const MISSING_MODIFIER_NAME: &str = "Selection";

#[derive(Clone)]
pub struct CatalogResolver {
    repo: CatalogRepository,
}

impl CatalogResolver {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: CatalogRepository::new(db),
        }
    }

    /// Resolve an item's name, price and cap; food catalog first, then
    /// the generic catalog. Missing or inactive items price at zero.
    pub async fn resolve_item(&self, item_id: i64) -> RepoResult<ItemPricing> {
        match self.repo.item_pricing(item_id).await? {
            Some(pricing) => Ok(pricing),
            None => {
                tracing::debug!(item_id, "item not in any active catalog, pricing at zero");
                Ok(ItemPricing {
                    name: MISSING_ITEM_NAME.to_string(),
                    price: 0.0,
                    max_quantity: None,
                })
            }
        }
    }

    /// Resolve a modifier's display name and price for its kind.
    ///
    /// A missing backing row resolves to the zero-priced sentinel and is
    /// logged at warn with the offending id and kind.
    pub async fn resolve_modifier(
        &self,
        kind: ModifierKind,
        selection_id: i64,
    ) -> RepoResult<ModifierRow> {
        match self.repo.modifier(kind, selection_id).await? {
            Some(row) => Ok(row),
            None => {
                tracing::warn!(
                    selection_id,
                    kind = kind.as_str(),
                    "modifier row missing, falling back to zero-priced sentinel"
                );
                Ok(ModifierRow {
                    name: MISSING_MODIFIER_NAME.to_string(),
                    price: 0.0,
                })
            }
        }
    }

    /// Resolve the quantity cap for a modifier on a given item.
    ///
    /// Pack and side caps come from the per-item configuration tables;
    /// section-item caps sit on the section row itself. `None` means
    /// unlimited.
    pub async fn resolve_modifier_cap(
        &self,
        item_id: i64,
        kind: ModifierKind,
        selection_id: i64,
    ) -> RepoResult<Option<i64>> {
        match kind {
            ModifierKind::Pack => self.repo.pack_cap(item_id, selection_id).await,
            ModifierKind::Side => self.repo.side_cap(item_id, selection_id).await,
            ModifierKind::SectionItem => self.repo.section_cap(selection_id).await,
        }
    }
}
