//! Store Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::StoreRow;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a store by its numeric id
    pub async fn find_by_id(&self, store_id: i64) -> RepoResult<Option<StoreRow>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT record::id(id) AS id, owner_id, name, category, is_active \
                 FROM store WHERE id = $id",
            )
            .bind(("id", RecordId::from_table_key(TABLE, store_id)))
            .await?;
        let rows: Vec<StoreRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }
}
