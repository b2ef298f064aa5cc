use super::LocalStore;
use crate::types::{ID, StoreObj};
use anyhow::Result;
use kiln_core::store::StorePath;
use sqlx::Row;

// paths are stored in their base form, the store directory stays out of
// the database
impl LocalStore {
    pub(super) async fn valid(&self, path: &StorePath) -> Result<bool> {
        Ok(sqlx::query("SELECT id FROM store_obj WHERE path = ?")
            .bind(path.to_string())
            .fetch_optional(&self.db)
            .await?
            .is_some())
    }

    pub(super) async fn is_store_obj(
        tx: &mut sqlx::SqliteTransaction<'static>,
        path: &StorePath,
    ) -> Result<bool> {
        Ok(sqlx::query("SELECT id FROM store_obj WHERE path = ?")
            .bind(path.to_string())
            .fetch_optional(&mut **tx)
            .await?
            .is_some())
    }

    pub(super) async fn get_store_obj_id(
        tx: &mut sqlx::SqliteTransaction<'static>,
        path: &StorePath,
    ) -> Result<Option<ID>> {
        let id: Option<(ID,)> = sqlx::query_as("SELECT id FROM store_obj WHERE path = ?")
            .bind(path.to_string())
            .fetch_optional(&mut **tx)
            .await?;
        Ok(id.map(|id| id.0))
    }

    pub(super) async fn add_store_obj(
        tx: &mut sqlx::SqliteTransaction<'static>,
        obj: &StoreObj,
    ) -> Result<ID> {
        let (id, ..): (ID,) =
            sqlx::query_as("INSERT INTO store_obj (path, hash) VALUES (?, ?) RETURNING id")
                .bind(obj.path.to_string())
                .bind(obj.hash.base64_with_algo())
                .fetch_one(&mut **tx)
                .await?;
        Ok(id)
    }

    pub(super) async fn update_store_obj(
        tx: &mut sqlx::SqliteTransaction<'static>,
        obj: &StoreObj,
    ) -> Result<ID> {
        let (id, ..): (ID,) =
            sqlx::query_as("UPDATE store_obj SET hash = ? WHERE path = ? RETURNING id")
                .bind(obj.hash.base64_with_algo())
                .bind(obj.path.to_string())
                .fetch_one(&mut **tx)
                .await?;
        Ok(id)
    }

    pub(super) async fn add_ref(
        tx: &mut sqlx::SqliteTransaction<'static>,
        referrer: ID,
        references: ID,
    ) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO ref (referrer, reference) VALUES (?, ?)")
            .bind(referrer)
            .bind(references)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub(super) async fn get_references(&self, path: &StorePath) -> Result<Vec<StorePath>> {
        let rows = sqlx::query(
            r#"
            SELECT o.path
            FROM store_obj o
            JOIN ref r ON r.reference = o.id
            JOIN store_obj referrer ON referrer.id = r.referrer
            WHERE referrer.path = ?
            ORDER BY o.path
            "#,
        )
        .bind(path.to_string())
        .fetch_all(&self.db)
        .await?;
        rows.into_iter()
            .map(|row| Ok(StorePath::from_base(row.get(0))?))
            .collect()
    }
}
