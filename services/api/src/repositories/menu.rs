//! Menu repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::{
    MenuRepository,
    schema::{decode, decode_all},
};
use crate::models::Menu;

/// Menu repository backed by the `menus` table
#[derive(Clone)]
pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn insert(&self, menu: &Menu) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO menus (id, owner_id, doc, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(menu.id)
        .bind(menu.owner_id)
        .bind(Json(menu))
        .bind(menu.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, "menu"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Menu>> {
        let row = sqlx::query("SELECT doc FROM menus WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn list(&self) -> DatabaseResult<Vec<Menu>> {
        let rows = sqlx::query("SELECT doc FROM menus ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn update(&self, menu: &Menu) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE menus SET owner_id = $2, doc = $3 WHERE id = $1")
            .bind(menu.id)
            .bind(menu.owner_id)
            .bind(Json(menu))
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM menus WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected())
    }

    async fn count_referencing_recipe(&self, recipe_id: Uuid) -> DatabaseResult<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM menus
            WHERE doc->'recipesPerDay' @> jsonb_build_array(jsonb_build_object('starterId', $1::uuid))
               OR doc->'recipesPerDay' @> jsonb_build_array(jsonb_build_object('mainId', $1::uuid))
               OR doc->'recipesPerDay' @> jsonb_build_array(jsonb_build_object('dessertId', $1::uuid))
            "#,
        )
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(count.max(0) as u64)
    }
}
