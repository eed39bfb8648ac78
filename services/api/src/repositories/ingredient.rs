//! Ingredient repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::{
    IngredientRepository,
    schema::{decode, decode_all},
};
use crate::models::Ingredient;

/// Ingredient repository backed by the `ingredients` table
#[derive(Clone)]
pub struct PgIngredientRepository {
    pool: PgPool,
}

impl PgIngredientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientRepository for PgIngredientRepository {
    async fn insert(&self, ingredient: &Ingredient) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, owner_id, doc, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ingredient.id)
        .bind(&ingredient.name)
        .bind(ingredient.owner_id)
        .bind(Json(ingredient))
        .bind(ingredient.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, "ingredient name"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT doc FROM ingredients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT doc FROM ingredients WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Ingredient>> {
        let rows = sqlx::query("SELECT doc FROM ingredients WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn list(&self) -> DatabaseResult<Vec<Ingredient>> {
        let rows = sqlx::query("SELECT doc FROM ingredients ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn update(&self, ingredient: &Ingredient) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE ingredients
            SET name = $2, owner_id = $3, doc = $4
            WHERE id = $1
            "#,
        )
        .bind(ingredient.id)
        .bind(&ingredient.name)
        .bind(ingredient.owner_id)
        .bind(Json(ingredient))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, "ingredient name"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn reassign_owner(&self, ids: &[Uuid], owner_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE ingredients
            SET owner_id = $1, doc = jsonb_set(doc, '{ownerId}', to_jsonb($1::uuid))
            WHERE id = ANY($2)
            "#,
        )
        .bind(owner_id)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected())
    }
}
