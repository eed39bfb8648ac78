//! Recipe repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::{
    RecipeRepository,
    schema::{decode, decode_all},
};
use crate::models::Recipe;

/// Recipe repository backed by the `recipes` table
#[derive(Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn insert(&self, recipe: &Recipe) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recipes (id, name, owner_id, doc, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(recipe.id)
        .bind(&recipe.name)
        .bind(recipe.owner_id)
        .bind(Json(recipe))
        .bind(recipe.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, "recipe"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        let row = sqlx::query("SELECT doc FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn find_by_name(&self, name: &str) -> DatabaseResult<Vec<Recipe>> {
        let rows = sqlx::query("SELECT doc FROM recipes WHERE name = $1 ORDER BY created_at, id")
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn find_many(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Recipe>> {
        let rows = sqlx::query("SELECT doc FROM recipes WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn list(&self) -> DatabaseResult<Vec<Recipe>> {
        let rows = sqlx::query("SELECT doc FROM recipes ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn find_using_ingredient(&self, ingredient_id: Uuid) -> DatabaseResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM recipes
            WHERE doc->'ingredients' @> jsonb_build_array(jsonb_build_object('ingredientId', $1::uuid))
            ORDER BY created_at, id
            "#,
        )
        .bind(ingredient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn update(&self, recipe: &Recipe) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET name = $2, owner_id = $3, doc = $4
            WHERE id = $1
            "#,
        )
        .bind(recipe.id)
        .bind(&recipe.name)
        .bind(recipe.owner_id)
        .bind(Json(recipe))
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn reassign_owner(&self, ids: &[Uuid], owner_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE recipes
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
