//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::{
    UserRepository,
    schema::{decode, decode_all},
};
use crate::models::{Role, User};

/// User repository backed by the `users` table
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &User) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, role, doc, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(Json(user))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, "username or email"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query("SELECT doc FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query("SELECT doc FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query("SELECT doc FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        decode_all(rows)
    }

    async fn update(&self, user: &User) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, role = $4, doc = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(Json(user))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, "username or email"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_admin_excluding(&self, excluded: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT doc FROM users
            WHERE role = $1 AND id <> $2
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(Role::Admin.as_str())
        .bind(excluded)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(decode).transpose()
    }

    async fn remove_favorite_recipe(&self, recipe_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET doc = jsonb_set(doc, '{favoriteRecipes}', (doc->'favoriteRecipes') - $1::text)
            WHERE doc->'favoriteRecipes' ? $1::text
            "#,
        )
        .bind(recipe_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected())
    }
}
