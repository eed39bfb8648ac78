//! Document table schema and row decoding shared by the PostgreSQL repositories
//!
//! Each collection is a table holding the entity as a JSONB `doc`, plus the
//! key columns that carry indexes or unique constraints.

use common::error::{DatabaseError, DatabaseResult};
use serde::de::DeserializeOwned;
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS ingredients (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        owner_id UUID NOT NULL,
        doc JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        owner_id UUID NOT NULL,
        doc JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_recipes_ingredients ON recipes USING GIN ((doc->'ingredients') jsonb_path_ops)",
    r#"
    CREATE TABLE IF NOT EXISTS menus (
        id UUID PRIMARY KEY,
        owner_id UUID NOT NULL,
        doc JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_menus_recipes ON menus USING GIN ((doc->'recipesPerDay') jsonb_path_ops)",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        doc JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
];

/// Create every table and index the repositories rely on
pub async fn migrate(pool: &PgPool) -> DatabaseResult<()> {
    info!("Ensuring document tables exist");

    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }

    Ok(())
}

/// Decode the `doc` column of a row
pub(crate) fn decode<T: DeserializeOwned>(row: &PgRow) -> DatabaseResult<T> {
    row.try_get::<Json<T>, _>("doc")
        .map(|Json(doc)| doc)
        .map_err(|e| DatabaseError::Serialization(e.to_string()))
}

pub(crate) fn decode_all<T: DeserializeOwned>(rows: Vec<PgRow>) -> DatabaseResult<Vec<T>> {
    rows.iter().map(decode).collect()
}
