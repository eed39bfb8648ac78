//! Repositories for document persistence
//!
//! Every collection is reached through an async trait so the service can run
//! against PostgreSQL in production and an in-memory store in tests.

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{Ingredient, Menu, Recipe, User};

pub mod ingredient;
pub mod memory;
pub mod menu;
pub mod recipe;
pub mod schema;
pub mod user;

pub use memory::MemoryStore;

/// Ingredient collection
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Insert a new ingredient; fails with `Duplicate` on a name clash
    async fn insert(&self, ingredient: &Ingredient) -> DatabaseResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Ingredient>>;
    async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Ingredient>>;
    /// Fetch the ingredients among `ids` that exist, in no particular order
    async fn find_many(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Ingredient>>;
    async fn list(&self) -> DatabaseResult<Vec<Ingredient>>;
    /// Replace a stored ingredient; `false` if it no longer exists
    async fn update(&self, ingredient: &Ingredient) -> DatabaseResult<bool>;
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
    async fn reassign_owner(&self, ids: &[Uuid], owner_id: Uuid) -> DatabaseResult<u64>;
}

/// Recipe collection
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn insert(&self, recipe: &Recipe) -> DatabaseResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Recipe>>;
    async fn find_by_name(&self, name: &str) -> DatabaseResult<Vec<Recipe>>;
    async fn find_many(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Recipe>>;
    async fn list(&self) -> DatabaseResult<Vec<Recipe>>;
    /// Recipes whose ingredient list references `ingredient_id`
    async fn find_using_ingredient(&self, ingredient_id: Uuid) -> DatabaseResult<Vec<Recipe>>;
    async fn update(&self, recipe: &Recipe) -> DatabaseResult<bool>;
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
    async fn reassign_owner(&self, ids: &[Uuid], owner_id: Uuid) -> DatabaseResult<u64>;
}

/// Menu collection
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn insert(&self, menu: &Menu) -> DatabaseResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Menu>>;
    async fn list(&self) -> DatabaseResult<Vec<Menu>>;
    async fn update(&self, menu: &Menu) -> DatabaseResult<bool>;
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
    async fn delete_many(&self, ids: &[Uuid]) -> DatabaseResult<u64>;
    /// Number of menus serving `recipe_id` on any day
    async fn count_referencing_recipe(&self, recipe_id: Uuid) -> DatabaseResult<u64>;
}

/// User collection
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with `Duplicate` on a username or email clash
    async fn insert(&self, user: &User) -> DatabaseResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;
    async fn list(&self) -> DatabaseResult<Vec<User>>;
    async fn update(&self, user: &User) -> DatabaseResult<bool>;
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
    /// Any admin other than `excluded`
    async fn find_admin_excluding(&self, excluded: Uuid) -> DatabaseResult<Option<User>>;
    /// Pull `recipe_id` from every user's favourites
    async fn remove_favorite_recipe(&self, recipe_id: Uuid) -> DatabaseResult<u64>;
}

/// Handle to every collection, shared by all request handlers
#[derive(Clone)]
pub struct Repositories {
    pub ingredients: Arc<dyn IngredientRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL document tables
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            ingredients: Arc::new(ingredient::PgIngredientRepository::new(pool.clone())),
            recipes: Arc::new(recipe::PgRecipeRepository::new(pool.clone())),
            menus: Arc::new(menu::PgMenuRepository::new(pool.clone())),
            users: Arc::new(user::PgUserRepository::new(pool)),
        }
    }

    /// Repositories sharing one process-local store
    pub fn in_memory() -> Self {
        let store = MemoryStore::default();
        Self {
            ingredients: Arc::new(store.clone()),
            recipes: Arc::new(store.clone()),
            menus: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }
}
