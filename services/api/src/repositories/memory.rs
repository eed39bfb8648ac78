//! In-memory implementation of every repository
//!
//! Collections keep insertion order so listings are stable.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IngredientRepository, MenuRepository, RecipeRepository, UserRepository};
use crate::models::{Ingredient, Menu, Recipe, Role, User, user::pull_id};

#[derive(Default)]
struct Collections {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    menus: Vec<Menu>,
    users: Vec<User>,
}

/// Process-local document store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

/// Replace the item with the same id, reporting whether it existed
fn replace<T: Clone>(items: &mut [T], item: &T, same: impl Fn(&T) -> bool) -> bool {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(slot) => {
            *slot = item.clone();
            true
        }
        None => false,
    }
}

fn remove<T>(items: &mut Vec<T>, same: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|existing| !same(existing));
    items.len() != before
}

#[async_trait]
impl IngredientRepository for MemoryStore {
    async fn insert(&self, ingredient: &Ingredient) -> DatabaseResult<()> {
        let mut db = self.inner.write().await;
        if db.ingredients.iter().any(|i| i.name == ingredient.name) {
            return Err(DatabaseError::Duplicate("ingredient name".to_string()));
        }
        db.ingredients.push(ingredient.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Ingredient>> {
        let db = self.inner.read().await;
        Ok(db.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Ingredient>> {
        let db = self.inner.read().await;
        Ok(db.ingredients.iter().find(|i| i.name == name).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Ingredient>> {
        let db = self.inner.read().await;
        Ok(db
            .ingredients
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> DatabaseResult<Vec<Ingredient>> {
        Ok(self.inner.read().await.ingredients.clone())
    }

    async fn update(&self, ingredient: &Ingredient) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        if db
            .ingredients
            .iter()
            .any(|i| i.name == ingredient.name && i.id != ingredient.id)
        {
            return Err(DatabaseError::Duplicate("ingredient name".to_string()));
        }
        Ok(replace(&mut db.ingredients, ingredient, |i| i.id == ingredient.id))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        Ok(remove(&mut db.ingredients, |i| i.id == id))
    }

    async fn reassign_owner(&self, ids: &[Uuid], owner_id: Uuid) -> DatabaseResult<u64> {
        let mut db = self.inner.write().await;
        let mut changed = 0;
        for ingredient in db.ingredients.iter_mut().filter(|i| ids.contains(&i.id)) {
            ingredient.owner_id = owner_id;
            changed += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn insert(&self, recipe: &Recipe) -> DatabaseResult<()> {
        self.inner.write().await.recipes.push(recipe.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        let db = self.inner.read().await;
        Ok(db.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DatabaseResult<Vec<Recipe>> {
        let db = self.inner.read().await;
        Ok(db.recipes.iter().filter(|r| r.name == name).cloned().collect())
    }

    async fn find_many(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Recipe>> {
        let db = self.inner.read().await;
        Ok(db
            .recipes
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> DatabaseResult<Vec<Recipe>> {
        Ok(self.inner.read().await.recipes.clone())
    }

    async fn find_using_ingredient(&self, ingredient_id: Uuid) -> DatabaseResult<Vec<Recipe>> {
        let db = self.inner.read().await;
        Ok(db
            .recipes
            .iter()
            .filter(|r| r.uses(ingredient_id))
            .cloned()
            .collect())
    }

    async fn update(&self, recipe: &Recipe) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        Ok(replace(&mut db.recipes, recipe, |r| r.id == recipe.id))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        Ok(remove(&mut db.recipes, |r| r.id == id))
    }

    async fn reassign_owner(&self, ids: &[Uuid], owner_id: Uuid) -> DatabaseResult<u64> {
        let mut db = self.inner.write().await;
        let mut changed = 0;
        for recipe in db.recipes.iter_mut().filter(|r| ids.contains(&r.id)) {
            recipe.owner_id = owner_id;
            changed += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl MenuRepository for MemoryStore {
    async fn insert(&self, menu: &Menu) -> DatabaseResult<()> {
        self.inner.write().await.menus.push(menu.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Menu>> {
        let db = self.inner.read().await;
        Ok(db.menus.iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<Menu>> {
        Ok(self.inner.read().await.menus.clone())
    }

    async fn update(&self, menu: &Menu) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        Ok(replace(&mut db.menus, menu, |m| m.id == menu.id))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        Ok(remove(&mut db.menus, |m| m.id == id))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> DatabaseResult<u64> {
        let mut db = self.inner.write().await;
        let before = db.menus.len();
        db.menus.retain(|m| !ids.contains(&m.id));
        Ok((before - db.menus.len()) as u64)
    }

    async fn count_referencing_recipe(&self, recipe_id: Uuid) -> DatabaseResult<u64> {
        let db = self.inner.read().await;
        Ok(db.menus.iter().filter(|m| m.references(recipe_id)).count() as u64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> DatabaseResult<()> {
        let mut db = self.inner.write().await;
        if db.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::Duplicate("username".to_string()));
        }
        if db.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate("email".to_string()));
        }
        db.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn update(&self, user: &User) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        let others = db.users.iter().filter(|u| u.id != user.id);
        for other in others {
            if other.username == user.username {
                return Err(DatabaseError::Duplicate("username".to_string()));
            }
            if other.email == user.email {
                return Err(DatabaseError::Duplicate("email".to_string()));
            }
        }
        Ok(replace(&mut db.users, user, |u| u.id == user.id))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut db = self.inner.write().await;
        Ok(remove(&mut db.users, |u| u.id == id))
    }

    async fn find_admin_excluding(&self, excluded: Uuid) -> DatabaseResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db
            .users
            .iter()
            .find(|u| u.role == Role::Admin && u.id != excluded)
            .cloned())
    }

    async fn remove_favorite_recipe(&self, recipe_id: Uuid) -> DatabaseResult<u64> {
        let mut db = self.inner.write().await;
        let mut changed = 0;
        for user in db.users.iter_mut() {
            if pull_id(&mut user.favorite_recipes, recipe_id) {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
