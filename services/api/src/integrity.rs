//! Deletion flows that keep cross-collection references consistent

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{Ingredient, Menu, Recipe, User, user::pull_id, user::push_id},
    repositories::Repositories,
};

/// Apply `change` to the stored user, if it still exists
pub(crate) async fn update_owner(
    repos: &Repositories,
    owner_id: Uuid,
    change: impl FnOnce(&mut User) -> bool,
) -> ApiResult<()> {
    match repos.users.find_by_id(owner_id).await? {
        Some(mut owner) => {
            if change(&mut owner) {
                repos.users.update(&owner).await?;
            }
        }
        None => warn!("Owner {} no longer exists", owner_id),
    }
    Ok(())
}

/// Delete an ingredient no recipe uses
pub async fn delete_ingredient(repos: &Repositories, ingredient: &Ingredient) -> ApiResult<()> {
    let dependents = repos.recipes.find_using_ingredient(ingredient.id).await?;
    if !dependents.is_empty() {
        return Err(ApiError::Conflict(format!(
            "Ingredient is used by {} recipe(s)",
            dependents.len()
        )));
    }

    if !repos.ingredients.delete(ingredient.id).await? {
        return Err(ApiError::not_found("Ingredient"));
    }

    update_owner(repos, ingredient.owner_id, |owner| {
        pull_id(&mut owner.created_ingredients, ingredient.id)
    })
    .await
}

/// Delete a recipe no menu serves, dropping it from every favourite list
pub async fn delete_recipe(repos: &Repositories, recipe: &Recipe) -> ApiResult<()> {
    let menus = repos.menus.count_referencing_recipe(recipe.id).await?;
    if menus > 0 {
        return Err(ApiError::Conflict(format!(
            "Recipe is used by {} menu(s)",
            menus
        )));
    }

    if !repos.recipes.delete(recipe.id).await? {
        return Err(ApiError::not_found("Recipe"));
    }

    repos.users.remove_favorite_recipe(recipe.id).await?;
    update_owner(repos, recipe.owner_id, |owner| {
        pull_id(&mut owner.created_recipes, recipe.id)
    })
    .await
}

pub async fn delete_menu(repos: &Repositories, menu: &Menu) -> ApiResult<()> {
    if !repos.menus.delete(menu.id).await? {
        return Err(ApiError::not_found("Menu"));
    }

    update_owner(repos, menu.owner_id, |owner| {
        pull_id(&mut owner.saved_menus, menu.id)
    })
    .await
}

/// Delete a user, handing their ingredients and recipes to an admin
///
/// The admin is looked up before anything changes; if the user owns content
/// and no other admin exists the call fails with `Unavailable`. Saved menus
/// are deleted with the user. Returns the admin that took over, if any.
pub async fn delete_user(repos: &Repositories, user: &User) -> ApiResult<Option<Uuid>> {
    let heir = if user.owns_content() {
        let admin = repos
            .users
            .find_admin_excluding(user.id)
            .await?
            .ok_or_else(|| {
                ApiError::Unavailable("No administrator available to take over content".into())
            })?;
        Some(admin)
    } else {
        None
    };

    if let Some(mut admin) = heir.clone() {
        repos
            .ingredients
            .reassign_owner(&user.created_ingredients, admin.id)
            .await?;
        repos
            .recipes
            .reassign_owner(&user.created_recipes, admin.id)
            .await?;

        for id in &user.created_ingredients {
            push_id(&mut admin.created_ingredients, *id);
        }
        for id in &user.created_recipes {
            push_id(&mut admin.created_recipes, *id);
        }
        repos.users.update(&admin).await?;

        info!(
            "Reassigned {} ingredient(s) and {} recipe(s) from {} to {}",
            user.created_ingredients.len(),
            user.created_recipes.len(),
            user.id,
            admin.id
        );
    }

    if !user.saved_menus.is_empty() {
        repos.menus.delete_many(&user.saved_menus).await?;
    }

    if !repos.users.delete(user.id).await? {
        return Err(ApiError::not_found("User"));
    }

    Ok(heir.map(|admin| admin.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Biometrics, DayPlan, DietaryProfile, FoodType, IngredientUsage, NewMenu, NewRecipe,
        NewUser, Role,
    };
    use chrono::Utc;

    fn user(name: &str, role: Role) -> User {
        User::create(
            NewUser {
                username: name.into(),
                name: name.into(),
                password: "Secret1".into(),
                email: format!("{}@example.com", name),
                dietary_profile: DietaryProfile::default(),
                biometrics: Biometrics::default(),
            },
            "hash".into(),
            role,
        )
    }

    fn ingredient(owner: Uuid) -> Ingredient {
        let now = Utc::now();
        Ingredient {
            id: Uuid::new_v4(),
            name: format!("ingredient-{}", Uuid::new_v4()),
            amount: 100.0,
            unit: "g".into(),
            estimated_cost: 1.0,
            food_group: crate::models::FoodGroup::Other,
            allergens: vec![],
            nutrients: vec![],
            owner_id: owner,
            created_at: now,
            updated_at: now,
        }
    }

    fn recipe(owner: Uuid, food_type: FoodType, uses: &[Uuid]) -> Recipe {
        let new = NewRecipe {
            name: "Dish".into(),
            servings: 2,
            preparation_time: 10,
            food_type,
            instructions: vec!["Cook".into()],
            comments: None,
            cookware: vec![],
            ingredients: vec![],
        };
        let lines = uses
            .iter()
            .map(|id| IngredientUsage {
                ingredient_id: *id,
                amount: 10.0,
                unit: "g".into(),
            })
            .collect();
        Recipe::from_details(&new, lines, owner)
    }

    fn menu(owner: Uuid, day: DayPlan) -> Menu {
        Menu::create(
            NewMenu {
                title: Some("Week".into()),
                number_days: 1,
                number_services: 1,
                recipes_per_day: vec![day],
                calories_target: 2000.0,
                allergies: vec![],
                diet: None,
                excluded_ingredients: vec![],
            },
            owner,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_ingredient_delete_reports_reference_count() {
        let repos = Repositories::in_memory();
        let mut owner = user("cook", Role::Regular);
        let flour = ingredient(owner.id);
        owner.created_ingredients.push(flour.id);
        repos.users.insert(&owner).await.unwrap();
        repos.ingredients.insert(&flour).await.unwrap();
        let bread = recipe(owner.id, FoodType::Main, &[flour.id]);
        let cake = recipe(owner.id, FoodType::Dessert, &[flour.id, flour.id]);
        repos.recipes.insert(&bread).await.unwrap();
        repos.recipes.insert(&cake).await.unwrap();

        match delete_ingredient(&repos, &flour).await {
            Err(ApiError::Conflict(msg)) => assert!(msg.contains("2 recipe")),
            other => panic!("expected conflict, got {:?}", other),
        }

        repos.recipes.delete(bread.id).await.unwrap();
        repos.recipes.delete(cake.id).await.unwrap();
        delete_ingredient(&repos, &flour).await.unwrap();

        assert!(repos.ingredients.find_by_id(flour.id).await.unwrap().is_none());
        let owner = repos.users.find_by_id(owner.id).await.unwrap().unwrap();
        assert!(owner.created_ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_recipe_delete_guard_and_cleanup() {
        let repos = Repositories::in_memory();
        let mut owner = user("cook", Role::Regular);
        let mut fan = user("fan", Role::Regular);
        let starter = recipe(owner.id, FoodType::Starter, &[]);
        let main = recipe(owner.id, FoodType::Main, &[]);
        let dessert = recipe(owner.id, FoodType::Dessert, &[]);
        owner.created_recipes = vec![starter.id, main.id, dessert.id];
        fan.favorite_recipes = vec![dessert.id, main.id];
        repos.users.insert(&owner).await.unwrap();
        repos.users.insert(&fan).await.unwrap();
        for r in [&starter, &main, &dessert] {
            repos.recipes.insert(r).await.unwrap();
        }
        let day = DayPlan {
            starter_id: starter.id,
            main_id: main.id,
            dessert_id: dessert.id,
            bread: false,
        };
        let first = menu(owner.id, day);
        let second = menu(owner.id, day);
        repos.menus.insert(&first).await.unwrap();
        repos.menus.insert(&second).await.unwrap();

        match delete_recipe(&repos, &dessert).await {
            Err(ApiError::Conflict(msg)) => assert!(msg.contains("2 menu")),
            other => panic!("expected conflict, got {:?}", other),
        }

        delete_menu(&repos, &first).await.unwrap();
        delete_menu(&repos, &second).await.unwrap();
        delete_recipe(&repos, &dessert).await.unwrap();

        let fan = repos.users.find_by_id(fan.id).await.unwrap().unwrap();
        assert_eq!(fan.favorite_recipes, vec![main.id]);
        let owner = repos.users.find_by_id(owner.id).await.unwrap().unwrap();
        assert_eq!(owner.created_recipes, vec![starter.id, main.id]);
    }

    #[tokio::test]
    async fn test_user_delete_hands_content_to_admin() {
        let repos = Repositories::in_memory();
        let admin = user("admin", Role::Admin);
        let mut leaver = user("leaver", Role::Regular);
        let salt = ingredient(leaver.id);
        let soup = recipe(leaver.id, FoodType::Starter, &[salt.id]);
        let main = recipe(leaver.id, FoodType::Main, &[]);
        let dessert = recipe(leaver.id, FoodType::Dessert, &[]);
        let saved = menu(
            leaver.id,
            DayPlan {
                starter_id: soup.id,
                main_id: main.id,
                dessert_id: dessert.id,
                bread: false,
            },
        );
        leaver.created_ingredients = vec![salt.id];
        leaver.created_recipes = vec![soup.id];
        leaver.saved_menus = vec![saved.id];
        repos.users.insert(&admin).await.unwrap();
        repos.users.insert(&leaver).await.unwrap();
        repos.ingredients.insert(&salt).await.unwrap();
        repos.recipes.insert(&soup).await.unwrap();
        repos.menus.insert(&saved).await.unwrap();

        let heir = delete_user(&repos, &leaver).await.unwrap();
        assert_eq!(heir, Some(admin.id));

        let salt = repos.ingredients.find_by_id(salt.id).await.unwrap().unwrap();
        assert_eq!(salt.owner_id, admin.id);
        let soup = repos.recipes.find_by_id(soup.id).await.unwrap().unwrap();
        assert_eq!(soup.owner_id, admin.id);
        let admin = repos.users.find_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(admin.created_ingredients, vec![salt.id]);
        assert_eq!(admin.created_recipes, vec![soup.id]);
        assert!(repos.menus.find_by_id(saved.id).await.unwrap().is_none());
        assert!(repos.users.find_by_id(leaver.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_delete_without_admin_changes_nothing() {
        let repos = Repositories::in_memory();
        let mut leaver = user("leaver", Role::Admin);
        let salt = ingredient(leaver.id);
        leaver.created_ingredients = vec![salt.id];
        repos.users.insert(&leaver).await.unwrap();
        repos.ingredients.insert(&salt).await.unwrap();

        assert!(matches!(
            delete_user(&repos, &leaver).await,
            Err(ApiError::Unavailable(_))
        ));
        assert!(repos.users.find_by_id(leaver.id).await.unwrap().is_some());
        let salt = repos.ingredients.find_by_id(salt.id).await.unwrap().unwrap();
        assert_eq!(salt.owner_id, leaver.id);

        let idle = user("idle", Role::Regular);
        repos.users.insert(&idle).await.unwrap();
        assert_eq!(delete_user(&repos, &idle).await.unwrap(), None);
    }
}
