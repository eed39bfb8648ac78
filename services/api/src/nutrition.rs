//! Derived nutrition for recipes
//!
//! A recipe's estimated cost, allergens and nutrients are folded from its
//! ingredient lines. When an ingredient changes, the recipes using it are
//! adjusted by the difference between its old and new contribution.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        Allergen, Ingredient, IngredientUsage, IngredientUsageInput, Nutrient, NutrientKind,
        Recipe,
    },
    repositories::{IngredientRepository, Repositories},
};

/// Fields of a recipe that are computed from its ingredients
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    pub estimated_cost: f64,
    pub allergens: Vec<Allergen>,
    pub nutrients: Vec<Nutrient>,
}

impl Derived {
    pub fn apply_to(self, recipe: &mut Recipe) {
        recipe.estimated_cost = self.estimated_cost;
        recipe.allergens = self.allergens;
        recipe.nutrients = self.nutrients;
    }
}

/// Fetch every ingredient in `ids`, failing if any of them does not exist
pub async fn resolve(
    repo: &dyn IngredientRepository,
    ids: &[Uuid],
) -> ApiResult<HashMap<Uuid, Ingredient>> {
    let found: HashMap<Uuid, Ingredient> = repo
        .find_many(ids)
        .await?
        .into_iter()
        .map(|ingredient| (ingredient.id, ingredient))
        .collect();

    match ids.iter().find(|id| !found.contains_key(id)) {
        Some(missing) => Err(ApiError::not_found(format!("Ingredient {}", missing))),
        None => Ok(found),
    }
}

/// Turn client lines into stored lines, copying each ingredient's unit
pub fn usage_lines(
    inputs: &[IngredientUsageInput],
    ingredients: &HashMap<Uuid, Ingredient>,
) -> ApiResult<Vec<IngredientUsage>> {
    inputs
        .iter()
        .map(|input| {
            let ingredient = ingredients
                .get(&input.ingredient_id)
                .ok_or_else(|| ApiError::not_found(format!("Ingredient {}", input.ingredient_id)))?;
            Ok(IngredientUsage {
                ingredient_id: input.ingredient_id,
                amount: input.amount,
                unit: ingredient.unit.clone(),
            })
        })
        .collect()
}

/// Fold the ingredient lines of a recipe into its derived fields
pub fn derive(
    usages: &[IngredientUsage],
    ingredients: &HashMap<Uuid, Ingredient>,
) -> ApiResult<Derived> {
    let mut derived = Derived::default();

    for usage in usages {
        let ingredient = ingredients
            .get(&usage.ingredient_id)
            .ok_or_else(|| ApiError::not_found(format!("Ingredient {}", usage.ingredient_id)))?;
        let ratio = usage.amount / ingredient.amount;

        derived.estimated_cost += ingredient.estimated_cost * ratio;

        for allergen in &ingredient.allergens {
            if !derived.allergens.contains(allergen) {
                derived.allergens.push(*allergen);
            }
        }

        for nutrient in &ingredient.nutrients {
            let scaled = nutrient.amount * ratio;
            match derived.nutrients.iter_mut().find(|n| n.name == nutrient.name) {
                Some(existing) => existing.amount += scaled,
                None => derived.nutrients.push(Nutrient::new(nutrient.name, scaled)),
            }
        }
    }

    Ok(derived)
}

/// Resolve `inputs` and compute the stored lines plus derived fields
pub async fn compute(
    repo: &dyn IngredientRepository,
    inputs: &[IngredientUsageInput],
) -> ApiResult<(Vec<IngredientUsage>, Derived)> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(inputs.len());
    for input in inputs {
        if !ids.contains(&input.ingredient_id) {
            ids.push(input.ingredient_id);
        }
    }

    let ingredients = resolve(repo, &ids).await?;
    let usages = usage_lines(inputs, &ingredients)?;
    let derived = derive(&usages, &ingredients)?;
    Ok((usages, derived))
}

fn contribution(used: f64, value: f64, reference: f64) -> f64 {
    used * value / reference
}

/// Adjust `recipe` for an ingredient moving from `old` to `new`
///
/// `others` must hold every other ingredient the recipe uses; it decides
/// whether an allergen or nutrient dropped by this ingredient is still
/// carried by the recipe.
pub fn apply_ingredient_change(
    recipe: &Recipe,
    old: &Ingredient,
    new: &Ingredient,
    others: &HashMap<Uuid, Ingredient>,
) -> Recipe {
    let mut next = recipe.clone();
    let used = recipe.used_amount(old.id);
    let other_ingredients: Vec<&Ingredient> = recipe
        .ingredient_ids()
        .iter()
        .filter(|id| **id != old.id)
        .filter_map(|id| others.get(id))
        .collect();

    let cost_delta = contribution(used, new.estimated_cost, new.amount)
        - contribution(used, old.estimated_cost, old.amount);
    next.estimated_cost = (next.estimated_cost + cost_delta).max(0.0);

    for allergen in &new.allergens {
        if !old.allergens.contains(allergen) && !next.allergens.contains(allergen) {
            next.allergens.push(*allergen);
        }
    }
    let dropped: Vec<Allergen> = old
        .allergens
        .iter()
        .filter(|a| !new.allergens.contains(a))
        .copied()
        .collect();
    next.allergens.retain(|allergen| {
        !dropped.contains(allergen)
            || other_ingredients
                .iter()
                .any(|other| other.allergens.contains(allergen))
    });

    let mut kinds: Vec<NutrientKind> = old.nutrients.iter().map(|n| n.name).collect();
    for nutrient in &new.nutrients {
        if !kinds.contains(&nutrient.name) {
            kinds.push(nutrient.name);
        }
    }

    for kind in kinds {
        let old_value = old.nutrient_amount(kind);
        let new_value = new.nutrient_amount(kind);
        let delta = contribution(used, new_value.unwrap_or(0.0), new.amount)
            - contribution(used, old_value.unwrap_or(0.0), old.amount);
        let carried_elsewhere = other_ingredients
            .iter()
            .any(|other| other.nutrient_amount(kind).is_some());

        match next.nutrients.iter().position(|n| n.name == kind) {
            Some(_) if new_value.is_none() && !carried_elsewhere => {
                next.nutrients.retain(|n| n.name != kind);
            }
            Some(index) => {
                let nutrient = &mut next.nutrients[index];
                nutrient.amount = (nutrient.amount + delta).max(0.0);
            }
            None => {
                if let Some(value) = new_value {
                    let amount = contribution(used, value, new.amount).max(0.0);
                    next.nutrients.push(Nutrient::new(kind, amount));
                }
            }
        }
    }

    next
}

/// Compute the updated version of every recipe using `old`
///
/// Performs reads only. Fails with `NotFound` if any other ingredient of an
/// affected recipe no longer exists, in which case nothing should be written.
pub async fn plan_ingredient_change(
    repos: &Repositories,
    old: &Ingredient,
    new: &Ingredient,
) -> ApiResult<Vec<Recipe>> {
    let recipes = repos.recipes.find_using_ingredient(old.id).await?;
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let mut other_ids: Vec<Uuid> = Vec::new();
    for recipe in &recipes {
        for id in recipe.ingredient_ids() {
            if id != old.id && !other_ids.contains(&id) {
                other_ids.push(id);
            }
        }
    }

    let others = resolve(repos.ingredients.as_ref(), &other_ids)
        .await
        .inspect_err(|e| warn!("Aborting recipe update for ingredient {}: {}", old.id, e))?;

    debug!(
        "Ingredient {} change affects {} recipe(s)",
        old.id,
        recipes.len()
    );

    Ok(recipes
        .iter()
        .map(|recipe| apply_ingredient_change(recipe, old, new, &others))
        .collect())
}

/// Persist recipes produced by [`plan_ingredient_change`]
pub async fn save_recipes(repos: &Repositories, recipes: &[Recipe]) -> ApiResult<()> {
    for recipe in recipes {
        if !repos.recipes.update(recipe).await? {
            warn!("Recipe {} vanished while updating derived fields", recipe.id);
        }
    }
    Ok(())
}
