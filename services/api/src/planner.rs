//! Meal-plan generation and menu costing

use std::collections::HashMap;

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{Allergen, DayPlan, FoodType, Recipe},
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    #[error("No {0} recipe available")]
    NoRecipeAvailable(FoodType),
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NoRecipeAvailable(course) => ApiError::NoRecipeAvailable(course),
        }
    }
}

/// Recipes a plan must stay clear of
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    pub excluded_ingredients: Vec<Uuid>,
    pub allergies: Vec<Allergen>,
}

impl PlanFilter {
    pub fn admits(&self, recipe: &Recipe) -> bool {
        !recipe
            .ingredients
            .iter()
            .any(|line| self.excluded_ingredients.contains(&line.ingredient_id))
            && !recipe.allergens.iter().any(|a| self.allergies.contains(a))
    }
}

/// Keep the recipes `filter` admits, preserving order
pub fn filter_recipes<'a>(recipes: &'a [Recipe], filter: &PlanFilter) -> Vec<&'a Recipe> {
    recipes.iter().filter(|recipe| filter.admits(recipe)).collect()
}

/// Draw one starter, main and dessert per day
///
/// Within a course no recipe repeats until every candidate has been served
/// once; after that picks come from the whole pool.
pub fn generate_plan<R: Rng + ?Sized>(
    recipes: &[&Recipe],
    days: u32,
    rng: &mut R,
) -> Result<Vec<DayPlan>, PlanError> {
    if days == 0 {
        return Ok(Vec::new());
    }

    let pools: Vec<(FoodType, Vec<Uuid>)> = FoodType::ALL
        .iter()
        .map(|course| {
            let ids = recipes
                .iter()
                .filter(|r| r.food_type == *course)
                .map(|r| r.id)
                .collect();
            (*course, ids)
        })
        .collect();

    if let Some((course, _)) = pools.iter().find(|(_, ids)| ids.is_empty()) {
        return Err(PlanError::NoRecipeAvailable(*course));
    }

    let mut served: HashMap<FoodType, Vec<Uuid>> = HashMap::new();
    let mut plan = Vec::with_capacity(days as usize);

    for _ in 0..days {
        let mut picks = [Uuid::nil(); 3];
        for (slot, (course, pool)) in pools.iter().enumerate() {
            let used = served.entry(*course).or_default();
            let unused: Vec<Uuid> = pool.iter().filter(|id| !used.contains(id)).copied().collect();
            let candidates = if unused.is_empty() { pool } else { &unused };
            let pick = *candidates
                .choose(rng)
                .ok_or(PlanError::NoRecipeAvailable(*course))?;
            used.push(pick);
            picks[slot] = pick;
        }

        plan.push(DayPlan {
            starter_id: picks[0],
            main_id: picks[1],
            dessert_id: picks[2],
            bread: false,
        });
    }

    Ok(plan)
}

/// Average daily cost of serving `plan` to `number_services` people
///
/// Each course costs the recipe's estimated cost per serving times the
/// number of services.
pub fn average_estimated_cost(
    plan: &[DayPlan],
    number_services: u32,
    recipes: &HashMap<Uuid, Recipe>,
) -> ApiResult<f64> {
    if plan.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for day in plan {
        for (_, id) in day.courses() {
            let recipe = recipes
                .get(&id)
                .ok_or_else(|| ApiError::not_found(format!("Recipe {}", id)))?;
            total += recipe.estimated_cost / f64::from(recipe.servings) * f64::from(number_services);
        }
    }

    Ok(total / plan.len() as f64)
}
