//! Menu model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Allergen, Diet, FoodType};
use crate::{
    error::{ApiError, ApiResult},
    validation::non_negative,
};

/// The three courses served on one day of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DayPlan {
    pub starter_id: Uuid,
    pub main_id: Uuid,
    pub dessert_id: Uuid,
    pub bread: bool,
}

impl DayPlan {
    /// Recipe ids paired with the course they are served as
    pub fn courses(&self) -> [(FoodType, Uuid); 3] {
        [
            (FoodType::Starter, self.starter_id),
            (FoodType::Main, self.main_id),
            (FoodType::Dessert, self.dessert_id),
        ]
    }

    pub fn references(&self, recipe_id: Uuid) -> bool {
        self.starter_id == recipe_id || self.main_id == recipe_id || self.dessert_id == recipe_id
    }
}

/// Menu entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: Uuid,
    pub title: String,
    pub number_days: u32,
    pub number_services: u32,
    pub recipes_per_day: Vec<DayPlan>,
    pub calories_target: f64,
    pub allergies: Vec<Allergen>,
    pub diet: Option<Diet>,
    pub excluded_ingredients: Vec<Uuid>,
    /// Derived from the referenced recipes
    pub average_estimated_cost: f64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    /// Build and validate a menu owned by `owner_id`; the average cost is
    /// filled in by the caller once the recipes are resolved.
    pub fn create(new: NewMenu, owner_id: Uuid) -> ApiResult<Self> {
        let now = Utc::now();
        let menu = Menu {
            id: Uuid::new_v4(),
            title: new
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| default_title(now)),
            number_days: new.number_days,
            number_services: new.number_services,
            recipes_per_day: new.recipes_per_day,
            calories_target: new.calories_target,
            allergies: new.allergies,
            diet: new.diet,
            excluded_ingredients: new.excluded_ingredients,
            average_estimated_cost: 0.0,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        menu.validate()?;
        Ok(menu)
    }

    pub fn apply(&self, update: UpdateMenu) -> ApiResult<Self> {
        let mut next = self.clone();
        if let Some(title) = update.title {
            next.title = title.trim().to_string();
        }
        if let Some(days) = update.number_days {
            next.number_days = days;
        }
        if let Some(services) = update.number_services {
            next.number_services = services;
        }
        if let Some(plan) = update.recipes_per_day {
            next.recipes_per_day = plan;
        }
        if let Some(target) = update.calories_target {
            next.calories_target = target;
        }
        if let Some(allergies) = update.allergies {
            next.allergies = allergies;
        }
        if let Some(diet) = update.diet {
            next.diet = Some(diet);
        }
        if let Some(excluded) = update.excluded_ingredients {
            next.excluded_ingredients = excluded;
        }
        next.updated_at = Utc::now();
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.number_days == 0 {
            return Err(ApiError::validation("numberDays", "numberDays must be greater than zero"));
        }
        if self.number_services == 0 {
            return Err(ApiError::validation(
                "numberServices",
                "numberServices must be greater than zero",
            ));
        }
        if self.recipes_per_day.len() != self.number_days as usize {
            return Err(ApiError::validation(
                "recipesPerDay",
                format!(
                    "Expected {} days of recipes, got {}",
                    self.number_days,
                    self.recipes_per_day.len()
                ),
            ));
        }
        non_negative("caloriesTarget", self.calories_target)?;
        non_negative("averageEstimatedCost", self.average_estimated_cost)
    }

    /// Distinct recipe ids referenced by any day
    pub fn recipe_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for day in &self.recipes_per_day {
            for (_, id) in day.courses() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    pub fn references(&self, recipe_id: Uuid) -> bool {
        self.recipes_per_day.iter().any(|day| day.references(recipe_id))
    }
}

/// Title given to menus created without one, e.g. `16/10/2026`
pub fn default_title(now: DateTime<Utc>) -> String {
    now.format("%d/%m/%Y").to_string()
}

/// New menu creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewMenu {
    pub title: Option<String>,
    pub number_days: u32,
    pub number_services: u32,
    pub recipes_per_day: Vec<DayPlan>,
    pub calories_target: f64,
    #[serde(default)]
    pub allergies: Vec<Allergen>,
    pub diet: Option<Diet>,
    #[serde(default)]
    pub excluded_ingredients: Vec<Uuid>,
}

/// Menu update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMenu {
    pub title: Option<String>,
    pub number_days: Option<u32>,
    pub number_services: Option<u32>,
    pub recipes_per_day: Option<Vec<DayPlan>>,
    pub calories_target: Option<f64>,
    pub allergies: Option<Vec<Allergen>>,
    pub diet: Option<Diet>,
    pub excluded_ingredients: Option<Vec<Uuid>>,
}

impl UpdateMenu {
    /// Whether the update touches anything the average cost derives from
    pub fn changes_cost(&self) -> bool {
        self.recipes_per_day.is_some() || self.number_services.is_some()
    }
}
