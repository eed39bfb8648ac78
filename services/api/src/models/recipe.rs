//! Recipe model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    enums::{Allergen, FoodType},
    nutrient::Nutrient,
};
use crate::{
    error::{ApiError, ApiResult},
    validation::{positive, require_text},
};

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientUsage {
    pub ingredient_id: Uuid,
    pub amount: f64,
    /// Copied from the ingredient when the line is resolved
    pub unit: String,
}

/// Ingredient line as supplied by clients
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IngredientUsageInput {
    pub ingredient_id: Uuid,
    pub amount: f64,
}

/// Recipe entity
///
/// `estimated_cost`, `allergens` and `nutrients` are derived from
/// `ingredients` and never taken from client input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub servings: u32,
    /// Minutes
    pub preparation_time: u32,
    pub food_type: FoodType,
    pub instructions: Vec<String>,
    pub comments: Option<String>,
    pub cookware: Vec<String>,
    pub ingredients: Vec<IngredientUsage>,
    pub estimated_cost: f64,
    pub allergens: Vec<Allergen>,
    pub nutrients: Vec<Nutrient>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Build a recipe from validated details and already resolved ingredient lines.
    /// Derived fields start empty and are filled by the nutrition calculator.
    pub fn from_details(new: &NewRecipe, ingredients: Vec<IngredientUsage>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Recipe {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            servings: new.servings,
            preparation_time: new.preparation_time,
            food_type: new.food_type,
            instructions: trimmed(&new.instructions),
            comments: new.comments.as_ref().map(|c| c.trim().to_string()),
            cookware: trimmed(&new.cookware),
            ingredients,
            estimated_cost: 0.0,
            allergens: Vec::new(),
            nutrients: Vec::new(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply every non-ingredient field of `update`
    pub fn apply_details(&self, update: &UpdateRecipe) -> ApiResult<Self> {
        let mut next = self.clone();
        if let Some(name) = &update.name {
            next.name = require_text("name", name)?;
        }
        if let Some(servings) = update.servings {
            validate_servings(servings)?;
            next.servings = servings;
        }
        if let Some(time) = update.preparation_time {
            next.preparation_time = time;
        }
        if let Some(food_type) = update.food_type {
            next.food_type = food_type;
        }
        if let Some(instructions) = &update.instructions {
            validate_instructions(instructions)?;
            next.instructions = trimmed(instructions);
        }
        if let Some(comments) = &update.comments {
            next.comments = Some(comments.trim().to_string());
        }
        if let Some(cookware) = &update.cookware {
            next.cookware = trimmed(cookware);
        }
        next.updated_at = Utc::now();
        Ok(next)
    }

    /// Whether any ingredient line references `ingredient_id`
    pub fn uses(&self, ingredient_id: Uuid) -> bool {
        self.ingredients
            .iter()
            .any(|line| line.ingredient_id == ingredient_id)
    }

    /// Total amount of `ingredient_id` consumed across all lines
    pub fn used_amount(&self, ingredient_id: Uuid) -> f64 {
        self.ingredients
            .iter()
            .filter(|line| line.ingredient_id == ingredient_id)
            .map(|line| line.amount)
            .sum()
    }

    /// Distinct ingredient ids, in list order
    pub fn ingredient_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(self.ingredients.len());
        for line in &self.ingredients {
            if !ids.contains(&line.ingredient_id) {
                ids.push(line.ingredient_id);
            }
        }
        ids
    }
}

fn trimmed(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| l.trim().to_string()).collect()
}

fn validate_servings(servings: u32) -> ApiResult<()> {
    if servings == 0 {
        return Err(ApiError::validation("servings", "servings must be greater than zero"));
    }
    Ok(())
}

fn validate_instructions(instructions: &[String]) -> ApiResult<()> {
    if instructions.is_empty() || instructions.iter().all(|s| s.trim().is_empty()) {
        return Err(ApiError::validation("instructions", "At least one step is required"));
    }
    Ok(())
}

/// Validate a client-supplied ingredient list
pub fn validate_usages(usages: &[IngredientUsageInput]) -> ApiResult<()> {
    if usages.is_empty() {
        return Err(ApiError::validation(
            "ingredients",
            "A recipe needs at least one ingredient",
        ));
    }
    for usage in usages {
        positive("ingredients.amount", usage.amount)?;
    }
    Ok(())
}

/// New recipe creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewRecipe {
    pub name: String,
    pub servings: u32,
    pub preparation_time: u32,
    pub food_type: FoodType,
    pub instructions: Vec<String>,
    pub comments: Option<String>,
    #[serde(default)]
    pub cookware: Vec<String>,
    pub ingredients: Vec<IngredientUsageInput>,
}

impl NewRecipe {
    pub fn validate(&self) -> ApiResult<()> {
        require_text("name", &self.name)?;
        validate_servings(self.servings)?;
        validate_instructions(&self.instructions)?;
        validate_usages(&self.ingredients)
    }
}

/// Recipe update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateRecipe {
    pub name: Option<String>,
    pub servings: Option<u32>,
    pub preparation_time: Option<u32>,
    pub food_type: Option<FoodType>,
    pub instructions: Option<Vec<String>>,
    pub comments: Option<String>,
    pub cookware: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientUsageInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_recipe() -> NewRecipe {
        NewRecipe {
            name: " Gazpacho ".into(),
            servings: 4,
            preparation_time: 20,
            food_type: FoodType::Starter,
            instructions: vec!["Blend everything".into()],
            comments: None,
            cookware: vec!["blender".into()],
            ingredients: vec![IngredientUsageInput {
                ingredient_id: Uuid::new_v4(),
                amount: 500.0,
            }],
        }
    }

    #[test]
    fn test_new_recipe_validation() {
        assert!(new_recipe().validate().is_ok());

        let mut zero_servings = new_recipe();
        zero_servings.servings = 0;
        assert!(zero_servings.validate().is_err());

        let mut no_steps = new_recipe();
        no_steps.instructions.clear();
        assert!(no_steps.validate().is_err());

        let mut no_ingredients = new_recipe();
        no_ingredients.ingredients.clear();
        assert!(no_ingredients.validate().is_err());

        let mut negative_amount = new_recipe();
        negative_amount.ingredients[0].amount = -5.0;
        assert!(negative_amount.validate().is_err());
    }

    #[test]
    fn test_derived_fields_cannot_be_supplied() {
        let body = serde_json::json!({
            "name": "Flan",
            "servings": 2,
            "preparationTime": 30,
            "foodType": "dessert",
            "instructions": ["Bake"],
            "ingredients": [],
            "estimatedCost": 0.5,
        });
        assert!(serde_json::from_value::<NewRecipe>(body).is_err());
    }

    #[test]
    fn test_used_amount_sums_repeated_lines() {
        let id = Uuid::new_v4();
        let mut recipe = Recipe::from_details(&new_recipe(), vec![], Uuid::new_v4());
        recipe.ingredients = vec![
            IngredientUsage { ingredient_id: id, amount: 50.0, unit: "g".into() },
            IngredientUsage { ingredient_id: Uuid::new_v4(), amount: 10.0, unit: "g".into() },
            IngredientUsage { ingredient_id: id, amount: 25.0, unit: "g".into() },
        ];
        assert_eq!(recipe.used_amount(id), 75.0);
        assert_eq!(recipe.ingredient_ids().len(), 2);
        assert!(recipe.uses(id));
        assert_eq!(recipe.name, "Gazpacho");
    }
}
