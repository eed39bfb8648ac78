//! Ingredient model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    dedup,
    enums::{Allergen, FoodGroup},
    nutrient::{Nutrient, NutrientInput, missing_mandatory},
};
use crate::{
    error::{ApiError, ApiResult},
    validation::{non_negative, normalize_ingredient_name, positive, require_text},
};

/// Default reference amount an ingredient's cost and nutrients refer to
pub const DEFAULT_REFERENCE_AMOUNT: f64 = 100.0;
pub const DEFAULT_UNIT: &str = "g";

/// Ingredient entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    /// Reference amount `estimated_cost` and `nutrients` are given for
    pub amount: f64,
    pub unit: String,
    pub estimated_cost: f64,
    pub food_group: FoodGroup,
    pub allergens: Vec<Allergen>,
    pub nutrients: Vec<Nutrient>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Build and validate a new ingredient owned by `owner_id`
    pub fn create(new: NewIngredient, owner_id: Uuid) -> ApiResult<Self> {
        let now = Utc::now();
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name: normalize_ingredient_name(&new.name)?,
            amount: new.amount.unwrap_or(DEFAULT_REFERENCE_AMOUNT),
            unit: new
                .unit
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            estimated_cost: new.estimated_cost,
            food_group: new.food_group,
            allergens: dedup(new.allergens),
            nutrients: new.nutrients.into_iter().map(Nutrient::from).collect(),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        ingredient.validate()?;
        Ok(ingredient)
    }

    /// Apply a partial update, returning the validated result
    pub fn apply(&self, update: UpdateIngredient) -> ApiResult<Self> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = normalize_ingredient_name(&name)?;
        }
        if let Some(amount) = update.amount {
            next.amount = amount;
        }
        if let Some(unit) = update.unit {
            next.unit = require_text("unit", &unit)?;
        }
        if let Some(cost) = update.estimated_cost {
            next.estimated_cost = cost;
        }
        if let Some(group) = update.food_group {
            next.food_group = group;
        }
        if let Some(allergens) = update.allergens {
            next.allergens = dedup(allergens);
        }
        if let Some(nutrients) = update.nutrients {
            next.nutrients = nutrients.into_iter().map(Nutrient::from).collect();
        }
        next.updated_at = Utc::now();
        next.validate()?;
        Ok(next)
    }

    /// Check the persisted invariants
    pub fn validate(&self) -> ApiResult<()> {
        positive("amount", self.amount)?;
        non_negative("estimatedCost", self.estimated_cost)?;

        for (i, nutrient) in self.nutrients.iter().enumerate() {
            non_negative("nutrients.amount", nutrient.amount)?;
            if self.nutrients[..i].iter().any(|n| n.name == nutrient.name) {
                return Err(ApiError::validation(
                    "nutrients",
                    format!("{:?} is listed more than once", nutrient.name),
                ));
            }
        }

        if let Some(missing) = missing_mandatory(&self.nutrients) {
            return Err(ApiError::validation(
                "nutrients",
                format!(
                    "Must contain energy, protein, carbohydrate, total fat, saturated fat, salt and sugar (missing {:?})",
                    missing
                ),
            ));
        }

        Ok(())
    }

    /// Whether moving from `self` to `next` changes what recipes derive from it
    pub fn derivation_changed(&self, next: &Ingredient) -> bool {
        self.amount != next.amount
            || self.estimated_cost != next.estimated_cost
            || self.allergens != next.allergens
            || self.nutrients != next.nutrients
    }

    /// Amount of `kind` per reference amount, if declared
    pub fn nutrient_amount(&self, kind: super::NutrientKind) -> Option<f64> {
        self.nutrients
            .iter()
            .find(|n| n.name == kind)
            .map(|n| n.amount)
    }
}

/// New ingredient creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewIngredient {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub estimated_cost: f64,
    pub food_group: FoodGroup,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub nutrients: Vec<NutrientInput>,
}

/// Ingredient update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateIngredient {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub estimated_cost: Option<f64>,
    pub food_group: Option<FoodGroup>,
    pub allergens: Option<Vec<Allergen>>,
    pub nutrients: Option<Vec<NutrientInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MANDATORY_NUTRIENTS, NutrientKind};

    fn label() -> Vec<NutrientInput> {
        MANDATORY_NUTRIENTS
            .iter()
            .map(|k| NutrientInput {
                name: *k,
                amount: 10.0,
            })
            .collect()
    }

    fn banana() -> NewIngredient {
        NewIngredient {
            name: "Platano".to_string(),
            amount: None,
            unit: None,
            estimated_cost: 5.2,
            food_group: FoodGroup::Fruits,
            allergens: vec![],
            nutrients: label(),
        }
    }

    #[test]
    fn test_create_applies_defaults() {
        let ingredient = Ingredient::create(banana(), Uuid::new_v4()).unwrap();
        assert_eq!(ingredient.name, "platano");
        assert_eq!(ingredient.amount, DEFAULT_REFERENCE_AMOUNT);
        assert_eq!(ingredient.unit, "g");
        assert_eq!(ingredient.nutrients[0].unit, "kcal");
    }

    #[test]
    fn test_missing_mandatory_nutrient_fails() {
        let mut new = banana();
        new.nutrients.retain(|n| n.name != NutrientKind::Salt);
        let err = Ingredient::create(new, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::ValidationFailed { ref field, .. } if field == "nutrients"));
    }

    #[test]
    fn test_extra_nutrients_are_accepted() {
        let mut new = banana();
        new.nutrients.push(NutrientInput {
            name: NutrientKind::Potassium,
            amount: 358.0,
        });
        assert!(Ingredient::create(new, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_negative_cost_fails() {
        let mut new = banana();
        new.estimated_cost = -1.0;
        assert!(Ingredient::create(new, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_zero_reference_amount_fails() {
        let mut new = banana();
        new.amount = Some(0.0);
        assert!(Ingredient::create(new, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_duplicate_allergens_collapse() {
        let mut new = banana();
        new.allergens = vec![Allergen::Milk, Allergen::Eggs, Allergen::Milk];
        let ingredient = Ingredient::create(new, Uuid::new_v4()).unwrap();
        assert_eq!(ingredient.allergens, vec![Allergen::Milk, Allergen::Eggs]);
    }

    #[test]
    fn test_missing_name_is_a_deserialization_error() {
        let body = serde_json::json!({
            "estimatedCost": 5.2,
            "foodGroup": "fruits",
            "nutrients": [],
        });
        assert!(serde_json::from_value::<NewIngredient>(body).is_err());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let body = serde_json::json!({ "estimatedCost": 1.0, "colour": "yellow" });
        assert!(serde_json::from_value::<UpdateIngredient>(body).is_err());
    }

    #[test]
    fn test_derivation_changed() {
        let ingredient = Ingredient::create(banana(), Uuid::new_v4()).unwrap();
        let renamed = ingredient
            .apply(UpdateIngredient {
                name: Some("banana".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(!ingredient.derivation_changed(&renamed));

        let repriced = ingredient
            .apply(UpdateIngredient {
                estimated_cost: Some(6.0),
                ..Default::default()
            })
            .unwrap();
        assert!(ingredient.derivation_changed(&repriced));
    }
}
