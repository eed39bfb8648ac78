//! Closed enumerations used across the domain model

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fourteen regulated food allergens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Gluten,
    Crustaceans,
    Eggs,
    Fish,
    Peanuts,
    Soy,
    Milk,
    TreeNuts,
    Celery,
    Mustard,
    Sesame,
    Sulphites,
    Lupin,
    Molluscs,
}

/// Food group an ingredient belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    Dairy,
    Eggs,
    Meat,
    Fish,
    FatsAndOils,
    Cereals,
    Legumes,
    Vegetables,
    Fruits,
    Sugars,
    Beverages,
    Miscellaneous,
    Other,
}

/// Course a recipe is served as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    Starter,
    Main,
    Dessert,
}

impl FoodType {
    /// All courses in serving order
    pub const ALL: [FoodType; 3] = [FoodType::Starter, FoodType::Main, FoodType::Dessert];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Starter => "starter",
            FoodType::Main => "main",
            FoodType::Dessert => "dessert",
        }
    }
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dietary restriction a menu or user follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    Diabetic,
    Vegetarian,
    Vegan,
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Regular,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Regular => "regular",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Physical activity level with its daily energy multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days a week
    Light,
    /// Moderate exercise 3-5 days a week
    Moderate,
    /// Hard exercise 6-7 days a week
    Active,
    /// Daily training, or twice a day
    VeryActive,
}

impl ActivityLevel {
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Allergen::TreeNuts).unwrap(), "\"tree_nuts\"");
        assert_eq!(serde_json::to_string(&FoodType::Main).unwrap(), "\"main\"");
        assert_eq!(
            serde_json::to_string(&ActivityLevel::VeryActive).unwrap(),
            "\"very_active\""
        );
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!(serde_json::from_str::<Allergen>("\"pollen\"").is_err());
        assert!(serde_json::from_str::<FoodType>("\"snack\"").is_err());
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn test_activity_factors() {
        assert_eq!(ActivityLevel::Sedentary.factor(), 1.2);
        assert_eq!(ActivityLevel::VeryActive.factor(), 1.9);
    }
}
