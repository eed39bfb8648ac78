//! Domain models

pub mod enums;
pub mod ingredient;
pub mod menu;
pub mod nutrient;
pub mod recipe;
pub mod user;

// Re-export for convenience
pub use enums::{ActivityLevel, Allergen, Diet, FoodGroup, FoodType, Gender, Role};
pub use ingredient::{Ingredient, NewIngredient, UpdateIngredient};
pub use menu::{DayPlan, Menu, NewMenu, UpdateMenu};
pub use nutrient::{MANDATORY_NUTRIENTS, Nutrient, NutrientInput, NutrientKind};
pub use recipe::{IngredientUsage, IngredientUsageInput, NewRecipe, Recipe, UpdateRecipe};
pub use user::{
    Biometrics, DietaryProfile, LoginCredentials, NewUser, UpdateUser, User, UserResponse,
};

/// Drop repeated items, keeping the first occurrence of each
pub(crate) fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
