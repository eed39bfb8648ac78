//! Recipe lookup by available ingredients

use uuid::Uuid;

use crate::models::Recipe;

/// Maximum number of recipes a search returns
pub const SEARCH_LIMIT: usize = 5;

/// Rank recipes by how many of `requested` they use
///
/// Recipes using every requested ingredient come first, then the rest by
/// number of distinct matches. Recipes matching nothing are dropped and ties
/// keep their original order.
pub fn rank_recipes(recipes: Vec<Recipe>, requested: &[Uuid]) -> Vec<Recipe> {
    let mut wanted: Vec<Uuid> = Vec::with_capacity(requested.len());
    for id in requested {
        if !wanted.contains(id) {
            wanted.push(*id);
        }
    }
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(bool, usize, Recipe)> = recipes
        .into_iter()
        .filter_map(|recipe| {
            let score = wanted.iter().filter(|id| recipe.uses(**id)).count();
            (score > 0).then(|| (score == wanted.len(), score, recipe))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    scored
        .into_iter()
        .take(SEARCH_LIMIT)
        .map(|(_, _, recipe)| recipe)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodType, IngredientUsage, NewRecipe};

    fn recipe(name: &str, uses: &[Uuid]) -> Recipe {
        let new = NewRecipe {
            name: name.into(),
            servings: 1,
            preparation_time: 5,
            food_type: FoodType::Main,
            instructions: vec!["Mix".into()],
            comments: None,
            cookware: vec![],
            ingredients: vec![],
        };
        let lines = uses
            .iter()
            .map(|id| IngredientUsage {
                ingredient_id: *id,
                amount: 1.0,
                unit: "g".into(),
            })
            .collect();
        Recipe::from_details(&new, lines, Uuid::new_v4())
    }

    fn names(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_full_matches_rank_first() {
        let (egg, milk, flour) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let recipes = vec![
            recipe("omelette", &[egg]),
            recipe("unrelated", &[Uuid::new_v4()]),
            recipe("crepe", &[egg, milk, flour]),
            recipe("custard", &[egg, milk]),
            recipe("scramble", &[egg, egg]),
        ];

        let ranked = rank_recipes(recipes, &[egg, milk, egg]);
        assert_eq!(names(&ranked), ["crepe", "custard", "omelette", "scramble"]);
    }

    #[test]
    fn test_limit_and_empty_request() {
        let egg = Uuid::new_v4();
        let recipes: Vec<Recipe> = (0..8).map(|i| recipe(&format!("r{}", i), &[egg])).collect();
        assert!(rank_recipes(recipes.clone(), &[]).is_empty());

        let ranked = rank_recipes(recipes, &[egg]);
        assert_eq!(names(&ranked), ["r0", "r1", "r2", "r3", "r4"]);
    }
}
