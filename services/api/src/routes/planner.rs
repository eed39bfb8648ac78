//! Meal planning endpoint

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::menus::save_new;
use crate::{
    access::Principal,
    error::{ApiError, ApiResult},
    models::{Allergen, Diet, Menu, NewMenu, Recipe},
    planner::{PlanFilter, average_estimated_cost, filter_recipes, generate_plan},
    state::AppState,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlannerRequest {
    pub number_days: u32,
    pub number_services: u32,
    #[serde(default)]
    pub allergies: Vec<Allergen>,
    #[serde(default)]
    pub excluded_ingredients: Vec<Uuid>,
    #[serde(default)]
    pub calories_target: f64,
    pub diet: Option<Diet>,
}

/// Generate a random menu for the caller and save it
pub async fn generate_menu(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PlannerRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    if request.number_days == 0 {
        return Err(ApiError::validation(
            "numberDays",
            "numberDays must be greater than zero",
        ));
    }
    if request.number_services == 0 {
        return Err(ApiError::validation(
            "numberServices",
            "numberServices must be greater than zero",
        ));
    }

    let recipes = state.repos.recipes.list().await?;
    let filter = PlanFilter {
        excluded_ingredients: request.excluded_ingredients.clone(),
        allergies: request.allergies.clone(),
    };
    let pool = filter_recipes(&recipes, &filter);

    let plan = {
        let mut rng = StdRng::from_entropy();
        generate_plan(&pool, request.number_days, &mut rng)?
    };

    let by_id: HashMap<Uuid, Recipe> = pool
        .iter()
        .map(|recipe| (recipe.id, (*recipe).clone()))
        .collect();

    let mut menu = Menu::create(
        NewMenu {
            title: None,
            number_days: request.number_days,
            number_services: request.number_services,
            recipes_per_day: plan,
            calories_target: request.calories_target,
            allergies: request.allergies,
            diet: request.diet,
            excluded_ingredients: request.excluded_ingredients,
        },
        principal.id,
    )?;
    menu.average_estimated_cost =
        average_estimated_cost(&menu.recipes_per_day, menu.number_services, &by_id)?;

    save_new(&state, &menu).await?;

    info!(
        "Generated {}-day menu {} for {}",
        menu.number_days, menu.id, principal.username
    );
    Ok((StatusCode::CREATED, Json(menu)))
}
