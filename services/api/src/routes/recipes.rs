//! Recipe endpoints

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use super::NameFilter;
use crate::{
    access::{Principal, authorize},
    error::{ApiError, ApiResult},
    integrity::{self, update_owner},
    models::{NewRecipe, Recipe, UpdateRecipe, recipe::validate_usages, user::push_id},
    nutrition,
    state::AppState,
};

async fn load(state: &AppState, id: Uuid) -> ApiResult<Recipe> {
    state
        .repos
        .recipes
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe"))
}

pub async fn list_recipes(
    State(state): State<AppState>,
    query: Result<Query<NameFilter>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(filter) = query?;

    let recipes = match filter.name {
        Some(name) => state.repos.recipes.find_by_name(name.trim()).await?,
        None => state.repos.recipes.list().await?,
    };

    Ok(Json(recipes))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    Ok(Json(load(&state, id).await?))
}

/// Create a recipe; cost, allergens and nutrients come from its ingredients
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new) = payload?;
    new.validate()?;

    let (usages, derived) =
        nutrition::compute(state.repos.ingredients.as_ref(), &new.ingredients).await?;
    let mut recipe = Recipe::from_details(&new, usages, principal.id);
    derived.apply_to(&mut recipe);

    state.repos.recipes.insert(&recipe).await?;
    update_owner(&state.repos, principal.id, |owner| {
        push_id(&mut owner.created_recipes, recipe.id);
        true
    })
    .await?;

    info!("Recipe {} created by {}", recipe.id, principal.username);
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateRecipe>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(update) = payload?;

    let current = load(&state, id).await?;
    authorize(&principal, current.owner_id)?;
    let mut next = current.apply_details(&update)?;

    if let Some(lines) = &update.ingredients {
        validate_usages(lines)?;
        let (usages, derived) =
            nutrition::compute(state.repos.ingredients.as_ref(), lines).await?;
        next.ingredients = usages;
        derived.apply_to(&mut next);
    }

    if !state.repos.recipes.update(&next).await? {
        return Err(ApiError::not_found("Recipe"));
    }

    Ok(Json(next))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;

    let recipe = load(&state, id).await?;
    authorize(&principal, recipe.owner_id)?;
    integrity::delete_recipe(&state.repos, &recipe).await?;

    info!("Recipe {} deleted by {}", id, principal.username);
    Ok(StatusCode::NO_CONTENT)
}
