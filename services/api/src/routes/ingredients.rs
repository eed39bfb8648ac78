//! Ingredient endpoints

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
    models::{Ingredient, NewIngredient, UpdateIngredient, user::push_id},
    nutrition,
    state::AppState,
    validation::normalize_ingredient_name,
};

async fn load(state: &AppState, id: Uuid) -> ApiResult<Ingredient> {
    state
        .repos
        .ingredients
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ingredient"))
}

/// List ingredients, optionally only the one called `?name=`
pub async fn list_ingredients(
    State(state): State<AppState>,
    query: Result<Query<NameFilter>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(filter) = query?;

    let ingredients = match filter.name {
        Some(name) => {
            let name = normalize_ingredient_name(&name)?;
            state
                .repos
                .ingredients
                .find_by_name(&name)
                .await?
                .into_iter()
                .collect()
        }
        None => state.repos.ingredients.list().await?,
    };

    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    Ok(Json(load(&state, id).await?))
}

/// Create an ingredient owned by the caller
pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<NewIngredient>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new) = payload?;
    let ingredient = Ingredient::create(new, principal.id)?;

    state.repos.ingredients.insert(&ingredient).await?;
    update_owner(&state.repos, principal.id, |owner| {
        push_id(&mut owner.created_ingredients, ingredient.id);
        true
    })
    .await?;

    info!("Ingredient {} created by {}", ingredient.id, principal.username);
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// Update an ingredient and carry the change into every recipe using it
pub async fn update_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateIngredient>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(update) = payload?;

    let current = load(&state, id).await?;
    authorize(&principal, current.owner_id)?;
    let next = current.apply(update)?;

    let recipes = if current.derivation_changed(&next) {
        nutrition::plan_ingredient_change(&state.repos, &current, &next).await?
    } else {
        Vec::new()
    };

    if !state.repos.ingredients.update(&next).await? {
        return Err(ApiError::not_found("Ingredient"));
    }
    nutrition::save_recipes(&state.repos, &recipes).await?;

    if !recipes.is_empty() {
        info!("Ingredient {} update refreshed {} recipe(s)", id, recipes.len());
    }
    Ok(Json(next))
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;

    let ingredient = load(&state, id).await?;
    authorize(&principal, ingredient.owner_id)?;
    integrity::delete_ingredient(&state.repos, &ingredient).await?;

    info!("Ingredient {} deleted by {}", id, principal.username);
    Ok(StatusCode::NO_CONTENT)
}
