//! Menu endpoints

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    access::{Principal, authorize},
    error::{ApiError, ApiResult},
    integrity::{self, update_owner},
    models::{Menu, NewMenu, Recipe, UpdateMenu, user::push_id},
    planner::average_estimated_cost,
    state::AppState,
};

async fn load(state: &AppState, id: Uuid) -> ApiResult<Menu> {
    state
        .repos
        .menus
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu"))
}

/// Fill in the average cost from the recipes the menu serves
pub(crate) async fn price(state: &AppState, menu: &mut Menu) -> ApiResult<()> {
    let recipes: HashMap<Uuid, Recipe> = state
        .repos
        .recipes
        .find_many(&menu.recipe_ids())
        .await?
        .into_iter()
        .map(|recipe| (recipe.id, recipe))
        .collect();

    menu.average_estimated_cost =
        average_estimated_cost(&menu.recipes_per_day, menu.number_services, &recipes)?;
    Ok(())
}

/// Persist a menu and add it to its owner's saved menus
pub(crate) async fn save_new(state: &AppState, menu: &Menu) -> ApiResult<()> {
    state.repos.menus.insert(menu).await?;
    update_owner(&state.repos, menu.owner_id, |owner| {
        push_id(&mut owner.saved_menus, menu.id);
        true
    })
    .await
}

pub async fn list_menus(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.repos.menus.list().await?))
}

pub async fn get_menu(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    Ok(Json(load(&state, id).await?))
}

pub async fn create_menu(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<NewMenu>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new) = payload?;

    let mut menu = Menu::create(new, principal.id)?;
    price(&state, &mut menu).await?;
    save_new(&state, &menu).await?;

    info!("Menu {} created by {}", menu.id, principal.username);
    Ok((StatusCode::CREATED, Json(menu)))
}

pub async fn update_menu(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateMenu>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(update) = payload?;

    let current = load(&state, id).await?;
    authorize(&principal, current.owner_id)?;

    let reprice = update.changes_cost();
    let mut next = current.apply(update)?;
    if reprice {
        price(&state, &mut next).await?;
    }

    if !state.repos.menus.update(&next).await? {
        return Err(ApiError::not_found("Menu"));
    }

    Ok(Json(next))
}

pub async fn delete_menu(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;

    let menu = load(&state, id).await?;
    authorize(&principal, menu.owner_id)?;
    integrity::delete_menu(&state.repos, &menu).await?;

    info!("Menu {} deleted by {}", id, principal.username);
    Ok(StatusCode::NO_CONTENT)
}
