//! User endpoints

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
    access::{Principal, authorize, require_admin},
    credentials::hash_password,
    error::{ApiError, ApiResult},
    integrity,
    models::{DietaryProfile, NewUser, Role, UpdateUser, User, UserResponse},
    nutrition::resolve,
    state::AppState,
};

async fn load(state: &AppState, id: Uuid) -> ApiResult<User> {
    state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))
}

/// Fail unless every excluded ingredient exists
async fn check_profile(state: &AppState, profile: &DietaryProfile) -> ApiResult<()> {
    if !profile.excluded_ingredients.is_empty() {
        resolve(
            state.repos.ingredients.as_ref(),
            &profile.excluded_ingredients,
        )
        .await?;
    }
    Ok(())
}

/// Register a regular user
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new) = payload?;
    new.validate()?;
    check_profile(&state, &new.dietary_profile).await?;

    let password_hash = hash_password(&new.password)?;
    let user = User::create(new, password_hash, Role::Regular);
    state.repos.users.insert(&user).await?;

    info!("User {} registered", user.username);
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&principal)?;

    let users: Vec<UserResponse> = state
        .repos
        .users
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    authorize(&principal, id)?;
    Ok(Json(UserResponse::from(load(&state, id).await?)))
}

/// Update a user; only admins may change roles
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(update) = payload?;

    authorize(&principal, id)?;
    let current = load(&state, id).await?;
    update.validate()?;

    if update.role.is_some_and(|role| role != current.role) {
        require_admin(&principal)?;
    }

    if let Some(profile) = &update.dietary_profile {
        check_profile(&state, profile).await?;
    }

    if let Some(favorites) = &update.favorite_recipes {
        let found = state.repos.recipes.find_many(favorites).await?;
        if let Some(missing) = favorites
            .iter()
            .find(|id| !found.iter().any(|recipe| recipe.id == **id))
        {
            return Err(ApiError::not_found(format!("Recipe {}", missing)));
        }
    }

    let password_hash = match &update.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let next = current.apply(update, password_hash);
    if !state.repos.users.update(&next).await? {
        return Err(ApiError::not_found("User"));
    }

    Ok(Json(UserResponse::from(next)))
}

/// Delete a user, handing created content to an administrator
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    authorize(&principal, id)?;

    let user = load(&state, id).await?;
    let heir = integrity::delete_user(&state.repos, &user).await?;

    match heir {
        Some(admin) => info!("User {} deleted, content handed to {}", id, admin),
        None => info!("User {} deleted", id),
    }
    Ok(StatusCode::NO_CONTENT)
}
