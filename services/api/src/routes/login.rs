//! Login endpoint

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use tracing::{error, info, warn};

use crate::{
    credentials::verify_password,
    error::{ApiError, ApiResult},
    models::LoginCredentials,
    state::AppState,
};

/// Exchange a username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(credentials) = payload?;
    let username = credentials.username.trim();

    if !state.login_limiter.is_allowed(username).await {
        warn!("Login throttled for {}", username);
        return Err(ApiError::TooManyRequests);
    }

    let user = state.repos.users.find_by_username(username).await?;
    let user = match user {
        Some(user) if verify_password(&user.password_hash, &credentials.password) => user,
        _ => {
            state.login_limiter.record_failure(username).await;
            return Err(ApiError::Unauthenticated);
        }
    };

    state.login_limiter.reset(username).await;

    let token = state.tokens.issue(&user).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    info!("User {} logged in", user.username);
    Ok(Json(token))
}
