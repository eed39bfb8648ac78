//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{access, error::ApiError, state::AppState};

/// Resolve the bearer token to a [`access::Principal`] and store it in the
/// request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req.headers().typed_get::<Authorization<Bearer>>();
    let token = bearer.as_ref().map(|auth| auth.token());

    let principal = access::authenticate(&state.tokens, state.repos.users.as_ref(), token).await?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
