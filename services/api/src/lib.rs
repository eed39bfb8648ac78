//! Menu planner API
//!
//! Ingredients, recipes derived from them, menus built from recipes and the
//! users who own all three, served over a JSON HTTP interface.

pub mod access;
pub mod credentials;
pub mod error;
pub mod integrity;
pub mod jwt;
pub mod metabolism;
pub mod middleware;
pub mod models;
pub mod nutrition;
pub mod planner;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod search;
pub mod settings;
pub mod state;
pub mod validation;

use tracing::info;

pub use routes::create_router;
pub use state::AppState;

use crate::{
    credentials::hash_password,
    error::ApiResult,
    models::{NewUser, Role, User},
    repositories::Repositories,
    settings::AdminBootstrap,
};

/// Create the configured administrator unless the username is already taken
///
/// Returns `true` when a new account was inserted.
pub async fn bootstrap_admin(repos: &Repositories, admin: &AdminBootstrap) -> ApiResult<bool> {
    if repos.users.find_by_username(admin.username.trim()).await?.is_some() {
        return Ok(false);
    }

    let new = NewUser {
        username: admin.username.clone(),
        name: admin.username.clone(),
        password: admin.password.clone(),
        email: admin.email.clone(),
        dietary_profile: Default::default(),
        biometrics: Default::default(),
    };
    new.validate()?;

    let password_hash = hash_password(&new.password)?;
    let user = User::create(new, password_hash, Role::Admin);
    repos.users.insert(&user).await?;

    info!("Administrator {} created", user.username);
    Ok(true)
}
