//! HTTP routes of the menu planner

use axum::{
    Json, Router,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{middleware::auth_middleware, state::AppState};

pub mod ingredients;
pub mod login;
pub mod menus;
pub mod metabolism;
pub mod planner;
pub mod recipes;
pub mod search;
pub mod users;

/// `?name=` filter accepted by the listing endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameFilter {
    pub name: Option<String>,
}

/// Create the router for the menu planner
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/user", get(users::list_users))
        .route(
            "/user/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/ingredient", post(ingredients::create_ingredient))
        .route(
            "/ingredient/:id",
            patch(ingredients::update_ingredient)
                .delete(ingredients::delete_ingredient),
        )
        .route("/recipe", post(recipes::create_recipe))
        .route(
            "/recipe/:id",
            patch(recipes::update_recipe).delete(recipes::delete_recipe),
        )
        .route("/menu", post(menus::create_menu))
        .route(
            "/menu/:id",
            patch(menus::update_menu).delete(menus::delete_menu),
        )
        .route("/planner", post(planner::generate_menu))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(login::login))
        .route("/user", post(users::create_user))
        .route("/ingredient", get(ingredients::list_ingredients))
        .route("/ingredient/:id", get(ingredients::get_ingredient))
        .route("/recipe", get(recipes::list_recipes))
        .route("/recipe/:id", get(recipes::get_recipe))
        .route("/menu", get(menus::list_menus))
        .route("/menu/:id", get(menus::get_menu))
        .route(
            "/recipeSearchPerIngredients",
            post(search::search_recipes),
        )
        .route("/calcNutrientsUser", post(metabolism::calculate_nutrients))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "menu-planner"
    }))
}
