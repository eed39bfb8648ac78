//! Recipe search endpoint

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{error::ApiResult, search::rank_recipes, state::AppState};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchRequest {
    pub ingredients: Vec<Uuid>,
}

/// Up to five recipes that best use the given ingredients
pub async fn search_recipes(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;

    let recipes = if request.ingredients.is_empty() {
        Vec::new()
    } else {
        rank_recipes(state.repos.recipes.list().await?, &request.ingredients)
    };

    Ok(Json(json!({ "recipes": recipes })))
}
