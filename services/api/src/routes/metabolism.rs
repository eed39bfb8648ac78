//! Nutrition calculator endpoint

use axum::{Json, extract::rejection::JsonRejection, response::IntoResponse};

use crate::{
    error::ApiResult,
    metabolism::{self, MetabolismRequest},
};

/// Daily energy needs and per-meal macro targets
pub async fn calculate_nutrients(
    payload: Result<Json<MetabolismRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    Ok(Json(metabolism::calculate(&request)?))
}
