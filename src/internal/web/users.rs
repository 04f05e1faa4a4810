//! User endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::internal::model::user;
use crate::internal::service::{CreateUser, UpdateUser};

#[derive(Deserialize)]
pub struct ListQuery {
    limit: Option<u64>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<user::Model>), ApiError> {
    let created = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(state.users.get(id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<user::Model>>, ApiError> {
    Ok(Json(state.users.list(query.limit).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(state.users.update(id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
