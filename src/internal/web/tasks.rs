//! Task endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::internal::model::task;
use crate::internal::service::{CreateTask, UpdateTask};

#[derive(Deserialize)]
pub struct ListQuery {
    status: Option<String>,
    limit: Option<u64>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, Json<task::Model>), ApiError> {
    let created = state.tasks.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<task::Model>, ApiError> {
    Ok(Json(state.tasks.get(id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<task::Model>>, ApiError> {
    Ok(Json(
        state.tasks.list(query.status.as_deref(), query.limit).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<task::Model>, ApiError> {
    Ok(Json(state.tasks.update(id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
