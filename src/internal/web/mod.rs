//! HTTP API: the CRUD surface over users and tasks.
//!
//! Thin layer: handlers decode requests, delegate to the services, and map
//! [`ServiceError`] onto HTTP status codes. All domain rules live in the
//! service layer so the web and agent surfaces stay in exact agreement.

pub mod tasks;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::internal::service::{ServiceError, TaskService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub tasks: Arc<TaskService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .with_state(state)
}

/// Service failure translated to an HTTP response.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::DuplicateEmail(_) => StatusCode::CONFLICT,
            ServiceError::InvalidStatus(_) | ServiceError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Database(err) => {
                tracing::error!(error = %err, "database failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Internal detail stays in the log, not the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
