//! HTTP handlers for the review and rejection endpoints.

use axum::extract::{Path, State};
use axum::Json;
use log::error;
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::state::AppState;

use super::engine;
use super::{
    CreateReviewRequest, RejectTaskRequest, TaskRejection, TaskReview, UpdateReviewRequest,
};

pub async fn handle_review_create(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<TaskReview>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    match engine::record_review(&mut conn, task_id, payload) {
        Ok(review) => Ok(Json(review)),
        Err(e) => {
            error!("Failed to record review for task {task_id}: {e}");
            Err(e)
        }
    }
}

pub async fn handle_task_reject(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<RejectTaskRequest>,
) -> Result<Json<TaskRejection>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    match engine::reject_task(&mut conn, task_id, payload) {
        Ok(rejection) => Ok(Json(rejection)),
        Err(e) => {
            error!("Failed to reject task {task_id}: {e}");
            Err(e)
        }
    }
}

pub async fn handle_review_update(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<TaskReview>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    match engine::update_review(&mut conn, review_id, payload) {
        Ok(review) => Ok(Json(review)),
        Err(e) => {
            error!("Failed to update review {review_id}: {e}");
            Err(e)
        }
    }
}
