pub mod engine;
pub mod handlers;

use axum::{
    routing::{post, put},
    Router,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::schema::tasks::{task_rejections, task_reviews};
use crate::shared::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = task_reviews)]
pub struct TaskReview {
    pub id: Uuid,
    pub task_id: Uuid,
    pub reviewer_id: Uuid,
    pub task_owner_id: Uuid,
    pub quality_score: i32,
    pub notes: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = task_rejections)]
pub struct TaskRejection {
    pub id: Uuid,
    pub task_id: Uuid,
    pub rejected_by: Uuid,
    pub reason: String,
    pub notes: Option<String>,
    pub rejected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub reviewer_id: Uuid,
    pub task_owner_id: Uuid,
    pub quality_score: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectTaskRequest {
    pub rejected_by: Uuid,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReviewRequest {
    pub quality_score: Option<i32>,
    pub notes: Option<String>,
}

pub fn configure_reviews_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/tasks/:id/reviews",
            post(handlers::handle_review_create),
        )
        .route("/api/tasks/:id/reject", post(handlers::handle_task_reject))
        .route("/api/reviews/:id", put(handlers::handle_review_update))
}
