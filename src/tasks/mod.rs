pub mod sweeper;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::schema::tasks::tasks as tasks_table;
use crate::shared::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = tasks_table)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub status: String,
    pub priority: String,
    pub time_spent_in_minutes: i32,
    pub start_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Doing,
    Reviewing,
    Rejected,
    Completed,
    Feedbacked,
    Overdued,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Feedbacked => "feedbacked",
            Self::Overdued => "overdued",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            "feedbacked" => Some(Self::Feedbacked),
            "overdued" => Some(Self::Overdued),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub time_spent_in_minutes: Option<i32>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub time_spent_in_minutes: Option<i32>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Due date is derived from the planned start plus the estimated effort.
pub fn compute_due_at(
    start_at: Option<DateTime<Utc>>,
    time_spent_in_minutes: i32,
) -> Option<DateTime<Utc>> {
    start_at.map(|start| start + Duration::minutes(i64::from(time_spent_in_minutes)))
}

fn parse_status(value: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::parse(value)
        .ok_or_else(|| ApiError::Validation(format!("unknown task status: {value}")))
}

fn parse_priority(value: &str) -> Result<TaskPriority, ApiError> {
    TaskPriority::parse(value)
        .ok_or_else(|| ApiError::Validation(format!("unknown task priority: {value}")))
}

fn check_time_spent(minutes: i32) -> Result<(), ApiError> {
    if minutes < 0 {
        return Err(ApiError::Validation(
            "time_spent_in_minutes must not be negative".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    let status = match &req.status {
        Some(value) => parse_status(value)?,
        None => TaskStatus::Todo,
    };
    let priority = match &req.priority {
        Some(value) => parse_priority(value)?,
        None => TaskPriority::Medium,
    };
    let time_spent = req.time_spent_in_minutes.unwrap_or(0);
    check_time_spent(time_spent)?;

    let now = Utc::now();
    let task = Task {
        id: Uuid::new_v4(),
        project_id: req.project_id,
        name: req.name,
        description: req.description,
        assigned_to: req.assigned_to,
        status: status.as_str().to_string(),
        priority: priority.as_str().to_string(),
        time_spent_in_minutes: time_spent,
        start_at: req.start_at,
        due_at: compute_due_at(req.start_at, time_spent),
        end_at: req.end_at,
        completed_at: (status == TaskStatus::Completed).then_some(now),
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(tasks_table::table)
        .values(&task)
        .execute(&mut conn)?;

    info!("Created task {} in project {}", task.id, task.project_id);
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    let mut task: Task = tasks_table::table
        .find(id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::TaskNotFound(id))?;

    let now = Utc::now();

    if let Some(name) = req.name {
        task.name = name;
    }
    if let Some(description) = req.description {
        task.description = Some(description);
    }
    if let Some(assigned_to) = req.assigned_to {
        task.assigned_to = Some(assigned_to);
    }
    if let Some(value) = &req.priority {
        task.priority = parse_priority(value)?.as_str().to_string();
    }

    // An explicit edit is the only thing allowed to move due_at.
    let reschedule = req.start_at.is_some() || req.time_spent_in_minutes.is_some();
    if let Some(start_at) = req.start_at {
        task.start_at = Some(start_at);
    }
    if let Some(minutes) = req.time_spent_in_minutes {
        check_time_spent(minutes)?;
        task.time_spent_in_minutes = minutes;
    }
    if reschedule {
        task.due_at = compute_due_at(task.start_at, task.time_spent_in_minutes);
    }
    if let Some(end_at) = req.end_at {
        task.end_at = Some(end_at);
    }

    if let Some(value) = &req.status {
        let status = parse_status(value)?;
        if status == TaskStatus::Completed {
            if task.completed_at.is_none() {
                task.completed_at = Some(now);
            }
        } else {
            task.completed_at = None;
        }
        task.status = status.as_str().to_string();
    }
    task.updated_at = now;

    diesel::update(tasks_table::table.find(id))
        .set((
            tasks_table::name.eq(task.name.clone()),
            tasks_table::description.eq(task.description.clone()),
            tasks_table::assigned_to.eq(task.assigned_to),
            tasks_table::status.eq(task.status.clone()),
            tasks_table::priority.eq(task.priority.clone()),
            tasks_table::time_spent_in_minutes.eq(task.time_spent_in_minutes),
            tasks_table::start_at.eq(task.start_at),
            tasks_table::due_at.eq(task.due_at),
            tasks_table::end_at.eq(task.end_at),
            tasks_table::completed_at.eq(task.completed_at),
            tasks_table::updated_at.eq(task.updated_at),
        ))
        .execute(&mut conn)?;

    Ok(Json(task))
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    sweeper::sweep_overdue(&mut conn)?;

    let limit = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    let mut q = tasks_table::table.into_boxed();
    if let Some(project_id) = query.project_id {
        q = q.filter(tasks_table::project_id.eq(project_id));
    }
    if let Some(status) = query.status {
        q = q.filter(tasks_table::status.eq(status));
    }
    if let Some(assigned_to) = query.assigned_to {
        q = q.filter(tasks_table::assigned_to.eq(assigned_to));
    }

    let tasks: Vec<Task> = q
        .order(tasks_table::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load(&mut conn)?;

    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    // Single reads get the same stale-status correction as the list.
    sweeper::sweep_overdue(&mut conn)?;

    let task: Task = tasks_table::table
        .find(id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::TaskNotFound(id))?;

    Ok(Json(task))
}

pub fn configure_tasks_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/:id", get(get_task).put(update_task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            TaskStatus::Todo,
            TaskStatus::Doing,
            TaskStatus::Reviewing,
            TaskStatus::Rejected,
            TaskStatus::Completed,
            TaskStatus::Feedbacked,
            TaskStatus::Overdued,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("archived"), None);
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn test_compute_due_at_adds_estimated_minutes() {
        let start = Utc::now();
        let due = compute_due_at(Some(start), 90).unwrap();
        assert_eq!(due - start, Duration::minutes(90));
    }

    #[test]
    fn test_compute_due_at_without_start() {
        assert_eq!(compute_due_at(None, 90), None);
    }

    #[test]
    fn test_check_time_spent_rejects_negative() {
        assert!(check_time_spent(0).is_ok());
        assert!(check_time_spent(480).is_ok());
        assert!(check_time_spent(-1).is_err());
    }

    #[test]
    fn test_create_request_minimal_json() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"project_id":"7f8de4a2-5ad1-4ba5-a9ad-35ba95ff2a48","name":"Draft onboarding doc"}"#,
        )
        .unwrap();
        assert_eq!(req.name, "Draft onboarding doc");
        assert!(req.status.is_none());
        assert!(req.time_spent_in_minutes.is_none());
    }
}
