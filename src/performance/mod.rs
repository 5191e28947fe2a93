//! Priority-weighted performance aggregation.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::schema::performance::{overall_performances, performance_data};
use crate::shared::schema::tasks::{task_reviews, tasks};
use crate::shared::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = performance_data)]
pub struct PerformanceData {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub working_hours: i64,
    pub task_completed: i32,
    pub quality_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = overall_performances)]
pub struct OverallPerformance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub working_hours: i64,
    pub task_completed: i32,
    pub quality_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// High-priority work counts double, medium one and a half times. Anything
/// unrecognized falls back to the base weight.
pub fn weight_for_priority(priority: &str) -> f64 {
    match priority {
        "high" => 2.0,
        "medium" => 1.5,
        _ => 1.0,
    }
}

/// Weighted average over (quality_score, task priority) pairs.
///
/// An empty review set yields `None`, which lands in the aggregate row as a
/// SQL NULL. "No reviews yet" and "scored zero" must stay distinguishable.
pub fn weighted_average(reviews: &[(i32, String)]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for (score, priority) in reviews {
        let weight = weight_for_priority(priority);
        weighted_sum += f64::from(*score) * weight;
        weight_sum += weight;
    }
    Some(weighted_sum / weight_sum)
}

/// Recomputes the weighted score for one user from the complete current
/// review history, project-scoped when a project id is given.
fn scoped_quality_score(
    conn: &mut PgConnection,
    user_id: Uuid,
    project_id: Option<Uuid>,
) -> QueryResult<Option<f64>> {
    let mut query = task_reviews::table
        .inner_join(tasks::table)
        .filter(task_reviews::task_owner_id.eq(user_id))
        .select((task_reviews::quality_score, tasks::priority))
        .into_boxed();
    if let Some(project_id) = project_id {
        query = query.filter(tasks::project_id.eq(project_id));
    }
    let reviews: Vec<(i32, String)> = query.load(conn)?;
    Ok(weighted_average(&reviews))
}

/// Folds one review or rejection event into both aggregate records.
///
/// Counters are running event totals: `working_hours` grows by the task's
/// recorded minutes and `task_completed` by one for every event, repeated
/// reviews of the same task included. The quality score is never blended
/// incrementally; each event triggers a full recomputation over every review
/// on record for the scope. Both upserts increment in the database so
/// concurrent events cannot drop counts.
pub fn apply_event(
    conn: &mut PgConnection,
    user_id: Uuid,
    project_id: Uuid,
    time_spent_in_minutes: i32,
) -> QueryResult<()> {
    let now = Utc::now();
    let worked = i64::from(time_spent_in_minutes);

    let project_score = scoped_quality_score(conn, user_id, Some(project_id))?;
    diesel::insert_into(performance_data::table)
        .values(&PerformanceData {
            id: Uuid::new_v4(),
            user_id,
            project_id,
            working_hours: worked,
            task_completed: 1,
            quality_score: project_score,
            created_at: now,
            updated_at: now,
        })
        .on_conflict((performance_data::user_id, performance_data::project_id))
        .do_update()
        .set((
            performance_data::working_hours.eq(performance_data::working_hours + worked),
            performance_data::task_completed.eq(performance_data::task_completed + 1),
            performance_data::quality_score.eq(project_score),
            performance_data::updated_at.eq(now),
        ))
        .execute(conn)?;

    let overall_score = scoped_quality_score(conn, user_id, None)?;
    diesel::insert_into(overall_performances::table)
        .values(&OverallPerformance {
            id: Uuid::new_v4(),
            user_id,
            working_hours: worked,
            task_completed: 1,
            quality_score: overall_score,
            created_at: now,
            updated_at: now,
        })
        .on_conflict(overall_performances::user_id)
        .do_update()
        .set((
            overall_performances::working_hours.eq(overall_performances::working_hours + worked),
            overall_performances::task_completed.eq(overall_performances::task_completed + 1),
            overall_performances::quality_score.eq(overall_score),
            overall_performances::updated_at.eq(now),
        ))
        .execute(conn)?;

    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub user_id: Uuid,
    pub project_id: Uuid,
}

pub async fn get_performance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<PerformanceData>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    let record: PerformanceData = performance_data::table
        .filter(performance_data::user_id.eq(query.user_id))
        .filter(performance_data::project_id.eq(query.project_id))
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::PerformanceNotFound(query.user_id))?;

    Ok(Json(record))
}

pub async fn get_overall_performance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<OverallPerformance>, ApiError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    let record: OverallPerformance = overall_performances::table
        .filter(overall_performances::user_id.eq(user_id))
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::PerformanceNotFound(user_id))?;

    Ok(Json(record))
}

pub fn configure_performance_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/performance", get(get_performance))
        .route(
            "/api/performance/overall/:user_id",
            get(get_overall_performance),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_weights() {
        assert_eq!(weight_for_priority("high"), 2.0);
        assert_eq!(weight_for_priority("medium"), 1.5);
        assert_eq!(weight_for_priority("low"), 1.0);
        assert_eq!(weight_for_priority("something-else"), 1.0);
    }

    #[test]
    fn test_weighted_average_mixed_priorities() {
        let reviews = vec![(8, "high".to_string()), (2, "low".to_string())];
        // (8*2 + 2*1) / (2 + 1)
        assert_eq!(weighted_average(&reviews), Some(6.0));
    }

    #[test]
    fn test_weighted_average_uniform_priority_is_plain_mean() {
        let reviews = vec![
            (4, "medium".to_string()),
            (6, "medium".to_string()),
            (8, "medium".to_string()),
        ];
        assert_eq!(weighted_average(&reviews), Some(6.0));
    }

    #[test]
    fn test_weighted_average_empty_is_none() {
        assert_eq!(weighted_average(&[]), None);
    }

    #[test]
    fn test_weighted_average_single_review() {
        let reviews = vec![(7, "high".to_string())];
        assert_eq!(weighted_average(&reviews), Some(7.0));
    }
}
