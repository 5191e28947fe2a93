//! Review engine - task lifecycle mutations and their performance fallout.

use chrono::Utc;
use diesel::prelude::*;
use log::info;
use uuid::Uuid;

use crate::performance;
use crate::shared::error::ApiError;
use crate::shared::schema::tasks::{task_rejections, task_reviews, tasks as tasks_table};
use crate::tasks::{Task, TaskStatus};

use super::{
    CreateReviewRequest, RejectTaskRequest, TaskRejection, TaskReview, UpdateReviewRequest,
};

/// Records a review of a task and refreshes the reviewed person's aggregates.
///
/// The task's status is left alone; any number of reviews can accumulate on
/// one task. Each call counts as a full performance event for the task owner,
/// so re-reviewing the same task keeps adding to the owner's counters.
pub fn record_review(
    conn: &mut PgConnection,
    task_id: Uuid,
    req: CreateReviewRequest,
) -> Result<TaskReview, ApiError> {
    validate_score(req.quality_score)?;

    conn.transaction(|conn| {
        let task: Task = tasks_table::table
            .find(task_id)
            .first(conn)
            .optional()?
            .ok_or(ApiError::TaskNotFound(task_id))?;

        let review = TaskReview {
            id: Uuid::new_v4(),
            task_id,
            reviewer_id: req.reviewer_id,
            task_owner_id: req.task_owner_id,
            quality_score: req.quality_score,
            notes: req.notes,
            reviewed_at: Utc::now(),
        };
        diesel::insert_into(task_reviews::table)
            .values(&review)
            .execute(conn)?;

        performance::apply_event(
            conn,
            review.task_owner_id,
            task.project_id,
            task.time_spent_in_minutes,
        )?;

        info!(
            "Recorded review {} for task {task_id} (owner {})",
            review.id, review.task_owner_id
        );
        Ok(review)
    })
}

/// Files a rejection and forces the task into `rejected`, whatever state it
/// was in before (a completed task can be rejected).
///
/// The performance event is credited to the rejecter: `rejected_by` takes the
/// owner position in both aggregate updates, mirroring the review flow.
pub fn reject_task(
    conn: &mut PgConnection,
    task_id: Uuid,
    req: RejectTaskRequest,
) -> Result<TaskRejection, ApiError> {
    conn.transaction(|conn| {
        let task: Task = tasks_table::table
            .find(task_id)
            .first(conn)
            .optional()?
            .ok_or(ApiError::TaskNotFound(task_id))?;

        let now = Utc::now();
        let rejection = TaskRejection {
            id: Uuid::new_v4(),
            task_id,
            rejected_by: req.rejected_by,
            reason: req.reason,
            notes: req.notes,
            rejected_at: now,
        };
        diesel::insert_into(task_rejections::table)
            .values(&rejection)
            .execute(conn)?;

        diesel::update(tasks_table::table.find(task_id))
            .set((
                tasks_table::status.eq(TaskStatus::Rejected.as_str()),
                tasks_table::updated_at.eq(now),
            ))
            .execute(conn)?;

        performance::apply_event(
            conn,
            rejection.rejected_by,
            task.project_id,
            task.time_spent_in_minutes,
        )?;

        info!(
            "Rejected task {task_id} (by {}): {}",
            rejection.rejected_by, rejection.reason
        );
        Ok(rejection)
    })
}

/// Overwrites a review's score and notes in place, then refreshes the
/// original task owner's aggregates against the full review history.
pub fn update_review(
    conn: &mut PgConnection,
    review_id: Uuid,
    req: UpdateReviewRequest,
) -> Result<TaskReview, ApiError> {
    if let Some(score) = req.quality_score {
        validate_score(score)?;
    }

    conn.transaction(|conn| {
        let mut review: TaskReview = task_reviews::table
            .find(review_id)
            .first(conn)
            .optional()?
            .ok_or(ApiError::ReviewNotFound(review_id))?;

        if let Some(score) = req.quality_score {
            review.quality_score = score;
        }
        if let Some(notes) = req.notes {
            review.notes = Some(notes);
        }

        diesel::update(task_reviews::table.find(review_id))
            .set((
                task_reviews::quality_score.eq(review.quality_score),
                task_reviews::notes.eq(review.notes.clone()),
            ))
            .execute(conn)?;

        let task: Task = tasks_table::table
            .find(review.task_id)
            .first(conn)
            .optional()?
            .ok_or(ApiError::TaskNotFound(review.task_id))?;

        performance::apply_event(
            conn,
            review.task_owner_id,
            task.project_id,
            task.time_spent_in_minutes,
        )?;

        Ok(review)
    })
}

pub fn validate_score(score: i32) -> Result<(), ApiError> {
    if !(0..=10).contains(&score) {
        return Err(ApiError::Validation(format!(
            "quality_score must be between 0 and 10, got {score}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(10).is_ok());
        assert!(validate_score(5).is_ok());
        assert!(validate_score(-1).is_err());
        assert!(validate_score(11).is_err());
    }
}
