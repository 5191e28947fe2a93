//! Read-time reclassification of stale tasks.

use chrono::Utc;
use diesel::prelude::*;
use log::info;

use crate::shared::schema::tasks::tasks as tasks_table;

use super::TaskStatus;

/// Flips every unfinished task whose due date has passed to `overdued`.
///
/// The rule is a blanket one: any task with a null `completed_at` and a
/// `due_at` in the past is flipped, whatever its current status (rejected and
/// feedbacked included), except tasks already marked overdued.
pub fn sweep_overdue(conn: &mut PgConnection) -> QueryResult<usize> {
    let now = Utc::now();
    let flipped = diesel::update(
        tasks_table::table
            .filter(tasks_table::completed_at.is_null())
            .filter(tasks_table::due_at.lt(now))
            .filter(tasks_table::status.ne(TaskStatus::Overdued.as_str())),
    )
    .set((
        tasks_table::status.eq(TaskStatus::Overdued.as_str()),
        tasks_table::updated_at.eq(now),
    ))
    .execute(conn)?;

    if flipped > 0 {
        info!("Marked {flipped} tasks as overdued");
    }

    Ok(flipped)
}
