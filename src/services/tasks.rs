//! Task service — creation and the completion workflow.

use chrono::{DateTime, NaiveDate};

use crate::db::{CrmDb, DbTask, NewTask, TaskFilter, TaskPatch};
use crate::error::CrmError;

/// Due dates are stored as TEXT and filtered with a lexicographic compare,
/// so only zero-padded formats that sort chronologically are accepted:
/// `YYYY-MM-DD` or RFC3339.
fn validate_date(field: &'static str, value: &str) -> Result<(), CrmError> {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
    {
        return Ok(());
    }
    Err(CrmError::validation(
        field,
        "must be a YYYY-MM-DD date or RFC3339 timestamp",
    ))
}

fn validate_new(task: &NewTask) -> Result<(), CrmError> {
    if task.title.trim().is_empty() {
        return Err(CrmError::validation("title", "is required"));
    }
    if task.task_type.trim().is_empty() {
        return Err(CrmError::validation("type", "is required"));
    }
    if task.assigned_to_id.trim().is_empty() {
        return Err(CrmError::validation("assignedToId", "is required"));
    }
    if task.due_date.trim().is_empty() {
        return Err(CrmError::validation("dueDate", "is required"));
    }
    validate_date("dueDate", &task.due_date)
}

pub fn create_task(db: &CrmDb, task: &NewTask) -> Result<DbTask, CrmError> {
    validate_new(task)?;
    Ok(db.create_task(task)?)
}

pub fn get_task(db: &CrmDb, id: i64) -> Result<DbTask, CrmError> {
    db.get_task(id)?
        .ok_or_else(|| CrmError::not_found("Task", id))
}

pub fn list_tasks(
    db: &CrmDb,
    team_id: i64,
    filter: &TaskFilter,
) -> Result<Vec<DbTask>, CrmError> {
    if let Some(ref due) = filter.due_before {
        validate_date("dueBefore", due)?;
    }
    Ok(db.get_tasks(team_id, filter)?)
}

pub fn update_task(db: &CrmDb, id: i64, patch: &TaskPatch) -> Result<DbTask, CrmError> {
    if let Some(ref due) = patch.due_date {
        validate_date("dueDate", due)?;
    }
    db.update_task(id, patch)?
        .ok_or_else(|| CrmError::not_found("Task", id))
}

/// Complete a task. Completion is idempotent: the status always ends
/// COMPLETED but the completion time keeps its first value.
pub fn complete_task(db: &CrmDb, id: i64) -> Result<DbTask, CrmError> {
    db.complete_task(id)?
        .ok_or_else(|| CrmError::not_found("Task", id))
}
