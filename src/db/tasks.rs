use super::*;
use crate::model::TaskStatus;

impl CrmDb {
    // =========================================================================
    // Tasks
    // =========================================================================

    /// Insert a task and return the stored row. Tasks start PENDING.
    pub fn create_task(&self, task: &NewTask) -> Result<DbTask, DbError> {
        let now = Self::now();
        self.conn.execute(
            "INSERT INTO tasks (
                team_id, prospect_id, assigned_to_id, type, title, description,
                due_date, priority, status, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'PENDING', ?9)",
            params![
                task.team_id,
                task.prospect_id,
                task.assigned_to_id,
                task.task_type,
                task.title,
                task.description,
                task.due_date,
                task.priority,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_task(id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Fetch a task by id.
    pub fn get_task(&self, id: i64) -> Result<Option<DbTask>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT} WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::map_task_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// List tasks for a team, optionally filtered by assignee, status, and
    /// due date (tasks due on or before the given instant). Ordered by due
    /// date ascending.
    pub fn get_tasks(&self, team_id: i64, filter: &TaskFilter) -> Result<Vec<DbTask>, DbError> {
        let mut sql = format!("{TASK_SELECT} WHERE team_id = ?1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(team_id)];

        if let Some(ref assignee) = filter.assigned_to_id {
            args.push(Box::new(assignee.clone()));
            sql.push_str(&format!(" AND assigned_to_id = ?{}", args.len()));
        }
        if let Some(status) = filter.status {
            args.push(Box::new(status.as_str()));
            sql.push_str(&format!(" AND status = ?{}", args.len()));
        }
        if let Some(ref due) = filter.due_before {
            args.push(Box::new(due.clone()));
            sql.push_str(&format!(" AND due_date <= ?{}", args.len()));
        }
        sql.push_str(" ORDER BY due_date");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            Self::map_task_row,
        )?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Apply a partial update. Returns `None` if the id does not resolve.
    pub fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Option<DbTask>, DbError> {
        let Some(current) = self.get_task(id)? else {
            return Ok(None);
        };

        self.conn.execute(
            "UPDATE tasks SET
                prospect_id = ?1, assigned_to_id = ?2, type = ?3, title = ?4,
                description = ?5, due_date = ?6, priority = ?7, status = ?8
             WHERE id = ?9",
            params![
                patch.prospect_id.or(current.prospect_id),
                patch.assigned_to_id.as_ref().unwrap_or(&current.assigned_to_id),
                patch.task_type.as_ref().unwrap_or(&current.task_type),
                patch.title.as_ref().unwrap_or(&current.title),
                patch.description.as_ref().or(current.description.as_ref()),
                patch.due_date.as_ref().unwrap_or(&current.due_date),
                patch.priority.as_ref().unwrap_or(&current.priority),
                patch.status.unwrap_or(current.status).as_str(),
                id,
            ],
        )?;
        self.get_task(id)
    }

    /// Mark a task COMPLETED. `completed_at` is stamped only if currently
    /// null, so re-completing does not move the completion time.
    ///
    /// Returns `None` if the id does not resolve.
    pub fn complete_task(&self, id: i64) -> Result<Option<DbTask>, DbError> {
        let updated = self.conn.execute(
            "UPDATE tasks SET status = 'COMPLETED',
                completed_at = COALESCE(completed_at, ?1)
             WHERE id = ?2",
            params![Self::now(), id],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_task(id)
    }

    fn map_task_row(row: &rusqlite::Row) -> rusqlite::Result<DbTask> {
        let status_raw: String = row.get(9)?;
        let status = TaskStatus::parse(&status_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                9,
                rusqlite::types::Type::Text,
                format!("unknown task status: {status_raw}").into(),
            )
        })?;
        Ok(DbTask {
            id: row.get(0)?,
            team_id: row.get(1)?,
            prospect_id: row.get(2)?,
            assigned_to_id: row.get(3)?,
            task_type: row.get(4)?,
            title: row.get(5)?,
            description: row.get(6)?,
            due_date: row.get(7)?,
            priority: row.get(8)?,
            status,
            completed_at: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}

const TASK_SELECT: &str = "SELECT id, team_id, prospect_id, assigned_to_id, type, title,
        description, due_date, priority, status, completed_at, created_at
 FROM tasks";
