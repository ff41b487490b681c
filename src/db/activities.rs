use super::*;

impl CrmDb {
    // =========================================================================
    // Activities
    // =========================================================================

    /// Append an activity. The audit trail is append-only: there is no
    /// update or delete path for this table.
    pub fn create_activity(&self, activity: &NewActivity) -> Result<DbActivity, DbError> {
        let now = Self::now();
        self.conn.execute(
            "INSERT INTO activities (prospect_id, user_id, type, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                activity.prospect_id,
                activity.user_id,
                activity.activity_type.as_str(),
                serde_json::to_string(&activity.details)?,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(DbActivity {
            id,
            prospect_id: activity.prospect_id,
            user_id: activity.user_id.clone(),
            activity_type: activity.activity_type.as_str().to_string(),
            details: activity.details.clone(),
            created_at: now,
        })
    }

    /// Activities for a prospect, most recent first. Works even after the
    /// prospect itself has been deleted (orphan tolerance).
    pub fn get_activities(&self, prospect_id: i64) -> Result<Vec<DbActivity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, prospect_id, user_id, type, details, created_at
             FROM activities WHERE prospect_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![prospect_id], |row| {
            let details_raw: String = row.get(4)?;
            Ok(DbActivity {
                id: row.get(0)?,
                prospect_id: row.get(1)?,
                user_id: row.get(2)?,
                activity_type: row.get(3)?,
                details: serde_json::from_str(&details_raw).unwrap_or_default(),
                created_at: row.get(5)?,
            })
        })?;

        let mut activities = Vec::new();
        for row in rows {
            activities.push(row?);
        }
        Ok(activities)
    }
}
