use std::collections::HashMap;

use super::*;
use crate::model::Stage;

/// Reply rate is not derivable until send/reply tracking lands; the overview
/// carries a fixed figure so the dashboard shape stays stable.
const PLACEHOLDER_REPLY_RATE: f64 = 12.5;

impl CrmDb {
    // =========================================================================
    // Analytics
    // =========================================================================

    /// Funnel overview for a team: prospect counts grouped by stage, pending
    /// task and QC counts, and the reply rate.
    ///
    /// Stages with no prospects are absent from the map rather than zero.
    pub fn analytics_overview(&self, team_id: i64) -> Result<AnalyticsOverview, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT stage, COUNT(*) FROM prospects WHERE team_id = ?1 GROUP BY stage",
        )?;
        let rows = stmt.query_map(params![team_id], |row| {
            let raw: String = row.get(0)?;
            let stage = Stage::parse(&raw).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    format!("unknown stage: {raw}").into(),
                )
            })?;
            Ok((stage, row.get::<_, i64>(1)?))
        })?;

        let mut prospects_by_stage = HashMap::new();
        for row in rows {
            let (stage, count) = row?;
            prospects_by_stage.insert(stage, count);
        }

        let tasks_due_today: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE team_id = ?1 AND status = 'PENDING'",
            params![team_id],
            |row| row.get(0),
        )?;

        let qc_pending: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM qc_queue WHERE status = 'PENDING'
             AND prospect_id IN (SELECT id FROM prospects WHERE team_id = ?1)",
            params![team_id],
            |row| row.get(0),
        )?;

        Ok(AnalyticsOverview {
            prospects_by_stage,
            tasks_due_today,
            qc_pending,
            reply_rate: PLACEHOLDER_REPLY_RATE,
        })
    }
}
