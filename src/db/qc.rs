use super::*;
use crate::model::QcStatus;

impl CrmDb {
    // =========================================================================
    // QC queue
    // =========================================================================

    /// Submit a draft for review. Items enter the queue PENDING with the
    /// submission time stamped.
    pub fn create_qc_item(&self, item: &NewQcItem) -> Result<DbQcItem, DbError> {
        self.conn.execute(
            "INSERT INTO qc_queue (
                prospect_id, template_id, submitted_by_id, type, draft_content,
                status, submitted_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING', ?6)",
            params![
                item.prospect_id,
                item.template_id,
                item.submitted_by_id,
                item.item_type,
                item.draft_content,
                Self::now(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_qc_item(id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_qc_item(&self, id: i64) -> Result<Option<DbQcItem>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QC_SELECT} WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::map_qc_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// List queue items, newest submissions first, optionally narrowed by
    /// status and/or prospect.
    pub fn get_qc_items(
        &self,
        status: Option<QcStatus>,
        prospect_id: Option<i64>,
    ) -> Result<Vec<DbQcItem>, DbError> {
        let mut sql = format!("{QC_SELECT} WHERE 1=1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(status) = status {
            args.push(Box::new(status.as_str()));
            sql.push_str(&format!(" AND status = ?{}", args.len()));
        }
        if let Some(pid) = prospect_id {
            args.push(Box::new(pid));
            sql.push_str(&format!(" AND prospect_id = ?{}", args.len()));
        }
        sql.push_str(" ORDER BY submitted_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            Self::map_qc_row,
        )?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Record a review outcome on an item: status, optional feedback, the
    /// reviewer, and the review time. A later review overwrites an earlier
    /// one wholesale.
    ///
    /// Returns `None` if the id does not resolve. Callers are responsible
    /// for rejecting non-outcome statuses before reaching storage.
    pub fn review_qc_item(
        &self,
        id: i64,
        review: &QcReview,
    ) -> Result<Option<DbQcItem>, DbError> {
        let updated = self.conn.execute(
            "UPDATE qc_queue SET
                status = ?1, feedback = ?2, reviewed_by_id = ?3, reviewed_at = ?4
             WHERE id = ?5",
            params![
                review.status.as_str(),
                review.feedback,
                review.reviewed_by_id,
                Self::now(),
                id,
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_qc_item(id)
    }

    fn map_qc_row(row: &rusqlite::Row) -> rusqlite::Result<DbQcItem> {
        let status_raw: String = row.get(7)?;
        let status = QcStatus::parse(&status_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                format!("unknown qc status: {status_raw}").into(),
            )
        })?;
        Ok(DbQcItem {
            id: row.get(0)?,
            prospect_id: row.get(1)?,
            template_id: row.get(2)?,
            submitted_by_id: row.get(3)?,
            reviewed_by_id: row.get(4)?,
            item_type: row.get(5)?,
            draft_content: row.get(6)?,
            status,
            feedback: row.get(8)?,
            submitted_at: row.get(9)?,
            reviewed_at: row.get(10)?,
        })
    }
}

const QC_SELECT: &str = "SELECT id, prospect_id, template_id, submitted_by_id, reviewed_by_id,
        type, draft_content, status, feedback, submitted_at, reviewed_at
 FROM qc_queue";
