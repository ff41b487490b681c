use super::*;
use crate::model::Stage;

impl CrmDb {
    // =========================================================================
    // Prospects
    // =========================================================================

    /// Insert a prospect and return the stored row.
    pub fn create_prospect(&self, prospect: &NewProspect) -> Result<DbProspect, DbError> {
        let now = Self::now();
        self.conn.execute(
            "INSERT INTO prospects (
                team_id, first_name, last_name, email, linkedin_url, twitter_handle,
                company, title, source, source_detail, tags, custom_fields,
                stage, assigned_to_id, notes, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16)",
            params![
                prospect.team_id,
                prospect.first_name,
                prospect.last_name,
                prospect.email,
                prospect.linkedin_url,
                prospect.twitter_handle,
                prospect.company,
                prospect.title,
                prospect.source,
                prospect.source_detail,
                serde_json::to_string(&prospect.tags)?,
                serde_json::to_string(&prospect.custom_fields)?,
                prospect.stage.as_str(),
                prospect.assigned_to_id,
                prospect.notes,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_prospect(id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Insert many prospects in one transaction. Used by CSV import.
    pub fn create_prospects_bulk(
        &self,
        prospects: &[NewProspect],
    ) -> Result<Vec<DbProspect>, DbError> {
        if prospects.is_empty() {
            return Ok(Vec::new());
        }
        self.with_transaction(|db| {
            let mut created = Vec::with_capacity(prospects.len());
            for p in prospects {
                created.push(db.create_prospect(p)?);
            }
            Ok(created)
        })
    }

    /// Fetch a prospect by id.
    pub fn get_prospect(&self, id: i64) -> Result<Option<DbProspect>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROSPECT_SELECT} WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::map_prospect_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// List prospects for a team, optionally filtered by stage and assignee.
    /// Most recently updated first.
    pub fn get_prospects(
        &self,
        team_id: i64,
        filter: &ProspectFilter,
    ) -> Result<Vec<DbProspect>, DbError> {
        let mut sql = format!("{PROSPECT_SELECT} WHERE team_id = ?1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(team_id)];

        if let Some(stage) = filter.stage {
            args.push(Box::new(stage.as_str()));
            sql.push_str(&format!(" AND stage = ?{}", args.len()));
        }
        if let Some(ref assignee) = filter.assigned_to_id {
            args.push(Box::new(assignee.clone()));
            sql.push_str(&format!(" AND assigned_to_id = ?{}", args.len()));
        }
        sql.push_str(" ORDER BY updated_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            Self::map_prospect_row,
        )?;

        let mut prospects = Vec::new();
        for row in rows {
            prospects.push(row?);
        }
        Ok(prospects)
    }

    /// Apply a partial update: patched fields overwrite, unspecified fields
    /// are untouched, and `updated_at` is refreshed unconditionally.
    ///
    /// Returns `None` if the id does not resolve (zero writes performed).
    /// Timing fields are not writable here — see [`CrmDb::stamp_stage_timing`].
    pub fn update_prospect(
        &self,
        id: i64,
        patch: &ProspectPatch,
    ) -> Result<Option<DbProspect>, DbError> {
        let Some(current) = self.get_prospect(id)? else {
            return Ok(None);
        };

        let merged = merge_patch(&current, patch);
        self.conn.execute(
            "UPDATE prospects SET
                first_name = ?1, last_name = ?2, email = ?3, linkedin_url = ?4,
                twitter_handle = ?5, company = ?6, title = ?7, source = ?8,
                source_detail = ?9, tags = ?10, custom_fields = ?11, stage = ?12,
                assigned_to_id = ?13, close_reason = ?14, notes = ?15, updated_at = ?16
             WHERE id = ?17",
            params![
                merged.first_name,
                merged.last_name,
                merged.email,
                merged.linkedin_url,
                merged.twitter_handle,
                merged.company,
                merged.title,
                merged.source,
                merged.source_detail,
                serde_json::to_string(&merged.tags)?,
                serde_json::to_string(&merged.custom_fields)?,
                merged.stage.as_str(),
                merged.assigned_to_id,
                merged.close_reason,
                merged.notes,
                Self::now(),
                id,
            ],
        )?;
        self.get_prospect(id)
    }

    /// Stamp the derived timestamp for `stage`, if that stage has one and
    /// the column is currently null. COALESCE makes the stamp idempotent:
    /// a non-null timing field is never overwritten.
    pub fn stamp_stage_timing(&self, id: i64, stage: Stage) -> Result<(), DbError> {
        let Some(column) = stage.timing_column() else {
            return Ok(());
        };
        // Column name comes from the fixed stamping table, not caller input.
        self.conn.execute(
            &format!("UPDATE prospects SET {column} = COALESCE({column}, ?1) WHERE id = ?2"),
            params![Self::now(), id],
        )?;
        Ok(())
    }

    /// Delete a prospect. Activities referencing it are left in place
    /// (orphan tolerance — references are application-level only).
    pub fn delete_prospect(&self, id: i64) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM prospects WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn map_prospect_row(row: &rusqlite::Row) -> rusqlite::Result<DbProspect> {
        let tags_raw: String = row.get(11)?;
        let custom_raw: String = row.get(12)?;
        let stage_raw: String = row.get(13)?;
        let stage = Stage::parse(&stage_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                13,
                rusqlite::types::Type::Text,
                format!("unknown stage: {stage_raw}").into(),
            )
        })?;
        Ok(DbProspect {
            id: row.get(0)?,
            team_id: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            email: row.get(4)?,
            linkedin_url: row.get(5)?,
            twitter_handle: row.get(6)?,
            company: row.get(7)?,
            title: row.get(8)?,
            source: row.get(9)?,
            source_detail: row.get(10)?,
            tags: serde_json::from_str(&tags_raw).unwrap_or_default(),
            custom_fields: serde_json::from_str(&custom_raw).unwrap_or_default(),
            stage,
            assigned_to_id: row.get(14)?,
            warming_started_at: row.get(15)?,
            first_touch_sent_at: row.get(16)?,
            video_sent_at: row.get(17)?,
            call_booked_at: row.get(18)?,
            closed_at: row.get(19)?,
            close_reason: row.get(20)?,
            notes: row.get(21)?,
            created_at: row.get(22)?,
            updated_at: row.get(23)?,
        })
    }
}

const PROSPECT_SELECT: &str = "SELECT id, team_id, first_name, last_name, email, linkedin_url,
        twitter_handle, company, title, source, source_detail, tags,
        custom_fields, stage, assigned_to_id, warming_started_at,
        first_touch_sent_at, video_sent_at, call_booked_at, closed_at,
        close_reason, notes, created_at, updated_at
 FROM prospects";

/// Merge a patch over the current row. `None` keeps the stored value.
fn merge_patch(current: &DbProspect, patch: &ProspectPatch) -> DbProspect {
    let mut merged = current.clone();
    if let Some(v) = &patch.first_name {
        merged.first_name = v.clone();
    }
    if let Some(v) = &patch.last_name {
        merged.last_name = v.clone();
    }
    if let Some(v) = &patch.email {
        merged.email = Some(v.clone());
    }
    if let Some(v) = &patch.linkedin_url {
        merged.linkedin_url = Some(v.clone());
    }
    if let Some(v) = &patch.twitter_handle {
        merged.twitter_handle = Some(v.clone());
    }
    if let Some(v) = &patch.company {
        merged.company = v.clone();
    }
    if let Some(v) = &patch.title {
        merged.title = v.clone();
    }
    if let Some(v) = &patch.source {
        merged.source = v.clone();
    }
    if let Some(v) = &patch.source_detail {
        merged.source_detail = Some(v.clone());
    }
    if let Some(v) = &patch.tags {
        merged.tags = v.clone();
    }
    if let Some(v) = &patch.custom_fields {
        merged.custom_fields = v.clone();
    }
    if let Some(v) = patch.stage {
        merged.stage = v;
    }
    if let Some(v) = &patch.assigned_to_id {
        merged.assigned_to_id = Some(v.clone());
    }
    if let Some(v) = &patch.close_reason {
        merged.close_reason = Some(v.clone());
    }
    if let Some(v) = &patch.notes {
        merged.notes = Some(v.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{sample_prospect, test_db};
    use super::*;

    #[test]
    fn test_create_and_get_prospect() {
        let db = test_db();
        let created = db
            .create_prospect(&sample_prospect(1, "Sarah", "Connor"))
            .expect("create");

        assert_eq!(created.stage, Stage::Identified);
        assert!(created.warming_started_at.is_none());

        let fetched = db.get_prospect(created.id).expect("get").expect("exists");
        assert_eq!(fetched.first_name, "Sarah");
        assert_eq!(fetched.email.as_deref(), Some("sarah@example.com"));
    }

    #[test]
    fn test_get_prospect_not_found() {
        let db = test_db();
        assert!(db.get_prospect(999).expect("query").is_none());
    }

    #[test]
    fn test_list_filters_by_stage_and_assignee() {
        let db = test_db();
        let mut p1 = sample_prospect(1, "A", "One");
        p1.stage = Stage::Warming;
        p1.assigned_to_id = Some("rep-1".into());
        db.create_prospect(&p1).expect("create");

        let mut p2 = sample_prospect(1, "B", "Two");
        p2.stage = Stage::Warming;
        db.create_prospect(&p2).expect("create");

        db.create_prospect(&sample_prospect(1, "C", "Three"))
            .expect("create");
        db.create_prospect(&sample_prospect(2, "D", "Four"))
            .expect("create");

        let all = db
            .get_prospects(1, &ProspectFilter::default())
            .expect("list");
        assert_eq!(all.len(), 3, "team scoping applies");

        let warming = db
            .get_prospects(
                1,
                &ProspectFilter {
                    stage: Some(Stage::Warming),
                    ..Default::default()
                },
            )
            .expect("list");
        assert_eq!(warming.len(), 2);

        let assigned = db
            .get_prospects(
                1,
                &ProspectFilter {
                    stage: Some(Stage::Warming),
                    assigned_to_id: Some("rep-1".into()),
                },
            )
            .expect("list");
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].first_name, "A");
    }

    #[test]
    fn test_update_merges_patch_and_refreshes_updated_at() {
        let db = test_db();
        let created = db
            .create_prospect(&sample_prospect(1, "Jane", "Smith"))
            .expect("create");

        // Force a stale updated_at so the refresh is observable
        db.conn
            .execute(
                "UPDATE prospects SET updated_at = '2020-01-01T00:00:00+00:00' WHERE id = ?1",
                params![created.id],
            )
            .expect("backdate");

        let patch = ProspectPatch {
            company: Some("TechStar".into()),
            notes: Some("met at conf".into()),
            ..Default::default()
        };
        let updated = db
            .update_prospect(created.id, &patch)
            .expect("update")
            .expect("exists");

        assert_eq!(updated.company, "TechStar");
        assert_eq!(updated.notes.as_deref(), Some("met at conf"));
        assert_eq!(updated.first_name, "Jane", "unpatched fields untouched");
        assert_ne!(updated.updated_at, "2020-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_update_missing_prospect_returns_none() {
        let db = test_db();
        let result = db
            .update_prospect(42, &ProspectPatch::default())
            .expect("query");
        assert!(result.is_none());
    }

    #[test]
    fn test_stamp_is_set_if_null_only() {
        let db = test_db();
        let created = db
            .create_prospect(&sample_prospect(1, "Stamp", "Once"))
            .expect("create");

        db.stamp_stage_timing(created.id, Stage::Warming)
            .expect("first stamp");
        let first = db
            .get_prospect(created.id)
            .expect("get")
            .expect("exists")
            .warming_started_at
            .expect("stamped");

        db.stamp_stage_timing(created.id, Stage::Warming)
            .expect("second stamp");
        let second = db
            .get_prospect(created.id)
            .expect("get")
            .expect("exists")
            .warming_started_at
            .expect("still stamped");

        assert_eq!(first, second, "stamp must not be overwritten");
    }

    #[test]
    fn test_stamp_noop_for_stages_without_timing() {
        let db = test_db();
        let created = db
            .create_prospect(&sample_prospect(1, "No", "Stamp"))
            .expect("create");

        db.stamp_stage_timing(created.id, Stage::Unresponsive)
            .expect("stamp");
        let row = db.get_prospect(created.id).expect("get").expect("exists");
        assert!(row.warming_started_at.is_none());
        assert!(row.closed_at.is_none());
    }

    #[test]
    fn test_won_and_lost_share_closed_at() {
        let db = test_db();
        let created = db
            .create_prospect(&sample_prospect(1, "Close", "Me"))
            .expect("create");

        db.stamp_stage_timing(created.id, Stage::Won).expect("stamp");
        let closed = db
            .get_prospect(created.id)
            .expect("get")
            .expect("exists")
            .closed_at
            .expect("closed_at set");

        db.stamp_stage_timing(created.id, Stage::Lost).expect("stamp");
        let still = db
            .get_prospect(created.id)
            .expect("get")
            .expect("exists")
            .closed_at
            .expect("closed_at still set");
        assert_eq!(closed, still);
    }

    #[test]
    fn test_bulk_create() {
        let db = test_db();
        let batch = vec![
            sample_prospect(1, "One", "A"),
            sample_prospect(1, "Two", "B"),
            sample_prospect(1, "Three", "C"),
        ];
        let created = db.create_prospects_bulk(&batch).expect("bulk");
        assert_eq!(created.len(), 3);
        assert!(created.iter().all(|p| p.stage == Stage::Identified));

        let empty = db.create_prospects_bulk(&[]).expect("empty bulk");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_delete_prospect() {
        let db = test_db();
        let created = db
            .create_prospect(&sample_prospect(1, "Del", "Ete"))
            .expect("create");
        db.delete_prospect(created.id).expect("delete");
        assert!(db.get_prospect(created.id).expect("get").is_none());

        // Deleting a missing id is not an error
        db.delete_prospect(created.id).expect("re-delete");
    }

    #[test]
    fn test_tags_and_custom_fields_round_trip() {
        let db = test_db();
        let mut p = sample_prospect(1, "Tagged", "Row");
        p.tags = vec!["priority".into(), "warm-intro".into()];
        p.custom_fields = serde_json::json!({"region": "EMEA", "score": 87});

        let created = db.create_prospect(&p).expect("create");
        assert_eq!(created.tags, vec!["priority", "warm-intro"]);
        assert_eq!(created.custom_fields["region"], "EMEA");
        assert_eq!(created.custom_fields["score"], 87);
    }
}
