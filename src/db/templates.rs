use super::*;

impl CrmDb {
    // =========================================================================
    // Templates
    // =========================================================================

    pub fn create_template(&self, template: &NewTemplate) -> Result<DbTemplate, DbError> {
        let now = Self::now();
        self.conn.execute(
            "INSERT INTO templates (
                team_id, name, type, content, is_active, created_by_id,
                times_used, reply_count, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, ?7, ?7)",
            params![
                template.team_id,
                template.name,
                template.template_type,
                template.content,
                template.is_active,
                template.created_by_id,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_template(id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_template(&self, id: i64) -> Result<Option<DbTemplate>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEMPLATE_SELECT} WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::map_template_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// List a team's templates, newest first, optionally restricted to a
    /// single template type.
    pub fn get_templates(
        &self,
        team_id: i64,
        template_type: Option<&str>,
    ) -> Result<Vec<DbTemplate>, DbError> {
        let mut sql = format!("{TEMPLATE_SELECT} WHERE team_id = ?1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(team_id)];
        if let Some(kind) = template_type {
            args.push(Box::new(kind.to_string()));
            sql.push_str(&format!(" AND type = ?{}", args.len()));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            Self::map_template_row,
        )?;

        let mut templates = Vec::new();
        for row in rows {
            templates.push(row?);
        }
        Ok(templates)
    }

    /// Apply a partial update and refresh `updated_at`. Returns `None` if the
    /// id does not resolve.
    pub fn update_template(
        &self,
        id: i64,
        patch: &TemplatePatch,
    ) -> Result<Option<DbTemplate>, DbError> {
        let Some(current) = self.get_template(id)? else {
            return Ok(None);
        };

        self.conn.execute(
            "UPDATE templates SET
                name = ?1, type = ?2, content = ?3, is_active = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                patch.name.as_ref().unwrap_or(&current.name),
                patch.template_type.as_ref().unwrap_or(&current.template_type),
                patch.content.as_ref().unwrap_or(&current.content),
                patch.is_active.unwrap_or(current.is_active),
                Self::now(),
                id,
            ],
        )?;
        self.get_template(id)
    }

    /// Bump the usage counter, recorded when an outreach draft built from
    /// this template is sent.
    pub fn record_template_use(&self, id: i64) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE templates SET times_used = times_used + 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    /// Bump the reply counter for a template.
    pub fn record_template_reply(&self, id: i64) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE templates SET reply_count = reply_count + 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    pub fn delete_template(&self, id: i64) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn map_template_row(row: &rusqlite::Row) -> rusqlite::Result<DbTemplate> {
        Ok(DbTemplate {
            id: row.get(0)?,
            team_id: row.get(1)?,
            name: row.get(2)?,
            template_type: row.get(3)?,
            content: row.get(4)?,
            is_active: row.get(5)?,
            created_by_id: row.get(6)?,
            times_used: row.get(7)?,
            reply_count: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

const TEMPLATE_SELECT: &str = "SELECT id, team_id, name, type, content, is_active,
        created_by_id, times_used, reply_count, created_at, updated_at
 FROM templates";

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_db;
    use super::*;

    fn sample_template(team_id: i64, name: &str, kind: &str) -> NewTemplate {
        NewTemplate {
            team_id,
            name: name.to_string(),
            template_type: kind.to_string(),
            content: "Hey {{firstName}}, quick question".to_string(),
            is_active: true,
            created_by_id: "rep-1".to_string(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let db = test_db();
        let tpl = db
            .create_template(&sample_template(1, "Opener", "FIRST_TOUCH"))
            .expect("create");
        assert_eq!(tpl.times_used, 0);
        assert_eq!(tpl.reply_count, 0);
        assert!(tpl.is_active);

        let fetched = db.get_template(tpl.id).expect("get").expect("exists");
        assert_eq!(fetched.name, "Opener");
    }

    #[test]
    fn test_list_by_type() {
        let db = test_db();
        db.create_template(&sample_template(1, "Opener", "FIRST_TOUCH"))
            .expect("create");
        db.create_template(&sample_template(1, "Video pitch", "VIDEO"))
            .expect("create");
        db.create_template(&sample_template(2, "Other team", "FIRST_TOUCH"))
            .expect("create");

        let all = db.get_templates(1, None).expect("list");
        assert_eq!(all.len(), 2);

        let videos = db.get_templates(1, Some("VIDEO")).expect("list");
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].name, "Video pitch");
    }

    #[test]
    fn test_update_refreshes_updated_at() {
        let db = test_db();
        let tpl = db
            .create_template(&sample_template(1, "Opener", "FIRST_TOUCH"))
            .expect("create");

        std::thread::sleep(std::time::Duration::from_millis(5));
        let updated = db
            .update_template(
                tpl.id,
                &TemplatePatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .expect("update")
            .expect("exists");
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Opener", "unpatched fields kept");
        assert!(updated.updated_at > tpl.updated_at);

        assert!(db
            .update_template(999, &TemplatePatch::default())
            .expect("query")
            .is_none());
    }

    #[test]
    fn test_usage_counters() {
        let db = test_db();
        let tpl = db
            .create_template(&sample_template(1, "Opener", "FIRST_TOUCH"))
            .expect("create");

        db.record_template_use(tpl.id).expect("use");
        db.record_template_use(tpl.id).expect("use");
        db.record_template_reply(tpl.id).expect("reply");

        let fetched = db.get_template(tpl.id).expect("get").expect("exists");
        assert_eq!(fetched.times_used, 2);
        assert_eq!(fetched.reply_count, 1);
    }

    #[test]
    fn test_delete() {
        let db = test_db();
        let tpl = db
            .create_template(&sample_template(1, "Opener", "FIRST_TOUCH"))
            .expect("create");
        db.delete_template(tpl.id).expect("delete");
        assert!(db.get_template(tpl.id).expect("get").is_none());
    }
}
