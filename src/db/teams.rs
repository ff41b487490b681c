use super::*;

impl CrmDb {
    // =========================================================================
    // Teams
    // =========================================================================

    /// Insert a team and return the stored row.
    pub fn create_team(&self, team: &NewTeam) -> Result<DbTeam, DbError> {
        let now = Self::now();
        let settings = team
            .settings
            .clone()
            .unwrap_or_else(default_team_settings);
        self.conn.execute(
            "INSERT INTO teams (name, owner_id, settings, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![
                team.name,
                team.owner_id,
                serde_json::to_string(&settings)?,
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_team(id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Fetch a team by id.
    pub fn get_team(&self, id: i64) -> Result<Option<DbTeam>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, owner_id, settings, created_at, updated_at
             FROM teams WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], Self::map_team_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Teams owned by a user. Membership-based visibility is resolved at the
    /// service layer via `get_team_members`.
    pub fn get_teams_by_owner(&self, owner_id: &str) -> Result<Vec<DbTeam>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, owner_id, settings, created_at, updated_at
             FROM teams WHERE owner_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![owner_id], Self::map_team_row)?;

        let mut teams = Vec::new();
        for row in rows {
            teams.push(row?);
        }
        Ok(teams)
    }

    fn map_team_row(row: &rusqlite::Row) -> rusqlite::Result<DbTeam> {
        let settings_raw: String = row.get(3)?;
        Ok(DbTeam {
            id: row.get(0)?,
            name: row.get(1)?,
            owner_id: row.get(2)?,
            settings: serde_json::from_str(&settings_raw).unwrap_or_default(),
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    // =========================================================================
    // Team members
    // =========================================================================

    /// Add a member to a team. The (team, user) pair is unique.
    pub fn add_team_member(
        &self,
        team_id: i64,
        user_id: &str,
        role: &str,
    ) -> Result<DbTeamMember, DbError> {
        let now = Self::now();
        self.conn.execute(
            "INSERT INTO team_members (team_id, user_id, role, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![team_id, user_id, role, now],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(DbTeamMember {
            id,
            team_id,
            user_id: user_id.to_string(),
            role: role.to_string(),
            created_at: now,
        })
    }

    pub fn get_team_members(&self, team_id: i64) -> Result<Vec<DbTeamMember>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, team_id, user_id, role, created_at
             FROM team_members WHERE team_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![team_id], |row| {
            Ok(DbTeamMember {
                id: row.get(0)?,
                team_id: row.get(1)?,
                user_id: row.get(2)?,
                role: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row?);
        }
        Ok(members)
    }
}
