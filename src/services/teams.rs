//! Team service.

use crate::db::{CrmDb, DbTeam, DbTeamMember, NewTeam};
use crate::error::CrmError;

pub fn create_team(db: &CrmDb, team: &NewTeam) -> Result<DbTeam, CrmError> {
    if team.name.trim().is_empty() {
        return Err(CrmError::validation("name", "is required"));
    }
    if team.owner_id.trim().is_empty() {
        return Err(CrmError::validation("ownerId", "is required"));
    }
    Ok(db.create_team(team)?)
}

pub fn get_team(db: &CrmDb, id: i64) -> Result<DbTeam, CrmError> {
    db.get_team(id)?
        .ok_or_else(|| CrmError::not_found("Team", id))
}

pub fn add_member(
    db: &CrmDb,
    team_id: i64,
    user_id: &str,
    role: &str,
) -> Result<DbTeamMember, CrmError> {
    if user_id.trim().is_empty() {
        return Err(CrmError::validation("userId", "is required"));
    }
    if role.trim().is_empty() {
        return Err(CrmError::validation("role", "is required"));
    }
    get_team(db, team_id)?;
    Ok(db.add_team_member(team_id, user_id, role)?)
}

pub fn list_members(db: &CrmDb, team_id: i64) -> Result<Vec<DbTeamMember>, CrmError> {
    get_team(db, team_id)?;
    Ok(db.get_team_members(team_id)?)
}
