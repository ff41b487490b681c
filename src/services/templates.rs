//! Template service.

use crate::db::{CrmDb, DbTemplate, NewTemplate, TemplatePatch};
use crate::error::CrmError;

pub fn create_template(db: &CrmDb, template: &NewTemplate) -> Result<DbTemplate, CrmError> {
    if template.name.trim().is_empty() {
        return Err(CrmError::validation("name", "is required"));
    }
    if template.content.trim().is_empty() {
        return Err(CrmError::validation("content", "is required"));
    }
    if template.template_type.trim().is_empty() {
        return Err(CrmError::validation("type", "is required"));
    }
    Ok(db.create_template(template)?)
}

pub fn get_template(db: &CrmDb, id: i64) -> Result<DbTemplate, CrmError> {
    db.get_template(id)?
        .ok_or_else(|| CrmError::not_found("Template", id))
}

pub fn list_templates(
    db: &CrmDb,
    team_id: i64,
    template_type: Option<&str>,
) -> Result<Vec<DbTemplate>, CrmError> {
    Ok(db.get_templates(team_id, template_type)?)
}

pub fn update_template(
    db: &CrmDb,
    id: i64,
    patch: &TemplatePatch,
) -> Result<DbTemplate, CrmError> {
    db.update_template(id, patch)?
        .ok_or_else(|| CrmError::not_found("Template", id))
}

pub fn delete_template(db: &CrmDb, id: i64) -> Result<(), CrmError> {
    get_template(db, id)?;
    db.delete_template(id)?;
    Ok(())
}
