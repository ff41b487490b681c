//! Prospect service — creation, listing, and the stage-transition engine.
//!
//! Every stage change flows through [`update_prospect`], which applies the
//! patch, appends a STAGE_CHANGED activity, and stamps the derived timing
//! field for the destination stage — all in one transaction, so a failure
//! partway leaves no partial state behind.

use crate::db::{
    CrmDb, DbActivity, DbProspect, NewActivity, NewProspect, ProspectFilter, ProspectPatch,
    StageChangeDetails,
};
use crate::error::CrmError;
use crate::model::ActivityType;
use crate::services::SYSTEM_ACTOR;

fn validate_new(prospect: &NewProspect) -> Result<(), CrmError> {
    if prospect.first_name.trim().is_empty() {
        return Err(CrmError::validation("firstName", "is required"));
    }
    if prospect.last_name.trim().is_empty() {
        return Err(CrmError::validation("lastName", "is required"));
    }
    if prospect.company.trim().is_empty() {
        return Err(CrmError::validation("company", "is required"));
    }
    if prospect.title.trim().is_empty() {
        return Err(CrmError::validation("title", "is required"));
    }
    if prospect.source.trim().is_empty() {
        return Err(CrmError::validation("source", "is required"));
    }
    Ok(())
}

pub fn create_prospect(db: &CrmDb, prospect: &NewProspect) -> Result<DbProspect, CrmError> {
    validate_new(prospect)?;
    Ok(db.create_prospect(prospect)?)
}

/// Summary of an import batch.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub imported: i64,
    pub duplicates: i64,
}

/// Bulk-import prospects in a single transaction: one invalid row rejects
/// the whole batch. The duplicates count is reserved for dedupe support and
/// is always zero today.
pub fn import_prospects(
    db: &CrmDb,
    prospects: &[NewProspect],
) -> Result<ImportResult, CrmError> {
    for (i, prospect) in prospects.iter().enumerate() {
        validate_new(prospect).map_err(|err| match err {
            CrmError::Validation { field, message } => CrmError::Validation {
                field,
                message: format!("{message} (row {i})"),
            },
            other => other,
        })?;
    }
    let created = db.create_prospects_bulk(prospects)?;
    log::info!("Imported {} prospects", created.len());
    Ok(ImportResult {
        imported: created.len() as i64,
        duplicates: 0,
    })
}

pub fn get_prospect(db: &CrmDb, id: i64) -> Result<DbProspect, CrmError> {
    db.get_prospect(id)?
        .ok_or_else(|| CrmError::not_found("Prospect", id))
}

pub fn list_prospects(
    db: &CrmDb,
    team_id: i64,
    filter: &ProspectFilter,
) -> Result<Vec<DbProspect>, CrmError> {
    Ok(db.get_prospects(team_id, filter)?)
}

/// Apply a partial update to a prospect. When the patch moves the prospect
/// to a different stage, this additionally:
///
/// 1. appends a STAGE_CHANGED activity recording the old and new stage,
///    attributed to `acting_user` (or the system actor when absent), and
/// 2. stamps the destination stage's timing field if it has never been set.
///
/// Patching the stage to its current value is an ordinary field update: no
/// activity, no stamp. The whole operation runs in one transaction.
pub fn update_prospect(
    db: &CrmDb,
    id: i64,
    patch: &ProspectPatch,
    acting_user: Option<&str>,
) -> Result<DbProspect, CrmError> {
    db.with_transaction(|db| {
        let before = db
            .get_prospect(id)?
            .ok_or_else(|| CrmError::not_found("Prospect", id))?;

        let updated = db
            .update_prospect(id, patch)?
            .ok_or_else(|| CrmError::not_found("Prospect", id))?;

        let stage_changed = match patch.stage {
            Some(to) => to != before.stage,
            None => false,
        };
        if !stage_changed {
            return Ok(updated);
        }
        let to_stage = updated.stage;

        db.create_activity(&NewActivity {
            prospect_id: id,
            user_id: acting_user.unwrap_or(SYSTEM_ACTOR).to_string(),
            activity_type: ActivityType::StageChanged,
            details: serde_json::to_value(StageChangeDetails {
                from_stage: before.stage,
                to_stage,
            })
            .map_err(crate::db::DbError::from)?,
        })?;

        db.stamp_stage_timing(id, to_stage)?;
        log::debug!(
            "Prospect {id} moved {} -> {}",
            before.stage.as_str(),
            to_stage.as_str()
        );

        db.get_prospect(id)?
            .ok_or_else(|| CrmError::not_found("Prospect", id))
    })
}

pub fn delete_prospect(db: &CrmDb, id: i64) -> Result<(), CrmError> {
    // Activities referencing the prospect intentionally remain.
    db.get_prospect(id)?
        .ok_or_else(|| CrmError::not_found("Prospect", id))?;
    db.delete_prospect(id)?;
    Ok(())
}

/// Activity timeline for a prospect, newest first. The prospect must exist;
/// orphaned activities are reachable only through direct storage access.
pub fn list_activities(db: &CrmDb, prospect_id: i64) -> Result<Vec<DbActivity>, CrmError> {
    db.get_prospect(prospect_id)?
        .ok_or_else(|| CrmError::not_found("Prospect", prospect_id))?;
    Ok(db.get_activities(prospect_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{sample_prospect, test_db};
    use crate::model::Stage;

    #[test]
    fn test_create_requires_fields() {
        let db = test_db();
        let mut p = sample_prospect(1, "Sarah", "Connor");
        p.company = String::new();
        let err = create_prospect(&db, &p).expect_err("must fail");
        assert_eq!(err.field(), Some("company"));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_stage_change_appends_activity_and_stamps() {
        let db = test_db();
        let p = create_prospect(&db, &sample_prospect(1, "Sarah", "Connor")).expect("create");
        assert_eq!(p.stage, Stage::Identified);

        let updated = update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::Warming),
                ..Default::default()
            },
            Some("rep-1"),
        )
        .expect("update");
        assert_eq!(updated.stage, Stage::Warming);
        assert!(updated.warming_started_at.is_some());

        let activities = list_activities(&db, p.id).expect("list");
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity_type, "STAGE_CHANGED");
        assert_eq!(activities[0].user_id, "rep-1");
        let details: StageChangeDetails =
            serde_json::from_value(activities[0].details.clone()).expect("details");
        assert_eq!(details.from_stage, Stage::Identified);
        assert_eq!(details.to_stage, Stage::Warming);

        // A later field-only update is not a transition
        let after = update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                notes: Some("followed up".to_string()),
                ..Default::default()
            },
            Some("rep-1"),
        )
        .expect("field-only update");
        assert_eq!(
            after.warming_started_at,
            updated.warming_started_at,
            "stamp untouched by field-only updates"
        );
        assert_eq!(list_activities(&db, p.id).expect("list").len(), 1);
    }

    #[test]
    fn test_same_stage_patch_is_not_a_transition() {
        let db = test_db();
        let p = create_prospect(&db, &sample_prospect(1, "Sarah", "Connor")).expect("create");

        let updated = update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::Identified),
                notes: Some("still identified".to_string()),
                ..Default::default()
            },
            Some("rep-1"),
        )
        .expect("update");
        assert_eq!(updated.notes.as_deref(), Some("still identified"));
        assert!(list_activities(&db, p.id).expect("list").is_empty());
    }

    #[test]
    fn test_timing_survives_revisit() {
        let db = test_db();
        let p = create_prospect(&db, &sample_prospect(1, "Sarah", "Connor")).expect("create");

        let first = update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::Warming),
                ..Default::default()
            },
            None,
        )
        .expect("enter warming");
        let stamp = first.warming_started_at.clone().expect("stamped");

        // Leave and re-enter WARMING; the original stamp must hold.
        update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::FirstTouchReady),
                ..Default::default()
            },
            None,
        )
        .expect("leave");
        let back = update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::Warming),
                ..Default::default()
            },
            None,
        )
        .expect("return");
        assert_eq!(back.warming_started_at.as_deref(), Some(stamp.as_str()));

        let activities = list_activities(&db, p.id).expect("list");
        assert_eq!(activities.len(), 3, "every transition is recorded");
    }

    #[test]
    fn test_won_and_lost_share_closed_at() {
        let db = test_db();
        let p = create_prospect(&db, &sample_prospect(1, "Sarah", "Connor")).expect("create");

        let won = update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::Won),
                ..Default::default()
            },
            None,
        )
        .expect("win");
        let closed = won.closed_at.clone().expect("stamped");

        let lost = update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::Lost),
                close_reason: Some("churned".to_string()),
                ..Default::default()
            },
            None,
        )
        .expect("lose");
        assert_eq!(lost.closed_at.as_deref(), Some(closed.as_str()));
    }

    #[test]
    fn test_unattributed_transition_uses_system_actor() {
        let db = test_db();
        let p = create_prospect(&db, &sample_prospect(1, "Sarah", "Connor")).expect("create");
        update_prospect(
            &db,
            p.id,
            &ProspectPatch {
                stage: Some(Stage::Warming),
                ..Default::default()
            },
            None,
        )
        .expect("update");

        let activities = list_activities(&db, p.id).expect("list");
        assert_eq!(activities[0].user_id, SYSTEM_ACTOR);
    }

    #[test]
    fn test_update_missing_prospect_is_not_found() {
        let db = test_db();
        let err = update_prospect(&db, 404, &ProspectPatch::default(), None)
            .expect_err("must fail");
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_import_rejects_whole_batch_on_invalid_row() {
        let db = test_db();
        let mut bad = sample_prospect(1, "Bad", "Row");
        bad.source = String::new();
        let batch = vec![sample_prospect(1, "Sarah", "Connor"), bad];

        let err = import_prospects(&db, &batch).expect_err("must fail");
        assert_eq!(err.status(), 400);
        assert!(db
            .get_prospects(1, &ProspectFilter::default())
            .expect("list")
            .is_empty());
    }

    #[test]
    fn test_import_counts() {
        let db = test_db();
        let batch = vec![
            sample_prospect(1, "Sarah", "Connor"),
            sample_prospect(1, "John", "Doe"),
        ];
        let result = import_prospects(&db, &batch).expect("import");
        assert_eq!(result.imported, 2);
        assert_eq!(result.duplicates, 0);
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let db = test_db();
        let p = create_prospect(&db, &sample_prospect(1, "Sarah", "Connor")).expect("create");
        delete_prospect(&db, p.id).expect("delete");
        assert_eq!(get_prospect(&db, p.id).expect_err("gone").status(), 404);
        assert_eq!(
            delete_prospect(&db, p.id).expect_err("already gone").status(),
            404
        );
    }
}
