//! QC service — draft submission and manager review.

use crate::db::{CrmDb, DbQcItem, NewQcItem, QcReview};
use crate::error::CrmError;
use crate::model::QcStatus;

pub fn submit_qc_item(db: &CrmDb, item: &NewQcItem) -> Result<DbQcItem, CrmError> {
    if item.draft_content.trim().is_empty() {
        return Err(CrmError::validation("draftContent", "is required"));
    }
    if item.item_type.trim().is_empty() {
        return Err(CrmError::validation("type", "is required"));
    }
    if item.submitted_by_id.trim().is_empty() {
        return Err(CrmError::validation("submittedById", "is required"));
    }
    Ok(db.create_qc_item(item)?)
}

pub fn get_qc_item(db: &CrmDb, id: i64) -> Result<DbQcItem, CrmError> {
    db.get_qc_item(id)?
        .ok_or_else(|| CrmError::not_found("QC item", id))
}

pub fn list_qc_items(
    db: &CrmDb,
    status: Option<QcStatus>,
    prospect_id: Option<i64>,
) -> Result<Vec<DbQcItem>, CrmError> {
    Ok(db.get_qc_items(status, prospect_id)?)
}

/// Record a review outcome. Only outcome statuses are accepted — a reviewer
/// cannot move an item back to PENDING.
pub fn review_qc_item(db: &CrmDb, id: i64, review: &QcReview) -> Result<DbQcItem, CrmError> {
    if !review.status.is_review_outcome() {
        return Err(CrmError::validation(
            "status",
            format!("{} is not a review outcome", review.status.as_str()),
        ));
    }
    if review.reviewed_by_id.trim().is_empty() {
        return Err(CrmError::validation("reviewedById", "is required"));
    }
    db.review_qc_item(id, review)?
        .ok_or_else(|| CrmError::not_found("QC item", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn sample_item() -> NewQcItem {
        NewQcItem {
            prospect_id: 1,
            template_id: None,
            submitted_by_id: "rep-1".to_string(),
            item_type: "FIRST_TOUCH".to_string(),
            draft_content: "Hey Sarah".to_string(),
        }
    }

    #[test]
    fn test_review_rejects_pending_status() {
        let db = test_db();
        let item = submit_qc_item(&db, &sample_item()).expect("submit");
        let err = review_qc_item(
            &db,
            item.id,
            &QcReview {
                status: QcStatus::Pending,
                feedback: None,
                reviewed_by_id: "manager-1".to_string(),
            },
        )
        .expect_err("must fail");
        assert_eq!(err.field(), Some("status"));
    }

    #[test]
    fn test_review_outcome_applies() {
        let db = test_db();
        let item = submit_qc_item(&db, &sample_item()).expect("submit");
        let reviewed = review_qc_item(
            &db,
            item.id,
            &QcReview {
                status: QcStatus::RevisionRequested,
                feedback: Some("Tighten the opener".to_string()),
                reviewed_by_id: "manager-1".to_string(),
            },
        )
        .expect("review");
        assert_eq!(reviewed.status, QcStatus::RevisionRequested);
        assert_eq!(reviewed.feedback.as_deref(), Some("Tighten the opener"));
    }

    #[test]
    fn test_review_missing_item_is_not_found() {
        let db = test_db();
        let err = review_qc_item(
            &db,
            9,
            &QcReview {
                status: QcStatus::Approved,
                feedback: None,
                reviewed_by_id: "manager-1".to_string(),
            },
        )
        .expect_err("gone");
        assert_eq!(err.status(), 404);
    }
}
