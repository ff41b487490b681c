//! Demo data seeding for first-run setup.

use crate::db::{CrmDb, NewProspect, NewTeam, NewTemplate};
use crate::error::CrmError;
use crate::model::Stage;

fn demo_prospect(
    team_id: i64,
    first: &str,
    last: &str,
    company: &str,
    title: &str,
    source: &str,
    stage: Stage,
) -> NewProspect {
    NewProspect {
        team_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(format!(
            "{}.{}@{}.example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            company.to_lowercase().replace(' ', "")
        )),
        linkedin_url: None,
        twitter_handle: None,
        company: company.to_string(),
        title: title.to_string(),
        source: source.to_string(),
        source_detail: None,
        tags: vec!["demo".to_string()],
        custom_fields: serde_json::json!({}),
        stage,
        assigned_to_id: Some("demo-rep".to_string()),
        notes: None,
    }
}

/// Seed a demo team with prospects and templates for `owner_id`.
///
/// Idempotent: if the owner already has a team, nothing is written and the
/// existing team's id is returned.
pub fn seed_demo_data(db: &CrmDb, owner_id: &str) -> Result<i64, CrmError> {
    if let Some(existing) = db.get_teams_by_owner(owner_id)?.into_iter().next() {
        log::info!("Demo data already present for {owner_id}, skipping seed");
        return Ok(existing.id);
    }

    let team = db.create_team(&NewTeam {
        name: "Growth Team".to_string(),
        owner_id: owner_id.to_string(),
        settings: None,
    })?;
    db.add_team_member(team.id, owner_id, "ADMIN")?;

    let prospects = vec![
        demo_prospect(
            team.id,
            "Sarah",
            "Connor",
            "Skynet Corp",
            "CTO",
            "LinkedIn",
            Stage::Identified,
        ),
        demo_prospect(
            team.id,
            "John",
            "Doe",
            "Acme Inc",
            "VP Sales",
            "Clay",
            Stage::Warming,
        ),
        demo_prospect(
            team.id,
            "Jane",
            "Smith",
            "TechStar",
            "CEO",
            "Referral",
            Stage::FirstTouchReady,
        ),
    ];
    db.create_prospects_bulk(&prospects)?;

    db.create_template(&NewTemplate {
        team_id: team.id,
        name: "Casual opener".to_string(),
        template_type: "FIRST_TOUCH".to_string(),
        content: "Hey {{firstName}}, saw your post about {{topic}} — quick question."
            .to_string(),
        is_active: true,
        created_by_id: owner_id.to_string(),
    })?;
    db.create_template(&NewTemplate {
        team_id: team.id,
        name: "Video intro".to_string(),
        template_type: "VIDEO".to_string(),
        content: "{{firstName}}, I recorded a 90-second video for you: {{videoUrl}}"
            .to_string(),
        is_active: true,
        created_by_id: owner_id.to_string(),
    })?;

    log::info!("Seeded demo team {} for {owner_id}", team.id);
    Ok(team.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::db::ProspectFilter;

    #[test]
    fn test_seed_creates_team_with_data() {
        let db = test_db();
        let team_id = seed_demo_data(&db, "owner-1").expect("seed");

        let prospects = db
            .get_prospects(team_id, &ProspectFilter::default())
            .expect("list");
        assert_eq!(prospects.len(), 3);
        assert_eq!(db.get_templates(team_id, None).expect("list").len(), 2);
        assert_eq!(db.get_team_members(team_id).expect("list").len(), 1);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let db = test_db();
        let first = seed_demo_data(&db, "owner-1").expect("seed");
        let second = seed_demo_data(&db, "owner-1").expect("seed again");
        assert_eq!(first, second);

        let prospects = db
            .get_prospects(first, &ProspectFilter::default())
            .expect("list");
        assert_eq!(prospects.len(), 3, "no duplicate seed rows");
    }
}
