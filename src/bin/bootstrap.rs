//! Outreach bootstrap — opens (and migrates) the database, optionally seeds
//! demo data, and prints the funnel overview as JSON.
//!
//! Usage: `outreach-bootstrap [--seed [owner-id] | --team <id>]`

use std::process::ExitCode;

use outreach::db::CrmDb;
use outreach::seed::seed_demo_data;

/// Resolve the team owned by `owner`. Team scoping is always explicit:
/// when the owner has no team yet there is nothing to report on, and the
/// caller is told to seed rather than being handed an arbitrary team id.
fn owned_team(db: &CrmDb, owner: &str) -> Result<i64, String> {
    db.get_teams_by_owner(owner)
        .map_err(|e| e.to_string())?
        .into_iter()
        .next()
        .map(|t| t.id)
        .ok_or_else(|| format!("no team found for {owner}; run with --seed to create demo data"))
}

fn run() -> Result<(), String> {
    let db = CrmDb::open().map_err(|e| e.to_string())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let team_id = match args.first().map(String::as_str) {
        Some("--seed") => {
            let owner = args.get(1).map(String::as_str).unwrap_or("demo-owner");
            seed_demo_data(&db, owner).map_err(|e| e.to_string())?
        }
        Some("--team") => args
            .get(1)
            .and_then(|v| v.parse().ok())
            .ok_or("--team requires a numeric team id")?,
        _ => owned_team(&db, "demo-owner")?,
    };

    let overview = db.analytics_overview(team_id).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&overview).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
