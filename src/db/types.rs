//! Shared type definitions for the database layer.
//!
//! Row structs mirror table columns. Timestamps are stored as RFC3339 TEXT;
//! JSON-valued columns (team settings, prospect tags and custom fields,
//! activity details) are parsed into `serde_json` values at the row
//! boundary so callers never handle raw JSON strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ActivityType, QcStatus, Stage, TaskStatus};

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

// =============================================================================
// Teams
// =============================================================================

/// A row from the `teams` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTeam {
    pub id: i64,
    pub name: String,
    pub owner_id: String,
    pub settings: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for inserting a team. `settings` falls back to
/// [`default_team_settings`] when `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    pub owner_id: String,
    pub settings: Option<serde_json::Value>,
}

/// Default cadence settings applied to new teams.
pub fn default_team_settings() -> serde_json::Value {
    serde_json::json!({
        "warmingPeriodHours": 36,
        "firstTouchToVideoHours": 72,
        "staleThresholdDays": 14,
        "qcEnabled": true
    })
}

/// A row from the `team_members` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTeamMember {
    pub id: i64,
    pub team_id: i64,
    pub user_id: String,
    pub role: String,
    pub created_at: String,
}

// =============================================================================
// Prospects
// =============================================================================

/// A row from the `prospects` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbProspect {
    pub id: i64,
    pub team_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_handle: Option<String>,
    pub company: String,
    pub title: String,
    pub source: String,
    pub source_detail: Option<String>,
    pub tags: Vec<String>,
    pub custom_fields: serde_json::Value,
    pub stage: Stage,
    pub assigned_to_id: Option<String>,
    /// Stamped the first time the prospect enters WARMING; never overwritten.
    pub warming_started_at: Option<String>,
    /// Stamped the first time the prospect enters FIRST_TOUCH_SENT.
    pub first_touch_sent_at: Option<String>,
    /// Stamped the first time the prospect enters VIDEO_SENT.
    pub video_sent_at: Option<String>,
    /// Stamped the first time the prospect enters CALL_BOOKED.
    pub call_booked_at: Option<String>,
    /// Stamped the first time the prospect enters WON or LOST.
    pub closed_at: Option<String>,
    pub close_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for inserting a prospect. Timing fields are never writable at
/// creation — only the stage engine stamps them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProspect {
    pub team_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_handle: Option<String>,
    pub company: String,
    pub title: String,
    pub source: String,
    #[serde(default)]
    pub source_detail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "empty_object")]
    pub custom_fields: serde_json::Value,
    #[serde(default = "default_stage")]
    pub stage: Stage,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

fn default_stage() -> Stage {
    Stage::Identified
}

/// Partial update for a prospect. `None` leaves the stored value untouched;
/// `Some` overwrites it. Timing fields are deliberately absent — only the
/// stage engine writes them, and only set-if-null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_handle: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub source: Option<String>,
    pub source_detail: Option<String>,
    pub tags: Option<Vec<String>>,
    pub custom_fields: Option<serde_json::Value>,
    pub stage: Option<Stage>,
    pub assigned_to_id: Option<String>,
    pub close_reason: Option<String>,
    pub notes: Option<String>,
}

/// List filters for prospects. Team scoping is always required.
#[derive(Debug, Clone, Default)]
pub struct ProspectFilter {
    pub stage: Option<Stage>,
    pub assigned_to_id: Option<String>,
}

// =============================================================================
// Activities
// =============================================================================

/// A row from the `activities` table. Append-only: never updated or deleted
/// by the core. Activities referencing a deleted prospect remain as orphans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbActivity {
    pub id: i64,
    pub prospect_id: i64,
    pub user_id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub details: serde_json::Value,
    pub created_at: String,
}

/// Fields for appending an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub prospect_id: i64,
    pub user_id: String,
    pub activity_type: ActivityType,
    pub details: serde_json::Value,
}

/// Structured `details` payload for STAGE_CHANGED activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageChangeDetails {
    pub from_stage: Stage,
    pub to_stage: Stage,
}

// =============================================================================
// Templates
// =============================================================================

/// A row from the `templates` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTemplate {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub content: String,
    pub is_active: bool,
    pub created_by_id: String,
    pub times_used: i64,
    pub reply_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub team_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub content: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_by_id: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

// =============================================================================
// QC queue
// =============================================================================

/// A row from the `qc_queue` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbQcItem {
    pub id: i64,
    pub prospect_id: i64,
    pub template_id: Option<i64>,
    pub submitted_by_id: String,
    pub reviewed_by_id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    pub draft_content: String,
    pub status: QcStatus,
    pub feedback: Option<String>,
    pub submitted_at: String,
    pub reviewed_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQcItem {
    pub prospect_id: i64,
    #[serde(default)]
    pub template_id: Option<i64>,
    pub submitted_by_id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub draft_content: String,
}

/// Review outcome applied to a pending (or previously reviewed) QC item.
#[derive(Debug, Clone)]
pub struct QcReview {
    pub status: QcStatus,
    pub feedback: Option<String>,
    pub reviewed_by_id: String,
}

// =============================================================================
// Tasks
// =============================================================================

/// A row from the `tasks` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTask {
    pub id: i64,
    pub team_id: i64,
    pub prospect_id: Option<i64>,
    pub assigned_to_id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub priority: String,
    pub status: TaskStatus,
    pub completed_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub team_id: i64,
    #[serde(default)]
    pub prospect_id: Option<i64>,
    pub assigned_to_id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_priority() -> String {
    "MEDIUM".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub prospect_id: Option<i64>,
    pub assigned_to_id: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub status: Option<TaskStatus>,
}

/// List filters for tasks. Team scoping is always required.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub assigned_to_id: Option<String>,
    pub status: Option<TaskStatus>,
    /// Matches tasks whose due date is on or before this instant.
    pub due_before: Option<String>,
}

// =============================================================================
// Analytics
// =============================================================================

/// Aggregate funnel metrics. Stages with zero prospects are absent from
/// `prospects_by_stage` — callers treat a missing key as zero.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub prospects_by_stage: std::collections::HashMap<Stage, i64>,
    pub tasks_due_today: i64,
    pub qc_pending: i64,
    pub reply_rate: f64,
}
