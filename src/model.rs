//! Domain enumerations for the outreach pipeline.
//!
//! Stage, task status, QC status, and activity type are fixed vocabularies
//! stored as TEXT in SQLite. Each enum carries `as_str`/`parse` conversions;
//! `parse` is strict so that unknown values surface as validation errors at
//! the service boundary instead of being coerced.

use serde::{Deserialize, Serialize};

/// Position of a prospect in the outreach funnel.
///
/// Ordered for reporting; `Won`, `Lost`, and `Unresponsive` are terminal
/// absorbing states reachable from any non-terminal stage. The engine does
/// not enforce transition legality — any stage value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Identified,
    Warming,
    FirstTouchReady,
    FirstTouchSent,
    VideoReady,
    VideoSent,
    CallBooked,
    Won,
    Lost,
    Unresponsive,
}

/// Funnel order, used by reporting callers that want stable iteration.
pub const STAGE_ORDER: [Stage; 10] = [
    Stage::Identified,
    Stage::Warming,
    Stage::FirstTouchReady,
    Stage::FirstTouchSent,
    Stage::VideoReady,
    Stage::VideoSent,
    Stage::CallBooked,
    Stage::Won,
    Stage::Lost,
    Stage::Unresponsive,
];

impl Stage {
    /// String label for SQL storage and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Identified => "IDENTIFIED",
            Stage::Warming => "WARMING",
            Stage::FirstTouchReady => "FIRST_TOUCH_READY",
            Stage::FirstTouchSent => "FIRST_TOUCH_SENT",
            Stage::VideoReady => "VIDEO_READY",
            Stage::VideoSent => "VIDEO_SENT",
            Stage::CallBooked => "CALL_BOOKED",
            Stage::Won => "WON",
            Stage::Lost => "LOST",
            Stage::Unresponsive => "UNRESPONSIVE",
        }
    }

    /// Strict parse from a stored or submitted label.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IDENTIFIED" => Some(Stage::Identified),
            "WARMING" => Some(Stage::Warming),
            "FIRST_TOUCH_READY" => Some(Stage::FirstTouchReady),
            "FIRST_TOUCH_SENT" => Some(Stage::FirstTouchSent),
            "VIDEO_READY" => Some(Stage::VideoReady),
            "VIDEO_SENT" => Some(Stage::VideoSent),
            "CALL_BOOKED" => Some(Stage::CallBooked),
            "WON" => Some(Stage::Won),
            "LOST" => Some(Stage::Lost),
            "UNRESPONSIVE" => Some(Stage::Unresponsive),
            _ => None,
        }
    }

    /// Whether this stage is a terminal absorbing state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Won | Stage::Lost | Stage::Unresponsive)
    }

    /// The prospect timing column stamped when this stage is first entered,
    /// if any. Stamping is set-if-null: a non-null timing field is never
    /// overwritten.
    pub fn timing_column(&self) -> Option<&'static str> {
        match self {
            Stage::Warming => Some("warming_started_at"),
            Stage::FirstTouchSent => Some("first_touch_sent_at"),
            Stage::VideoSent => Some("video_sent_at"),
            Stage::CallBooked => Some("call_booked_at"),
            Stage::Won | Stage::Lost => Some("closed_at"),
            _ => None,
        }
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Skipped => "SKIPPED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TaskStatus::Pending),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "COMPLETED" => Some(TaskStatus::Completed),
            "SKIPPED" => Some(TaskStatus::Skipped),
            _ => None,
        }
    }
}

/// QC queue item status. All reviewed states are terminal from the engine's
/// perspective — resubmission creates a new item rather than reopening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QcStatus {
    Pending,
    Approved,
    Rejected,
    RevisionRequested,
}

impl QcStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QcStatus::Pending => "PENDING",
            QcStatus::Approved => "APPROVED",
            QcStatus::Rejected => "REJECTED",
            QcStatus::RevisionRequested => "REVISION_REQUESTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(QcStatus::Pending),
            "APPROVED" => Some(QcStatus::Approved),
            "REJECTED" => Some(QcStatus::Rejected),
            "REVISION_REQUESTED" => Some(QcStatus::RevisionRequested),
            _ => None,
        }
    }

    /// Statuses a reviewer may assign. `Pending` is the submission state and
    /// is not a valid review outcome.
    pub fn is_review_outcome(&self) -> bool {
        !matches!(self, QcStatus::Pending)
    }
}

/// Audit-log entry type. Only `StageChanged` is written by the core engine;
/// the rest are recorded by outreach tooling against the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    ProfileView,
    ContentLike,
    ContentComment,
    ConnectionSent,
    ConnectionAccepted,
    FirstTouchSent,
    FirstTouchReplied,
    VideoSent,
    VideoViewed,
    VideoReplied,
    CallScheduled,
    CallCompleted,
    NoteAdded,
    StageChanged,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::ProfileView => "PROFILE_VIEW",
            ActivityType::ContentLike => "CONTENT_LIKE",
            ActivityType::ContentComment => "CONTENT_COMMENT",
            ActivityType::ConnectionSent => "CONNECTION_SENT",
            ActivityType::ConnectionAccepted => "CONNECTION_ACCEPTED",
            ActivityType::FirstTouchSent => "FIRST_TOUCH_SENT",
            ActivityType::FirstTouchReplied => "FIRST_TOUCH_REPLIED",
            ActivityType::VideoSent => "VIDEO_SENT",
            ActivityType::VideoViewed => "VIDEO_VIEWED",
            ActivityType::VideoReplied => "VIDEO_REPLIED",
            ActivityType::CallScheduled => "CALL_SCHEDULED",
            ActivityType::CallCompleted => "CALL_COMPLETED",
            ActivityType::NoteAdded => "NOTE_ADDED",
            ActivityType::StageChanged => "STAGE_CHANGED",
        }
    }
}
