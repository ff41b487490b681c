//! Business logic on top of the database layer.
//!
//! Services validate input, enforce the stage-transition side effects, and
//! translate storage results into [`CrmError`](crate::error::CrmError)
//! classifications a transport can map directly to response codes.

pub mod prospects;
pub mod qc;
pub mod tasks;
pub mod teams;
pub mod templates;

/// Actor recorded on activities when no user is attributed, e.g. automated
/// cadence transitions.
pub const SYSTEM_ACTOR: &str = "system";
