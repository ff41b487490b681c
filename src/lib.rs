//! Outreach — core engine for a sales-outreach pipeline.
//!
//! Prospects move through a fixed funnel of stages; every transition is
//! recorded as an activity and stamps a derived timing field the first time
//! a stage is reached. Around that engine sit teams, message templates, a
//! QC review queue, tasks, and a funnel analytics overview, all backed by
//! a single SQLite database.
//!
//! Layering:
//! - [`model`] — stage, status, and activity-type enums
//! - [`db`] — row types and SQLite access (`CrmDb`)
//! - [`services`] — validation and the stage-transition engine
//! - [`seed`] — first-run demo data

pub mod db;
pub mod error;
pub mod migrations;
pub mod model;
pub mod seed;
pub mod services;

pub use db::CrmDb;
pub use error::{CrmError, ErrorBody};
