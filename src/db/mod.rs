//! SQLite-backed entity store for the outreach pipeline.
//!
//! The database lives at `~/.outreach/outreach.db`. It is the working store
//! for teams, prospects, activities, templates, QC queue items, and tasks.
//! Each write is transactional on its own; multi-step operations (the stage
//! transition engine) compose writes with [`CrmDb::with_transaction`].

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{params, Connection};

pub mod types;
pub use types::*;

pub mod activities;
pub mod analytics;
pub mod prospects;
pub mod qc;
pub mod tasks;
pub mod teams;
pub mod templates;

pub struct CrmDb {
    conn: Connection,
}

impl CrmDb {
    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| E::from(DbError::Sqlite(e)))?;
        match f(self) {
            Ok(val) => {
                self.conn
                    .execute_batch("COMMIT")
                    .map_err(|e| E::from(DbError::Sqlite(e)))?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Open (or create) the database at `~/.outreach/outreach.db` and apply
    /// the schema.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.outreach/outreach.db`.
    fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".outreach").join("outreach.db"))
    }

    /// Current UTC instant in the stored timestamp format.
    pub(crate) fn now() -> String {
        Utc::now().to_rfc3339()
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================

#[cfg(test)]
pub mod test_utils {
    use super::{CrmDb, NewProspect};
    use crate::model::Stage;

    /// Create a temporary database for testing.
    ///
    /// We leak the `TempDir` so the directory persists for the duration of
    /// the test. Test temp dirs are cleaned up by the OS.
    pub fn test_db() -> CrmDb {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        std::mem::forget(dir);
        CrmDb::open_at(path).expect("Failed to open test database")
    }

    /// Minimal valid prospect for tests.
    pub fn sample_prospect(team_id: i64, first: &str, last: &str) -> NewProspect {
        NewProspect {
            team_id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(format!("{}@example.com", first.to_lowercase())),
            linkedin_url: None,
            twitter_handle: None,
            company: "Acme Inc".to_string(),
            title: "VP Sales".to_string(),
            source: "LinkedIn".to_string(),
            source_detail: None,
            tags: vec![],
            custom_fields: serde_json::json!({}),
            stage: Stage::Identified,
            assigned_to_id: None,
            notes: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
