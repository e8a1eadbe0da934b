use super::schema::SchemaManager;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_warning;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the configured database and brings its schema up to date.
    pub fn new() -> Result<Db> {
        let db_file_path = Config::read()?.db_path()?;
        Self::open(db_file_path)
    }

    /// Opens `path` and brings its schema up to date.
    ///
    /// Schema problems never fail the call: they are logged and reported as a
    /// warning, and the connection is returned with whatever schema it has.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        let mut db = Self::open_without_schema(path)?;

        match SchemaManager::new().ensure(&mut db.conn) {
            Ok(report) => {
                if !report.is_noop() {
                    tracing::info!(?report, "database schema updated");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "schema check failed");
                msg_warning!(Message::SchemaMigrationFailed(e.to_string()));
            }
        }

        Ok(db)
    }

    /// Opens `path` with foreign keys enforced, leaving the schema untouched.
    pub fn open_without_schema<P: AsRef<Path>>(path: P) -> Result<Db> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        tracing::debug!(path = %path.display(), "database opened");

        Ok(Db { conn })
    }
}
