use super::db::Db;
use crate::libs::error::{TrackerError, TrackerResult};
use crate::libs::status::{Status, DEFAULT_STATUS};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SELECT_ALL_STATUSES: &str = "SELECT id, name FROM status ORDER BY id";
const SELECT_STATUS_BY_NAME: &str = "SELECT id, name FROM status WHERE name = ?1";
const SELECT_STATUS_BY_ID: &str = "SELECT id, name FROM status WHERE id = ?1";

pub struct Statuses {
    pub conn: Connection,
}

impl Statuses {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        Ok(Self { conn: db.conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Db::open(path)?;
        Ok(Self { conn: db.conn })
    }

    pub fn list(&self) -> TrackerResult<Vec<Status>> {
        list(&self.conn)
    }

    pub fn get_by_name(&self, name: &str) -> TrackerResult<Option<Status>> {
        get_by_name(&self.conn, name)
    }

    pub fn get_by_id(&self, id: i64) -> TrackerResult<Option<Status>> {
        Ok(self.conn.query_row(SELECT_STATUS_BY_ID, params![id], from_row).optional()?)
    }

    pub fn resolve(&self, name: &str) -> TrackerResult<Status> {
        resolve(&self.conn, name)
    }
}

fn from_row(row: &Row) -> rusqlite::Result<Status> {
    Ok(Status {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn list(conn: &Connection) -> TrackerResult<Vec<Status>> {
    let mut stmt = conn.prepare(SELECT_ALL_STATUSES)?;
    let statuses = stmt.query_map([], from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(statuses)
}

pub(crate) fn get_by_name(conn: &Connection, name: &str) -> TrackerResult<Option<Status>> {
    Ok(conn.query_row(SELECT_STATUS_BY_NAME, params![name.trim()], from_row).optional()?)
}

/// Looks a status up by name, falling back to the default status.
///
/// The fallback is itself resolved by name, so it follows the reference
/// table rather than assuming any particular id.
pub(crate) fn resolve(conn: &Connection, name: &str) -> TrackerResult<Status> {
    if let Some(status) = get_by_name(conn, name)? {
        return Ok(status);
    }

    match get_by_name(conn, DEFAULT_STATUS)? {
        Some(status) => {
            tracing::warn!(requested = name, fallback = %status.name, "unknown status, using default");
            Ok(status)
        }
        None => Err(TrackerError::StatusNotFound(name.to_string())),
    }
}
