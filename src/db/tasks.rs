//! Task persistence and the paged task list query.
//!
//! Every listing query excludes soft-deleted rows (`is_deleted = 1`); they
//! stay in the table until hard-deleted and are only reachable through
//! [`Tasks::get_by_id`] and [`Tasks::deleted`].
//!
//! The completion timestamp follows the status: it is set when a task enters
//! the terminal status and cleared when it leaves it.

use super::db::Db;
use super::statuses;
use crate::libs::error::{TrackerError, TrackerResult};
use crate::libs::page::{Page, PageRequest};
use crate::libs::status::Status;
use crate::libs::task::Task;
use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SELECT_TASKS: &str = "SELECT t.id, t.description, t.details, t.creation_dt, t.completion_dt, t.status_id, COALESCE(s.name, ''), t.is_deleted
    FROM tasks t LEFT JOIN status s ON s.id = t.status_id";
const INSERT_TASK: &str = "INSERT INTO tasks (description, details, creation_dt, completion_dt, status_id, is_deleted) VALUES (?1, ?2, ?3, ?4, ?5, 0)";
const UPDATE_TASK: &str = "UPDATE tasks SET description = ?2, details = ?3, completion_dt = ?4, status_id = ?5 WHERE id = ?1";
const UPDATE_STATUS: &str = "UPDATE tasks SET completion_dt = ?2, status_id = ?3 WHERE id = ?1";
const SET_DELETED: &str = "UPDATE tasks SET is_deleted = ?2 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const COUNT_TASKS: &str = "SELECT COUNT(*) FROM tasks WHERE is_deleted = 0";
const WHERE_ID: &str = "WHERE t.id = ?1";
const WHERE_ACTIVE: &str = "WHERE t.is_deleted = 0";
const WHERE_DELETED: &str = "WHERE t.is_deleted = 1";

/// Timestamp format for creation and completion times (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Tasks {
    pub conn: Connection,
}

impl Tasks {
    pub fn new() -> Result<Tasks> {
        let db = Db::new()?;
        Ok(Tasks { conn: db.conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Tasks> {
        let db = Db::open(path)?;
        Ok(Tasks { conn: db.conn })
    }

    /// Inserts a task and returns its id.
    ///
    /// The creation time is set here; `task.status` is resolved by name with
    /// the default-status fallback.
    pub fn insert(&mut self, task: &Task) -> TrackerResult<i64> {
        let description = validate_description(&task.description)?;
        let status = statuses::resolve(&self.conn, &task.status)?;
        let now = now();
        let completion_dt = status.is_terminal().then(|| now.clone());

        self.conn
            .execute(INSERT_TASK, params![description, task.details, now, completion_dt, status.id])?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, status = %status.name, "task inserted");

        Ok(id)
    }

    /// Returns the task with `id`, including soft-deleted ones.
    pub fn get_by_id(&mut self, id: i64) -> TrackerResult<Option<Task>> {
        Ok(self
            .conn
            .query_row(&format!("{} {}", SELECT_TASKS, WHERE_ID), params![id], from_row)
            .optional()?)
    }

    /// Saves description, details and status of an existing task.
    ///
    /// A task that stays in the terminal status keeps its completion time.
    pub fn update(&mut self, task: &Task) -> TrackerResult<()> {
        let id = task.id.ok_or(TrackerError::UnsavedTask)?;
        let current = self.get_by_id(id)?.ok_or(TrackerError::TaskNotFound(id))?;
        let description = validate_description(&task.description)?;
        let status = statuses::resolve(&self.conn, &task.status)?;

        let completion_dt = match (status.is_terminal(), current.completion_dt) {
            (true, Some(existing)) if current.status_id == Some(status.id) => Some(existing),
            (true, _) => Some(now()),
            (false, _) => None,
        };

        self.conn
            .execute(UPDATE_TASK, params![id, description, task.details, completion_dt, status.id])?;
        tracing::debug!(id, status = %status.name, "task updated");

        Ok(())
    }

    /// Moves a task to `status`. Entering the terminal status always stamps
    /// the current time.
    pub fn set_status(&mut self, id: i64, status: &str) -> TrackerResult<Status> {
        let status = statuses::resolve(&self.conn, status)?;
        let completion_dt = status.is_terminal().then(now);

        let affected = self.conn.execute(UPDATE_STATUS, params![id, completion_dt, status.id])?;
        if affected == 0 {
            return Err(TrackerError::TaskNotFound(id));
        }

        Ok(status)
    }

    /// Hides a task from every listing without removing it.
    pub fn soft_delete(&mut self, id: i64) -> TrackerResult<()> {
        self.set_deleted(id, true)
    }

    pub fn restore(&mut self, id: i64) -> TrackerResult<()> {
        self.set_deleted(id, false)
    }

    /// Removes the row permanently.
    pub fn hard_delete(&mut self, id: i64) -> TrackerResult<()> {
        let affected = self.conn.execute(DELETE_TASK, params![id])?;
        if affected == 0 {
            return Err(TrackerError::TaskNotFound(id));
        }
        tracing::debug!(id, "task removed");
        Ok(())
    }

    /// Soft-deleted tasks, newest first.
    pub fn deleted(&mut self) -> TrackerResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} {} ORDER BY t.creation_dt DESC, t.id DESC", SELECT_TASKS, WHERE_DELETED))?;
        let tasks = stmt.query_map([], from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Number of tasks that are not soft-deleted.
    pub fn count(&mut self) -> TrackerResult<i64> {
        Ok(self.conn.query_row(COUNT_TASKS, [], |row| row.get(0))?)
    }

    /// Fetches one page of non-deleted tasks.
    ///
    /// The requested index is clamped to the pages that exist once the total
    /// is known, so asking past the end yields the last page and an empty
    /// table yields a single empty page.
    pub fn page(&mut self, request: &PageRequest) -> TrackerResult<Page> {
        let total = self.count()?;
        let page_count = Page::page_count_for(total, request.page_size);
        let page_index = Page::clamp_index(request.page_index, page_count);
        let offset = Page::offset(page_index, request.page_size);

        let sql = format!(
            "{} {} ORDER BY {} LIMIT ?1 OFFSET ?2",
            SELECT_TASKS,
            WHERE_ACTIVE,
            request.sort.order_by()
        );
        tracing::trace!(%sql, page_index, offset, "page query");

        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![request.page_size.get() as i64, offset], from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            tasks,
            total,
            page_index,
            page_count,
            page_size: request.page_size,
        })
    }

    /// All statuses, for status pickers.
    pub fn statuses(&self) -> TrackerResult<Vec<Status>> {
        statuses::list(&self.conn)
    }

    pub fn status_by_name(&self, name: &str) -> TrackerResult<Option<Status>> {
        statuses::get_by_name(&self.conn, name)
    }

    fn set_deleted(&mut self, id: i64, deleted: bool) -> TrackerResult<()> {
        let affected = self.conn.execute(SET_DELETED, params![id, deleted])?;
        if affected == 0 {
            return Err(TrackerError::TaskNotFound(id));
        }
        tracing::debug!(id, deleted, "task deleted flag changed");
        Ok(())
    }
}

fn from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        description: row.get(1)?,
        details: row.get(2)?,
        creation_dt: row.get(3)?,
        completion_dt: row.get(4)?,
        status_id: row.get(5)?,
        status: row.get(6)?,
        is_deleted: row.get(7)?,
    })
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn validate_description(description: &str) -> TrackerResult<&str> {
    let description = description.trim();
    if description.is_empty() {
        return Err(TrackerError::EmptyDescription);
    }
    Ok(description)
}
