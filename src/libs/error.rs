//! Typed errors raised by the data layer.
//!
//! Repositories return [`TrackerResult`]; commands work with `anyhow::Result`
//! and let `?` convert these on the way up.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Task with ID {0} not found")]
    TaskNotFound(i64),

    #[error("Status '{0}' not found and no default status is available")]
    StatusNotFound(String),

    #[error("Task has no ID; insert it before updating")]
    UnsavedTask,

    #[error("Task description must not be empty")]
    EmptyDescription,

    #[error("Page size {0} is not one of the available choices ({1})")]
    InvalidPageSize(usize, String),

    #[error("Unknown sort column '{0}'")]
    UnknownSortColumn(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
