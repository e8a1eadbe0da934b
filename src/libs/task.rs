use serde::{Deserialize, Serialize};

/// A tracked task as stored in the `tasks` table, joined with its status name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub description: String,
    pub details: Option<String>,
    pub creation_dt: Option<String>,
    pub completion_dt: Option<String>,
    pub status_id: Option<i64>,
    /// Display name of the referenced status. On insert/update this is the
    /// requested status; the repository resolves it to an id.
    pub status: String,
    pub is_deleted: bool,
}

impl Task {
    pub fn new(description: &str, details: Option<&str>, status: &str) -> Self {
        Task {
            id: None,
            description: description.to_string(),
            details: details.filter(|d| !d.trim().is_empty()).map(str::to_string),
            creation_dt: None,
            completion_dt: None,
            status_id: None,
            status: status.to_string(),
            is_deleted: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_dt.is_some()
    }
}
