//! Display text for [`Message`].
//!
//! All wording is kept in one match so that message text can be reviewed
//! (and eventually localized) in a single place.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task #{} created", id),
            Message::TaskUpdated(id) => format!("Task #{} updated", id),
            Message::TaskSoftDeleted(id) => format!("Task #{} moved to trash", id),
            Message::TaskHardDeleted(id) => format!("Task #{} permanently deleted", id),
            Message::TaskRestored(id) => format!("Task #{} restored from trash", id),
            Message::TaskNotFoundWithId(id) => format!("Task with ID {} not found.", id),
            Message::TaskNotDeleted(id) => format!("Task #{} is not in the trash.", id),
            Message::TasksHeader => "Tasks:".to_string(),
            Message::NoTasks => "No tasks yet. Add one with `sitrack add`.".to_string(),
            Message::TrashHeader => "Trash:".to_string(),
            Message::TrashEmpty => "Trash is empty.".to_string(),
            Message::NoChangesDetected => "No changes detected.".to_string(),
            Message::ConfirmHardDelete(description) => format!("Permanently delete '{}'? This cannot be undone.", description),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::CurrentTaskState => "Current task:".to_string(),

            // === STATUS MESSAGES ===
            Message::StatusesHeader => "Statuses:".to_string(),
            Message::StatusFallback(requested, fallback) => format!("Status '{}' not found, using '{}'", requested, fallback),

            // === LIST MESSAGES ===
            Message::PageSizeChanged(size) => format!("Showing {} tasks per page", size),
            Message::SortChanged(column, direction) => format!("Sorted by {} ({})", column, direction),
            Message::SortReset => "Sort reset to newest first".to_string(),
            Message::ViewStateSaveFailed(error) => format!("Failed to save list view state: {}", error),

            // === SCHEMA MESSAGES ===
            Message::SchemaUpToDate => "Database schema is up to date".to_string(),
            Message::SchemaTableCreated(table) => format!("Created table '{}'", table),
            Message::SchemaColumnAdded(table, column) => format!("Added column '{}' to '{}'", column, table),
            Message::SchemaTableRebuilt(table) => format!("Rebuilt '{}' in canonical layout", table),
            Message::SchemaStatusSeeded(name) => format!("Added status '{}'", name),
            Message::SchemaCompletionsNormalized(count) => format!("Fixed completion time of {} task(s)", count),
            Message::SchemaMigrationFailed(error) => format!("Database schema check failed, continuing with the existing schema: {}", error),
            Message::SchemaColumnsHeader(table) => format!("Columns of '{}':", table),

            // === DATABASE MESSAGES ===
            Message::DbConnectionFailed(error) => format!("Failed to connect to database: {}", error),
            Message::DbPath(path) => format!("Database: {}", path),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigNotFound => "No configuration file found".to_string(),
            Message::PromptDbPath => "Database file (leave empty for the default location)".to_string(),
            Message::PromptPageSize => "Tasks per page".to_string(),
            Message::PromptDefaultSort => "Default sort".to_string(),

            // === PROMPTS ===
            Message::PromptTaskDescription => "Task".to_string(),
            Message::PromptTaskDetails => "Details (optional)".to_string(),
            Message::PromptTaskStatus => "Status".to_string(),
        };

        write!(f, "{}", text)
    }
}
