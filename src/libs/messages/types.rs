//! Every user-facing message the application can print.
//!
//! Variants carry the values that get interpolated; the text itself lives in
//! `display.rs`.

#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(i64),
    TaskUpdated(i64),
    TaskSoftDeleted(i64),
    TaskHardDeleted(i64),
    TaskRestored(i64),
    TaskNotFoundWithId(i64),
    TaskNotDeleted(i64),
    TasksHeader,
    NoTasks,
    TrashHeader,
    TrashEmpty,
    NoChangesDetected,
    ConfirmHardDelete(String),
    OperationCancelled,
    CurrentTaskState,

    // === STATUS MESSAGES ===
    StatusesHeader,
    StatusFallback(String, String), // requested, fallback

    // === LIST MESSAGES ===
    PageSizeChanged(usize),
    SortChanged(String, String), // column, direction
    SortReset,
    ViewStateSaveFailed(String),

    // === SCHEMA MESSAGES ===
    SchemaUpToDate,
    SchemaTableCreated(String),
    SchemaColumnAdded(String, String), // table, column
    SchemaTableRebuilt(String),
    SchemaStatusSeeded(String),
    SchemaCompletionsNormalized(usize),
    SchemaMigrationFailed(String),
    SchemaColumnsHeader(String),

    // === DATABASE MESSAGES ===
    DbConnectionFailed(String),
    DbPath(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    PromptDbPath,
    PromptPageSize,
    PromptDefaultSort,

    // === PROMPTS ===
    PromptTaskDescription,
    PromptTaskDetails,
    PromptTaskStatus,
}
