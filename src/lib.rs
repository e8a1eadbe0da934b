//! # Sitrack - Self-Improvement Tracker
//!
//! A personal task tracker backed by a local SQLite database.
//!
//! ## Features
//!
//! - **Task Management**: Add, edit, soft-delete, restore and hard-delete tasks
//! - **Status Workflow**: Planned, In Progress, Done, Deferred, Cancelled, with
//!   automatic completion timestamps
//! - **Paged Listing**: Sortable task list with page navigation
//! - **Self-Healing Schema**: Older database layouts are migrated in place on start
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitrack::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
