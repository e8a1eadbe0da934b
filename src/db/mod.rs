//! Database layer for sitrack.
//!
//! SQLite persistence for tasks and their status reference table. The
//! schema is normalized on every open (see [`schema`]), so repositories can
//! assume the canonical layout.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitrack::db::tasks::Tasks;
//! use sitrack::libs::page::PageRequest;
//! use sitrack::libs::task::Task;
//!
//! let mut tasks = Tasks::new()?;
//! tasks.insert(&Task::new("Morning run", None, "Planned"))?;
//! let page = tasks.page(&PageRequest::default())?;
//! println!("{}", page.label());
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection management: opens the database, enforces foreign keys and
/// runs the schema check.
pub mod db;

/// Canonical table layout, in-place column additions, column-order rebuilds
/// and status seeding.
pub mod schema;

/// Status reference table lookups, including the default-status fallback.
pub mod statuses;

/// Task CRUD, soft/hard deletion and the paged, sorted task list.
pub mod tasks;
