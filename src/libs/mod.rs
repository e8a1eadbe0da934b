//! Domain types and supporting services for sitrack.
//!
//! ## Features
//!
//! - **Domain Types**: tasks, statuses, page and sort requests
//! - **Core Infrastructure**: configuration, data storage, typed errors, messaging
//! - **User Interface**: table rendering and persisted list view state
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitrack::libs::task::Task;
//! use sitrack::db::tasks::Tasks;
//!
//! let task = Task::new("Read a chapter", Some("Rust book, ch. 10"), "Planned");
//! let mut tasks = Tasks::new()?;
//! tasks.insert(&task)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod messages;
pub mod page;
pub mod status;
pub mod task;
pub mod view;
pub mod view_state;
