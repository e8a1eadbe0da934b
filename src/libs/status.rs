use serde::{Deserialize, Serialize};

/// Status names seeded into the reference table, in seed order.
pub const CANONICAL_STATUSES: [&str; 5] = ["Planned", "In Progress", "Done", "Deferred", "Cancelled"];

/// Status assigned when a requested status name cannot be resolved.
pub const DEFAULT_STATUS: &str = "Planned";

/// Entering this status stamps the task's completion time.
pub const TERMINAL_STATUS: &str = "Done";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: i64,
    pub name: String,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        is_terminal(&self.name)
    }
}

pub fn is_terminal(name: &str) -> bool {
    name == TERMINAL_STATUS
}
