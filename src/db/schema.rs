//! Schema normalization for the task database.
//!
//! Instead of numbered migrations, the schema is described by its canonical
//! layout and every start compares the persisted tables against it:
//!
//! - missing tables are created;
//! - missing task columns are added in place where SQLite allows it;
//! - a task table whose leading columns are not the canonical sequence, whose
//!   `id` is not the integer primary key, or whose `status_id` lacks its
//!   foreign key is rebuilt under a temporary name. Rows are copied by column
//!   name, and the rebuild is renamed into place;
//! - completion times are made consistent with the terminal status;
//! - canonical statuses absent from the reference table are inserted by name.
//!
//! All of it happens in a single transaction, so a failure leaves the
//! database exactly as it was.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitrack::db::schema::SchemaManager;
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("tracker.db")?;
//! let report = SchemaManager::new().ensure(&mut conn)?;
//! assert!(SchemaManager::new().ensure(&mut conn)?.is_noop());
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::status::{CANONICAL_STATUSES, DEFAULT_STATUS, TERMINAL_STATUS};
use anyhow::Result;
use rusqlite::{params, Connection};
use std::collections::HashSet;

pub const TASKS_TABLE: &str = "tasks";
pub const STATUS_TABLE: &str = "status";

/// Column names of the task table in their canonical order.
pub const CANONICAL_TASK_COLUMNS: [&str; 7] = ["id", "description", "details", "creation_dt", "completion_dt", "status_id", "is_deleted"];

const SCHEMA_STATUS: &str = "CREATE TABLE IF NOT EXISTS status (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
)";
const SEED_STATUS: &str = "INSERT INTO status (name) SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM status WHERE name = ?1)";
const INDICES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_tasks_is_deleted ON tasks(is_deleted)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_creation_dt ON tasks(creation_dt)",
];

/// A column of a managed table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    /// Type and constraints used in `CREATE TABLE`.
    pub decl: String,
    /// Declaration usable with `ALTER TABLE ... ADD COLUMN`; `None` when the
    /// column can only be introduced by a rebuild.
    pub add_decl: Option<String>,
    /// SQL expression for rows that hold NULL in this column after it is
    /// added or copied.
    pub fill: Option<String>,
    /// Referenced table; dangling values are replaced by `fill` on copy.
    pub references: Option<String>,
}

impl ColumnDef {
    fn new(name: &str, decl: &str, add_decl: Option<&str>, fill: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            decl: decl.to_string(),
            add_decl: add_decl.map(str::to_string),
            fill,
            references: None,
        }
    }

    fn referencing(mut self, table: &str) -> Self {
        self.references = Some(table.to_string());
        self
    }

    /// Source expression used when copying this column during a rebuild.
    fn copy_expr(&self) -> String {
        let fill = self.fill.as_deref().unwrap_or("NULL");
        match (&self.references, &self.fill) {
            (Some(table), _) => format!(
                "CASE WHEN \"{col}\" IN (SELECT id FROM \"{table}\") THEN \"{col}\" ELSE {fill} END",
                col = self.name
            ),
            (None, Some(_)) => format!("COALESCE(\"{}\", {})", self.name, fill),
            (None, None) => format!("\"{}\"", self.name),
        }
    }

    /// A column that is not part of the canonical layout but must survive a rebuild.
    fn carried(name: &str, decl_type: &str) -> Self {
        Self::new(name, decl_type, Some(decl_type), None)
    }
}

/// A column as persisted, from `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// What a call to [`SchemaManager::ensure`] changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaReport {
    pub created_tables: Vec<String>,
    pub added_columns: Vec<String>,
    pub rebuilt: bool,
    pub seeded_statuses: Vec<String>,
    /// Rows whose completion time was set or cleared to match their status.
    pub normalized_completions: usize,
}

impl SchemaReport {
    pub fn is_noop(&self) -> bool {
        self.created_tables.is_empty() && self.added_columns.is_empty() && !self.rebuilt
            && self.seeded_statuses.is_empty()
            && self.normalized_completions == 0
    }
}

pub struct SchemaManager {
    task_columns: Vec<ColumnDef>,
}

impl SchemaManager {
    pub fn new() -> Self {
        let default_status = format!("(SELECT id FROM status WHERE name = '{}')", DEFAULT_STATUS.replace('\'', "''"));
        let task_columns = vec![
            ColumnDef::new("id", "INTEGER PRIMARY KEY", None, None),
            ColumnDef::new("description", "TEXT NOT NULL DEFAULT ''", Some("TEXT NOT NULL DEFAULT ''"), Some("''".to_string())),
            ColumnDef::new("details", "TEXT", Some("TEXT"), None),
            ColumnDef::new(
                "creation_dt",
                "TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))",
                Some("TEXT"),
                Some("datetime('now', 'localtime')".to_string()),
            ),
            ColumnDef::new("completion_dt", "TEXT", Some("TEXT"), None),
            ColumnDef::new(
                "status_id",
                "INTEGER REFERENCES status(id)",
                Some("INTEGER REFERENCES status(id)"),
                Some(default_status),
            )
            .referencing(STATUS_TABLE),
            ColumnDef::new("is_deleted", "BOOLEAN NOT NULL DEFAULT 0", Some("BOOLEAN NOT NULL DEFAULT 0"), Some("0".to_string())),
        ];

        Self { task_columns }
    }

    pub fn task_columns(&self) -> &[ColumnDef] {
        &self.task_columns
    }

    /// Brings the database to the canonical layout in one transaction.
    pub fn ensure(&self, conn: &mut Connection) -> Result<SchemaReport> {
        let mut report = SchemaReport::default();
        let tx = conn.transaction()?;

        if !table_exists(&tx, STATUS_TABLE)? {
            tx.execute(SCHEMA_STATUS, [])?;
            report.created_tables.push(STATUS_TABLE.to_string());
        }
        for name in CANONICAL_STATUSES {
            if tx.execute(SEED_STATUS, params![name])? > 0 {
                tracing::info!(status = name, "seeded status");
                report.seeded_statuses.push(name.to_string());
            }
        }

        if !table_exists(&tx, TASKS_TABLE)? {
            tx.execute(&create_table_sql(TASKS_TABLE, &self.task_columns), [])?;
            report.created_tables.push(TASKS_TABLE.to_string());
        } else {
            report.added_columns = self.add_missing_columns(&tx)?;
            if self.needs_rebuild(&tx)? {
                let columns = self.rebuild_layout(&tx)?;
                let copied = rebuild_table(&tx, TASKS_TABLE, &columns)?;
                tracing::info!(table = TASKS_TABLE, rows = copied, "rebuilt table in canonical layout");
                report.rebuilt = true;
            }
            report.normalized_completions = normalize_completions(&tx)?;
        }

        for index in INDICES {
            tx.execute(index, [])?;
        }

        tx.commit()?;
        Ok(report)
    }

    /// Adds every canonical column that is missing and can be added in place.
    fn add_missing_columns(&self, conn: &Connection) -> Result<Vec<String>> {
        let existing = column_name_set(conn, TASKS_TABLE)?;
        let mut added = Vec::new();

        for column in &self.task_columns {
            if existing.contains(&column.name.to_lowercase()) {
                continue;
            }
            // Columns without an in-place declaration are created by the rebuild.
            let Some(add_decl) = &column.add_decl else {
                continue;
            };
            conn.execute(&format!("ALTER TABLE \"{}\" ADD COLUMN \"{}\" {}", TASKS_TABLE, column.name, add_decl), [])?;
            if let Some(fill) = &column.fill {
                conn.execute(
                    &format!("UPDATE \"{}\" SET \"{}\" = {} WHERE \"{}\" IS NULL", TASKS_TABLE, column.name, fill, column.name),
                    [],
                )?;
            }
            tracing::info!(table = TASKS_TABLE, column = %column.name, "added column");
            added.push(column.name.clone());
        }

        Ok(added)
    }

    /// True when the leading task columns differ from the canonical sequence,
    /// `id` is not the integer primary key, or a reference is not declared.
    fn needs_rebuild(&self, conn: &Connection) -> Result<bool> {
        let persisted = table_columns(conn, TASKS_TABLE)?;
        if persisted.len() < self.task_columns.len() {
            return Ok(true);
        }
        let in_order = self
            .task_columns
            .iter()
            .zip(&persisted)
            .all(|(canonical, actual)| canonical.name.eq_ignore_ascii_case(&actual.name));
        if !in_order {
            return Ok(true);
        }

        let rowid_key = persisted
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case("id"))
            .is_some_and(|c| c.primary_key && c.decl_type.eq_ignore_ascii_case("INTEGER"));
        if !rowid_key {
            return Ok(true);
        }

        let declared = foreign_keys(conn, TASKS_TABLE)?;
        let missing_reference = self.task_columns.iter().any(|column| match &column.references {
            Some(table) => !declared.iter().any(|fk| fk.from.eq_ignore_ascii_case(&column.name) && fk.references(table)),
            None => false,
        });
        Ok(missing_reference)
    }

    /// Canonical columns followed by any extra persisted columns.
    fn rebuild_layout(&self, conn: &Connection) -> Result<Vec<ColumnDef>> {
        let canonical: HashSet<String> = self.task_columns.iter().map(|c| c.name.to_lowercase()).collect();
        let mut columns = self.task_columns.clone();
        for info in table_columns(conn, TASKS_TABLE)? {
            if !canonical.contains(&info.name.to_lowercase()) {
                columns.push(ColumnDef::carried(&info.name, &info.decl_type));
            }
        }
        Ok(columns)
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// The persisted column layout of `table`, in storage order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\")", table))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                decl_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                primary_key: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// A declared foreign key, from `PRAGMA foreign_key_list`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyInfo {
    pub table: String,
    pub from: String,
    /// `None` when the constraint names no column and targets the primary key.
    pub to: Option<String>,
}

impl ForeignKeyInfo {
    fn references(&self, table: &str) -> bool {
        self.table.eq_ignore_ascii_case(table) && self.to.as_deref().map_or(true, |to| to.eq_ignore_ascii_case("id"))
    }
}

pub fn foreign_keys(conn: &Connection, table: &str) -> Result<Vec<ForeignKeyInfo>> {
    let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list(\"{}\")", table))?;
    let keys = stmt
        .query_map([], |row| {
            Ok(ForeignKeyInfo {
                table: row.get(2)?,
                from: row.get(3)?,
                to: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(keys)
}

/// Sets a completion time on terminal tasks that lack one and clears it on
/// all others. Returns the number of rows changed.
fn normalize_completions(conn: &Connection) -> Result<usize> {
    let terminal = format!("(SELECT id FROM status WHERE name = '{}')", TERMINAL_STATUS.replace('\'', "''"));
    let stamped = conn.execute(
        &format!(
            "UPDATE tasks SET completion_dt = datetime('now', 'localtime') WHERE completion_dt IS NULL AND status_id IN {}",
            terminal
        ),
        [],
    )?;
    let cleared = conn.execute(
        &format!(
            "UPDATE tasks SET completion_dt = NULL WHERE completion_dt IS NOT NULL AND (status_id IS NULL OR status_id NOT IN {})",
            terminal
        ),
        [],
    )?;
    if stamped + cleared > 0 {
        tracing::info!(stamped, cleared, "normalized completion times");
    }
    Ok(stamped + cleared)
}

fn column_name_set(conn: &Connection, table: &str) -> Result<HashSet<String>> {
    Ok(table_columns(conn, table)?.into_iter().map(|c| c.name.to_lowercase()).collect())
}

fn create_table_sql(table: &str, columns: &[ColumnDef]) -> String {
    let body = columns
        .iter()
        .map(|c| format!("    \"{}\" {}", c.name, c.decl).trim_end().to_string())
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE \"{}\" (\n{}\n)", table, body)
}

/// Recreates `table` with exactly `columns`, in that order.
///
/// Rows are copied by column name, so the old column order does not matter;
/// columns absent from the old table take their default and NULLs or
/// dangling references take `fill`. Columns not listed in `columns` are
/// dropped. Must run inside a transaction since the original table is
/// dropped before the rename. Returns the number of rows copied.
pub fn rebuild_table(conn: &Connection, table: &str, columns: &[ColumnDef]) -> Result<usize> {
    let temp_table = format!("{}_rebuild", table);
    let existing = column_name_set(conn, table)?;

    // Leftover from an interrupted run outside a transaction
    conn.execute(&format!("DROP TABLE IF EXISTS \"{}\"", temp_table), [])?;
    conn.execute(&create_table_sql(&temp_table, columns), [])?;

    let shared: Vec<&ColumnDef> = columns.iter().filter(|c| existing.contains(&c.name.to_lowercase())).collect();
    let copied = if shared.is_empty() {
        0
    } else {
        let targets = shared.iter().map(|c| format!("\"{}\"", c.name)).collect::<Vec<_>>().join(", ");
        let sources = shared.iter().map(|c| c.copy_expr()).collect::<Vec<_>>().join(", ");
        conn.execute(
            &format!("INSERT INTO \"{}\" ({}) SELECT {} FROM \"{}\"", temp_table, targets, sources, table),
            [],
        )?
    };

    conn.execute(&format!("DROP TABLE \"{}\"", table), [])?;
    conn.execute(&format!("ALTER TABLE \"{}\" RENAME TO \"{}\"", temp_table, table), [])?;

    Ok(copied)
}
