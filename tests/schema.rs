#[cfg(test)]
mod tests {
    use rusqlite::{params, Connection};
    use sitrack::db::db::Db;
    use sitrack::db::schema::{foreign_keys, table_columns, SchemaManager, CANONICAL_TASK_COLUMNS, TASKS_TABLE};
    use sitrack::db::tasks::Tasks;
    use sitrack::libs::task::Task;
    use sitrack::libs::status::CANONICAL_STATUSES;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SchemaTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for SchemaTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("tracker.db");
            SchemaTestContext { _temp_dir: temp_dir, db_path }
        }
    }

    impl SchemaTestContext {
        fn raw(&self) -> Connection {
            Db::open_without_schema(&self.db_path).unwrap().conn
        }
    }

    fn column_names(conn: &Connection) -> Vec<String> {
        table_columns(conn, TASKS_TABLE).unwrap().into_iter().map(|c| c.name).collect()
    }

    fn status_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn.prepare("SELECT name FROM status ORDER BY id").unwrap();
        stmt.query_map([], |row| row.get(0)).unwrap().collect::<Result<Vec<String>, _>>().unwrap()
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_fresh_database_gets_canonical_schema(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        let report = SchemaManager::new().ensure(&mut conn).unwrap();

        assert_eq!(report.created_tables, vec!["status".to_string(), "tasks".to_string()]);
        assert_eq!(report.seeded_statuses.len(), CANONICAL_STATUSES.len());
        assert!(!report.rebuilt);
        assert_eq!(column_names(&conn), CANONICAL_TASK_COLUMNS);
        assert_eq!(status_names(&conn), CANONICAL_STATUSES);
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_ensure_is_idempotent(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        let manager = SchemaManager::new();

        manager.ensure(&mut conn).unwrap();
        let columns_before = column_names(&conn);

        let second = manager.ensure(&mut conn).unwrap();
        assert!(second.is_noop());
        assert_eq!(column_names(&conn), columns_before);
        assert_eq!(status_names(&conn).len(), CANONICAL_STATUSES.len());
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_missing_trailing_column_is_added_in_place(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        conn.execute_batch(
            "CREATE TABLE status (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
             INSERT INTO status (name) VALUES ('Planned'), ('In Progress'), ('Done');
             CREATE TABLE tasks (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                details TEXT,
                creation_dt TEXT,
                completion_dt TEXT,
                status_id INTEGER REFERENCES status(id)
             );
             INSERT INTO tasks (description, creation_dt, status_id) VALUES ('Stretch', '2024-01-01 08:00:00', 1);",
        )
        .unwrap();

        let report = SchemaManager::new().ensure(&mut conn).unwrap();

        assert_eq!(report.added_columns, vec!["is_deleted".to_string()]);
        assert!(!report.rebuilt);
        assert_eq!(report.seeded_statuses, vec!["Deferred".to_string(), "Cancelled".to_string()]);
        assert_eq!(column_names(&conn), CANONICAL_TASK_COLUMNS);

        let deleted: bool = conn.query_row("SELECT is_deleted FROM tasks WHERE description = 'Stretch'", [], |row| row.get(0)).unwrap();
        assert!(!deleted);
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_out_of_order_table_is_rebuilt_preserving_rows(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        conn.execute_batch(
            "CREATE TABLE tasks (
                status_id INTEGER,
                description TEXT NOT NULL,
                id INTEGER PRIMARY KEY,
                priority INTEGER,
                details TEXT,
                is_deleted BOOLEAN NOT NULL DEFAULT 0,
                completion_dt TEXT,
                creation_dt TEXT
             );",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks (id, status_id, description, priority, details, is_deleted, completion_dt, creation_dt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![7, 3, "Read a chapter", 2, "Rust book", false, "2024-02-02 10:00:00", "2024-02-01 09:00:00"],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks (id, status_id, description, creation_dt) VALUES (8, 99, 'Orphan', '2024-02-03 09:00:00')",
            [],
        )
        .unwrap();

        let report = SchemaManager::new().ensure(&mut conn).unwrap();
        assert!(report.rebuilt);

        let mut expected: Vec<String> = CANONICAL_TASK_COLUMNS.iter().map(|c| c.to_string()).collect();
        expected.push("priority".to_string());
        assert_eq!(column_names(&conn), expected);

        let row: (String, Option<String>, String, Option<String>, i64, i64) = conn
            .query_row(
                "SELECT description, details, creation_dt, completion_dt, status_id, priority FROM tasks WHERE id = 7",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?)),
            )
            .unwrap();
        assert_eq!(row.0, "Read a chapter");
        assert_eq!(row.1.as_deref(), Some("Rust book"));
        assert_eq!(row.2, "2024-02-01 09:00:00");
        assert_eq!(row.3.as_deref(), Some("2024-02-02 10:00:00"));
        assert_eq!(row.4, 3);
        assert_eq!(row.5, 2);

        // Dangling status reference falls back to the default status by name
        let orphan_status: String = conn
            .query_row("SELECT s.name FROM tasks t JOIN status s ON s.id = t.status_id WHERE t.id = 8", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphan_status, "Planned");

        // Already canonical now
        assert!(SchemaManager::new().ensure(&mut conn).unwrap().is_noop());
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_missing_status_reference_is_rebuilt_and_enforced(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        conn.execute_batch(
            "CREATE TABLE tasks (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                details TEXT,
                creation_dt TEXT,
                completion_dt TEXT,
                status_id INTEGER,
                is_deleted BOOLEAN NOT NULL DEFAULT 0
             );
             INSERT INTO tasks (id, description, creation_dt, status_id) VALUES (1, 'Stretch', '2024-01-01 08:00:00', 2);
             INSERT INTO tasks (id, description, creation_dt, status_id) VALUES (2, 'Orphan', '2024-01-02 08:00:00', 99);",
        )
        .unwrap();

        let report = SchemaManager::new().ensure(&mut conn).unwrap();

        assert!(report.rebuilt);
        assert!(report.added_columns.is_empty());
        assert_eq!(column_names(&conn), CANONICAL_TASK_COLUMNS);
        let keys = foreign_keys(&conn, TASKS_TABLE).unwrap();
        assert!(keys.iter().any(|fk| fk.from == "status_id" && fk.table == "status"));

        let orphan_status: String = conn
            .query_row("SELECT s.name FROM tasks t JOIN status s ON s.id = t.status_id WHERE t.id = 2", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphan_status, "Planned");
        let kept: i64 = conn.query_row("SELECT status_id FROM tasks WHERE id = 1", [], |row| row.get(0)).unwrap();
        assert_eq!(kept, 2);

        let result = conn.execute("INSERT INTO tasks (description, status_id) VALUES ('Invalid', 42)", []);
        assert!(result.is_err());
        assert!(SchemaManager::new().ensure(&mut conn).unwrap().is_noop());
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_id_without_primary_key_is_rebuilt(ctx: &mut SchemaTestContext) {
        {
            let conn = ctx.raw();
            conn.execute_batch(
                "CREATE TABLE status (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
                 INSERT INTO status (name) VALUES ('Planned');
                 CREATE TABLE tasks (
                    id INTEGER,
                    description TEXT NOT NULL,
                    details TEXT,
                    creation_dt TEXT,
                    completion_dt TEXT,
                    status_id INTEGER REFERENCES status(id),
                    is_deleted BOOLEAN NOT NULL DEFAULT 0
                 );
                 INSERT INTO tasks (id, description, creation_dt, status_id) VALUES (NULL, 'No id', '2024-01-01 08:00:00', 1);
                 INSERT INTO tasks (id, description, creation_dt, status_id) VALUES (5, 'Numbered', '2024-01-02 08:00:00', 1);",
            )
            .unwrap();
        }

        let mut conn = ctx.raw();
        let report = SchemaManager::new().ensure(&mut conn).unwrap();
        assert!(report.rebuilt);

        let id_column = table_columns(&conn, TASKS_TABLE).unwrap().into_iter().next().unwrap();
        assert_eq!(id_column.name, "id");
        assert!(id_column.primary_key);
        let missing_ids: i64 = conn.query_row("SELECT COUNT(*) FROM tasks WHERE id IS NULL", [], |row| row.get(0)).unwrap();
        assert_eq!(missing_ids, 0);
        let numbered: String = conn.query_row("SELECT description FROM tasks WHERE id = 5", [], |row| row.get(0)).unwrap();
        assert_eq!(numbered, "Numbered");

        // New tasks are reachable by the id the insert returns
        let mut tasks = Tasks::open(&ctx.db_path).unwrap();
        let id = tasks.insert(&Task::new("Fresh", None, "Planned")).unwrap();
        let fresh = tasks.get_by_id(id).unwrap().unwrap();
        assert_eq!(fresh.description, "Fresh");
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_completion_times_follow_status(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        let manager = SchemaManager::new();
        manager.ensure(&mut conn).unwrap();
        conn.execute_batch(
            "INSERT INTO tasks (description, status_id, completion_dt)
                VALUES ('Finished long ago', (SELECT id FROM status WHERE name = 'Done'), NULL);
             INSERT INTO tasks (description, status_id, completion_dt)
                VALUES ('Reopened', (SELECT id FROM status WHERE name = 'Planned'), '2024-01-01 08:00:00');",
        )
        .unwrap();

        let report = manager.ensure(&mut conn).unwrap();

        assert_eq!(report.normalized_completions, 2);
        assert!(!report.rebuilt);
        let done: Option<String> = conn
            .query_row("SELECT completion_dt FROM tasks WHERE description = 'Finished long ago'", [], |row| row.get(0))
            .unwrap();
        assert!(done.is_some());
        let reopened: Option<String> = conn
            .query_row("SELECT completion_dt FROM tasks WHERE description = 'Reopened'", [], |row| row.get(0))
            .unwrap();
        assert!(reopened.is_none());
        assert!(manager.ensure(&mut conn).unwrap().is_noop());
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_legacy_table_without_id_is_normalized(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        conn.execute_batch(
            "CREATE TABLE tasks (description TEXT, status_id INTEGER);
             INSERT INTO tasks (description, status_id) VALUES ('Meditate', NULL), (NULL, 2);",
        )
        .unwrap();

        let report = SchemaManager::new().ensure(&mut conn).unwrap();

        assert!(report.rebuilt);
        assert_eq!(report.added_columns, vec!["details", "creation_dt", "completion_dt", "is_deleted"]);
        assert_eq!(column_names(&conn), CANONICAL_TASK_COLUMNS);

        let rows: Vec<(i64, String, String, i64)> = {
            let mut stmt = conn.prepare("SELECT id, description, creation_dt, status_id FROM tasks ORDER BY id").unwrap();
            stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
                .unwrap()
                .collect::<Result<Vec<_>, _>>()
                .unwrap()
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1, "Meditate");
        assert_eq!(rows[0].3, 1);
        assert_eq!(rows[1].1, "");
        assert_eq!(rows[1].3, 2);
        assert!(rows.iter().all(|r| r.0 > 0 && !r.2.is_empty()));
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_seeding_keeps_existing_statuses(ctx: &mut SchemaTestContext) {
        let mut conn = ctx.raw();
        conn.execute_batch(
            "CREATE TABLE status (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
             INSERT INTO status (name) VALUES ('Someday'), ('Done');",
        )
        .unwrap();

        let report = SchemaManager::new().ensure(&mut conn).unwrap();

        assert_eq!(report.seeded_statuses, vec!["Planned", "In Progress", "Deferred", "Cancelled"]);
        let names = status_names(&conn);
        assert_eq!(&names[..2], &["Someday".to_string(), "Done".to_string()]);
        assert_eq!(names.len(), 6);
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_failed_migration_rolls_back_and_open_continues(ctx: &mut SchemaTestContext) {
        {
            let conn = ctx.raw();
            conn.execute_batch(
                "CREATE TABLE tasks (description TEXT NOT NULL, id INTEGER PRIMARY KEY);
                 INSERT INTO tasks (description) VALUES ('Journal');
                 CREATE VIEW tasks_rebuild AS SELECT 1;",
            )
            .unwrap();
        }

        let mut conn = ctx.raw();
        assert!(SchemaManager::new().ensure(&mut conn).is_err());

        // Nothing from the failed attempt survives
        assert_eq!(column_names(&conn), vec!["description", "id"]);
        let status_tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'status'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status_tables, 0);

        // Opening through Db still hands out a usable connection
        let db = Db::open(&ctx.db_path).unwrap();
        let count: i64 = db.conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_foreign_keys_are_enforced(ctx: &mut SchemaTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        let result = db.conn.execute("INSERT INTO tasks (description, status_id) VALUES ('Invalid', 42)", []);
        assert!(result.is_err());
    }
}
