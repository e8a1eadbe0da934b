#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDateTime};
    use sitrack::db::tasks::{Tasks, TIMESTAMP_FORMAT};
    use sitrack::libs::error::TrackerError;
    use sitrack::libs::page::PageRequest;
    use sitrack::libs::task::Task;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TaskTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("tracker.db");
            TaskTestContext { _temp_dir: temp_dir, db_path }
        }
    }

    impl TaskTestContext {
        fn tasks(&self) -> Tasks {
            Tasks::open(&self.db_path).unwrap()
        }
    }

    fn assert_recent(timestamp: &str) {
        let parsed = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).unwrap();
        let age = Local::now().naive_local() - parsed;
        assert!(age.num_seconds().abs() < 60, "timestamp {} is not current", timestamp);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_insert_sets_creation_time_and_default_status(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();

        let id = tasks.insert(&Task::new("Morning run", Some("5 km"), "Planned")).unwrap();
        let task = tasks.get_by_id(id).unwrap().unwrap();

        assert_eq!(task.description, "Morning run");
        assert_eq!(task.details.as_deref(), Some("5 km"));
        assert_eq!(task.status, "Planned");
        assert!(!task.is_deleted);
        assert!(task.completion_dt.is_none());
        assert_recent(task.creation_dt.as_deref().unwrap());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_insert_done_task_is_completed(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();

        let id = tasks.insert(&Task::new("Already finished", None, "Done")).unwrap();
        let task = tasks.get_by_id(id).unwrap().unwrap();

        assert!(task.is_completed());
        assert_recent(task.completion_dt.as_deref().unwrap());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_insert_rejects_blank_description(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();

        let result = tasks.insert(&Task::new("   ", None, "Planned"));
        assert!(matches!(result, Err(TrackerError::EmptyDescription)));
        assert_eq!(tasks.count().unwrap(), 0);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_unknown_status_falls_back_to_default_by_name(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();

        // Recreate the default status under a new id
        tasks.conn.execute("DELETE FROM status WHERE name = 'Planned'", []).unwrap();
        tasks.conn.execute("INSERT INTO status (name) VALUES ('Planned')", []).unwrap();
        let planned = tasks.status_by_name("Planned").unwrap().unwrap();
        assert_ne!(planned.id, 1);

        let id = tasks.insert(&Task::new("Learn Go", None, "Someday")).unwrap();
        let task = tasks.get_by_id(id).unwrap().unwrap();

        assert_eq!(task.status_id, Some(planned.id));
        assert_eq!(task.status, "Planned");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_unknown_status_without_default_fails(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();
        tasks.conn.execute("DELETE FROM status WHERE name = 'Planned'", []).unwrap();

        let result = tasks.insert(&Task::new("Learn Go", None, "Someday"));
        assert!(matches!(result, Err(TrackerError::StatusNotFound(name)) if name == "Someday"));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_update_manages_completion_time(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();
        let id = tasks.insert(&Task::new("Write blog post", None, "In Progress")).unwrap();

        // Entering Done stamps the completion time
        let mut task = tasks.get_by_id(id).unwrap().unwrap();
        task.status = "Done".to_string();
        tasks.update(&task).unwrap();
        let done = tasks.get_by_id(id).unwrap().unwrap();
        assert_recent(done.completion_dt.as_deref().unwrap());

        // Editing a finished task keeps its completion time
        tasks.conn.execute("UPDATE tasks SET completion_dt = '2024-03-01 12:00:00' WHERE id = ?1", [id]).unwrap();
        let mut task = tasks.get_by_id(id).unwrap().unwrap();
        task.details = Some("Published".to_string());
        tasks.update(&task).unwrap();
        let edited = tasks.get_by_id(id).unwrap().unwrap();
        assert_eq!(edited.completion_dt.as_deref(), Some("2024-03-01 12:00:00"));
        assert_eq!(edited.details.as_deref(), Some("Published"));

        // Any other status clears it
        let mut task = edited;
        task.status = "Deferred".to_string();
        tasks.update(&task).unwrap();
        let reopened = tasks.get_by_id(id).unwrap().unwrap();
        assert!(reopened.completion_dt.is_none());
        assert_eq!(reopened.status, "Deferred");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_editing_done_task_without_completion_time_stamps_it(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();
        let id = tasks.insert(&Task::new("Old finished task", None, "Done")).unwrap();
        tasks.conn.execute("UPDATE tasks SET completion_dt = NULL WHERE id = ?1", [id]).unwrap();

        let mut task = tasks.get_by_id(id).unwrap().unwrap();
        task.details = Some("Imported".to_string());
        tasks.update(&task).unwrap();

        let edited = tasks.get_by_id(id).unwrap().unwrap();
        assert_recent(edited.completion_dt.as_deref().unwrap());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_set_status_stamps_and_clears_completion(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();
        let id = tasks.insert(&Task::new("Call grandma", None, "Planned")).unwrap();

        let status = tasks.set_status(id, "Done").unwrap();
        assert_eq!(status.name, "Done");
        let task = tasks.get_by_id(id).unwrap().unwrap();
        assert_recent(task.completion_dt.as_deref().unwrap());

        tasks.set_status(id, "Cancelled").unwrap();
        let task = tasks.get_by_id(id).unwrap().unwrap();
        assert!(task.completion_dt.is_none());
        assert_eq!(task.status, "Cancelled");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_soft_delete_hides_task_until_restored(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();
        let keep = tasks.insert(&Task::new("Keep", None, "Planned")).unwrap();
        let hide = tasks.insert(&Task::new("Hide", None, "Planned")).unwrap();

        tasks.soft_delete(hide).unwrap();

        assert_eq!(tasks.count().unwrap(), 1);
        let page = tasks.page(&PageRequest::default()).unwrap();
        assert_eq!(page.tasks.iter().map(|t| t.id.unwrap()).collect::<Vec<_>>(), vec![keep]);

        let hidden = tasks.get_by_id(hide).unwrap().unwrap();
        assert!(hidden.is_deleted);
        let trash = tasks.deleted().unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].id, Some(hide));

        tasks.restore(hide).unwrap();
        assert_eq!(tasks.count().unwrap(), 2);
        assert!(tasks.deleted().unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_hard_delete_removes_row(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();
        let id = tasks.insert(&Task::new("Temporary", None, "Planned")).unwrap();
        tasks.soft_delete(id).unwrap();

        tasks.hard_delete(id).unwrap();

        assert!(tasks.get_by_id(id).unwrap().is_none());
        assert!(tasks.deleted().unwrap().is_empty());
        let rows: i64 = tasks.conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0)).unwrap();
        assert_eq!(rows, 0);
        assert!(matches!(tasks.hard_delete(id), Err(TrackerError::TaskNotFound(missing)) if missing == id));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_missing_task_operations_fail(ctx: &mut TaskTestContext) {
        let mut tasks = ctx.tasks();

        let mut ghost = Task::new("Ghost", None, "Planned");
        assert!(matches!(tasks.update(&ghost), Err(TrackerError::UnsavedTask)));

        ghost.id = Some(404);
        assert!(matches!(tasks.update(&ghost), Err(TrackerError::TaskNotFound(404))));
        assert!(matches!(tasks.soft_delete(404), Err(TrackerError::TaskNotFound(404))));
        assert!(matches!(tasks.set_status(404, "Done"), Err(TrackerError::TaskNotFound(404))));
    }
}
