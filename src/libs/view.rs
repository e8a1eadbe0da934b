use super::page::{Page, SortColumn, SortDirection, SortState};
use super::status::Status;
use super::task::Task;
use crate::db::schema::ColumnInfo;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints a task page with sort markers on the active header and the
    /// pagination footer.
    pub fn page(page: &Page, sort: &SortState) -> Result<()> {
        let mut table = Table::new();

        table.set_titles(row![
            Self::header("ID", SortColumn::Id, sort),
            Self::header("TASK", SortColumn::Description, sort),
            Self::header("DETAILS", SortColumn::Details, sort),
            Self::header("CREATED", SortColumn::Created, sort),
            Self::header("COMPLETED", SortColumn::Completed, sort),
            Self::header("STATUS", SortColumn::Status, sort)
        ]);
        for task in &page.tasks {
            Self::add_task_row(&mut table, task);
        }
        table.printstd();
        println!("{}", page.label());

        Ok(())
    }

    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let mut table = Table::new();

        table.set_titles(row!["ID", "TASK", "DETAILS", "CREATED", "COMPLETED", "STATUS"]);
        for task in tasks {
            Self::add_task_row(&mut table, task);
        }
        table.printstd();

        Ok(())
    }

    pub fn statuses(statuses: &[Status]) -> Result<()> {
        let mut table = Table::new();

        table.set_titles(row!["ID", "NAME"]);
        for status in statuses {
            table.add_row(row![status.id, status.name]);
        }
        table.printstd();

        Ok(())
    }

    pub fn columns(columns: &[ColumnInfo]) -> Result<()> {
        let mut table = Table::new();

        table.set_titles(row!["#", "COLUMN", "TYPE", "NOT NULL", "PK"]);
        for (position, column) in columns.iter().enumerate() {
            let not_null = if column.not_null { "yes" } else { "" };
            let primary_key = if column.primary_key { "yes" } else { "" };
            table.add_row(row![position, column.name, column.decl_type, not_null, primary_key]);
        }
        table.printstd();

        Ok(())
    }

    fn add_task_row(table: &mut Table, task: &Task) {
        table.add_row(row![
            task.id.unwrap_or(0),
            task.description,
            task.details.as_deref().unwrap_or(""),
            task.creation_dt.as_deref().unwrap_or(""),
            task.completion_dt.as_deref().unwrap_or(""),
            task.status
        ]);
    }

    fn header(title: &str, column: SortColumn, sort: &SortState) -> String {
        match (sort.column, sort.direction) {
            (Some(active), SortDirection::Asc) if active == column => format!("{} ▲", title),
            (Some(active), SortDirection::Desc) if active == column => format!("{} ▼", title),
            _ => title.to_string(),
        }
    }
}
