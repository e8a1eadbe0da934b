use crate::{
    db::{
        db::Db,
        schema::{table_columns, SchemaManager, TASKS_TABLE},
    },
    libs::{config::Config, messages::Message, view::View},
    msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let db_path = Config::read()?.db_path()?;
    let mut db = Db::open_without_schema(&db_path).map_err(|e| msg_error_anyhow!(Message::DbConnectionFailed(e.to_string())))?;
    msg_print!(Message::DbPath(db_path.display().to_string()));

    match SchemaManager::new().ensure(&mut db.conn) {
        Ok(report) if report.is_noop() => msg_info!(Message::SchemaUpToDate),
        Ok(report) => {
            for table in report.created_tables {
                msg_success!(Message::SchemaTableCreated(table));
            }
            for column in report.added_columns {
                msg_success!(Message::SchemaColumnAdded(TASKS_TABLE.to_string(), column));
            }
            if report.rebuilt {
                msg_success!(Message::SchemaTableRebuilt(TASKS_TABLE.to_string()));
            }
            for status in report.seeded_statuses {
                msg_success!(Message::SchemaStatusSeeded(status));
            }
            if report.normalized_completions > 0 {
                msg_success!(Message::SchemaCompletionsNormalized(report.normalized_completions));
            }
        }
        Err(e) => msg_warning!(Message::SchemaMigrationFailed(e.to_string())),
    }

    msg_print!(Message::SchemaColumnsHeader(TASKS_TABLE.to_string()), true);
    View::columns(&table_columns(&db.conn, TASKS_TABLE)?)?;

    Ok(())
}
