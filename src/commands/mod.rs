pub mod add;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod mark;
pub mod restore;
pub mod schema;
pub mod statuses;
pub mod trash;

use crate::db::tasks::Tasks;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Add a task")]
    Add(add::AddArgs),
    #[command(about = "Edit a task")]
    Edit(edit::EditArgs),
    #[command(about = "Move a task to another status")]
    Mark(mark::MarkArgs),
    #[command(about = "Show a page of tasks")]
    List(list::ListArgs),
    #[command(about = "Move a task to the trash, or delete it permanently")]
    Delete(delete::DeleteArgs),
    #[command(about = "Bring a task back from the trash")]
    Restore(restore::RestoreArgs),
    #[command(about = "Show tasks in the trash")]
    Trash,
    #[command(about = "Show available statuses")]
    Statuses,
    #[command(about = "Check and repair the database schema")]
    Schema,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Add(args) => add::cmd(args),
            Commands::Edit(args) => edit::cmd(args),
            Commands::Mark(args) => mark::cmd(args),
            Commands::List(args) => list::cmd(args),
            Commands::Delete(args) => delete::cmd(args),
            Commands::Restore(args) => restore::cmd(args),
            Commands::Trash => trash::cmd(),
            Commands::Statuses => statuses::cmd(),
            Commands::Schema => schema::cmd(),
        }
    }
}

/// Opens the task repository, turning a connection failure into a
/// user-facing error.
pub(crate) fn open_tasks() -> Result<Tasks> {
    Tasks::new().map_err(|e| msg_error_anyhow!(Message::DbConnectionFailed(e.to_string())))
}
