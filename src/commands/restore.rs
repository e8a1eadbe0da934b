use super::open_tasks;
use crate::{libs::messages::Message, msg_error, msg_info, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// ID of the task to restore
    id: i64,
}

pub fn cmd(args: RestoreArgs) -> Result<()> {
    let mut tasks = open_tasks()?;

    match tasks.get_by_id(args.id)? {
        None => msg_error!(Message::TaskNotFoundWithId(args.id)),
        Some(task) if !task.is_deleted => msg_info!(Message::TaskNotDeleted(args.id)),
        Some(_) => {
            tasks.restore(args.id)?;
            msg_success!(Message::TaskRestored(args.id));
        }
    }

    Ok(())
}
