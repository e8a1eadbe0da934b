use super::add::warn_unknown_status;
use super::open_tasks;
use crate::{libs::messages::Message, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct MarkArgs {
    /// ID of the task
    id: i64,
    /// Status name, e.g. "Done" or "In Progress"
    status: String,
}

pub fn cmd(args: MarkArgs) -> Result<()> {
    let mut tasks = open_tasks()?;

    warn_unknown_status(&tasks, &args.status)?;
    tasks.set_status(args.id, &args.status)?;
    msg_success!(Message::TaskUpdated(args.id));

    Ok(())
}
