use super::open_tasks;
use crate::{libs::messages::Message, msg_error, msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// ID of the task to delete
    id: i64,
    /// Remove the task permanently instead of moving it to the trash
    #[arg(long)]
    hard: bool,
    /// Skip the confirmation prompt for permanent deletion
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(args: DeleteArgs) -> Result<()> {
    let mut tasks = open_tasks()?;

    let Some(task) = tasks.get_by_id(args.id)? else {
        msg_error!(Message::TaskNotFoundWithId(args.id));
        return Ok(());
    };

    if !args.hard {
        tasks.soft_delete(args.id)?;
        msg_success!(Message::TaskSoftDeleted(args.id));
        return Ok(());
    }

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmHardDelete(task.description).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    tasks.hard_delete(args.id)?;
    msg_success!(Message::TaskHardDeleted(args.id));

    Ok(())
}
