use super::add::{prompt_status, warn_unknown_status};
use super::open_tasks;
use crate::{
    db::tasks::Tasks,
    libs::{messages::Message, task::Task, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// ID of the task to edit
    id: i64,
    /// New description
    #[arg(short = 'D', long)]
    description: Option<String>,
    /// New details; pass an empty string to clear them
    #[arg(short, long)]
    details: Option<String>,
    /// New status name
    #[arg(short, long)]
    status: Option<String>,
}

pub fn cmd(args: EditArgs) -> Result<()> {
    let mut tasks = open_tasks()?;

    let Some(current) = tasks.get_by_id(args.id)? else {
        msg_error!(Message::TaskNotFoundWithId(args.id));
        return Ok(());
    };

    let interactive = args.description.is_none() && args.details.is_none() && args.status.is_none();
    let edited = if interactive {
        prompt_changes(&tasks, &current)?
    } else {
        let mut edited = current.clone();
        if let Some(description) = args.description {
            edited.description = description;
        }
        if let Some(details) = args.details {
            edited.details = Some(details).filter(|d| !d.trim().is_empty());
        }
        if let Some(status) = args.status {
            warn_unknown_status(&tasks, &status)?;
            edited.status = status;
        }
        edited
    };

    if edited == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    tasks.update(&edited)?;
    msg_success!(Message::TaskUpdated(args.id));

    Ok(())
}

fn prompt_changes(tasks: &Tasks, current: &Task) -> Result<Task> {
    let theme = ColorfulTheme::default();

    msg_print!(Message::CurrentTaskState, true);
    View::tasks(std::slice::from_ref(current))?;

    let description: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptTaskDescription.to_string())
        .default(current.description.clone())
        .interact_text()?;

    let details: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptTaskDetails.to_string())
        .default(current.details.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let status = prompt_status(tasks, &current.status)?;

    let mut edited = current.clone();
    edited.description = description;
    edited.details = Some(details).filter(|d| !d.trim().is_empty());
    edited.status = status;
    Ok(edited)
}
