use super::open_tasks;
use crate::{
    db::tasks::Tasks,
    libs::{
        messages::Message,
        status::DEFAULT_STATUS,
        task::Task,
    },
    msg_bail_anyhow, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Select};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task description; prompts for all fields when omitted
    description: Option<String>,
    /// Longer notes for the task
    #[arg(short, long)]
    details: Option<String>,
    /// Status name (defaults to "Planned")
    #[arg(short, long)]
    status: Option<String>,
}

pub fn cmd(args: AddArgs) -> Result<()> {
    let mut tasks = open_tasks()?;

    let task = match args.description {
        Some(description) => {
            let status = args.status.unwrap_or_else(|| DEFAULT_STATUS.to_string());
            warn_unknown_status(&tasks, &status)?;
            Task::new(&description, args.details.as_deref(), &status)
        }
        None => prompt_task(&tasks, args.details, args.status)?,
    };

    let id = tasks.insert(&task)?;
    msg_success!(Message::TaskCreated(id));

    Ok(())
}

fn prompt_task(tasks: &Tasks, details: Option<String>, status: Option<String>) -> Result<Task> {
    let theme = ColorfulTheme::default();

    let description: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptTaskDescription.to_string())
        .interact_text()?;
    if description.trim().is_empty() {
        msg_bail_anyhow!(Message::OperationCancelled);
    }

    let details: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptTaskDetails.to_string())
        .default(details.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let status = prompt_status(tasks, status.as_deref().unwrap_or(DEFAULT_STATUS))?;

    Ok(Task::new(&description, Some(&details), &status))
}

/// Lets the user pick a status, preselecting `current`.
pub(crate) fn prompt_status(tasks: &Tasks, current: &str) -> Result<String> {
    let names: Vec<String> = tasks.statuses()?.into_iter().map(|s| s.name).collect();
    if names.is_empty() {
        return Ok(current.to_string());
    }

    let default = names.iter().position(|name| name == current).unwrap_or(0);
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskStatus.to_string())
        .items(&names)
        .default(default)
        .interact()?;

    Ok(names[selection].clone())
}

/// Warns when `status` will be replaced by the default status on save.
pub(crate) fn warn_unknown_status(tasks: &Tasks, status: &str) -> Result<()> {
    if tasks.status_by_name(status)?.is_none() {
        msg_warning!(Message::StatusFallback(status.to_string(), DEFAULT_STATUS.to_string()));
    }
    Ok(())
}
