use super::open_tasks;
use crate::{
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let tasks = open_tasks()?;

    msg_print!(Message::StatusesHeader, true);
    View::statuses(&tasks.statuses()?)?;

    Ok(())
}
