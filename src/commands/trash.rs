use super::open_tasks;
use crate::{
    libs::{messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let mut tasks = open_tasks()?;
    let deleted = tasks.deleted()?;

    if deleted.is_empty() {
        msg_info!(Message::TrashEmpty);
        return Ok(());
    }

    msg_print!(Message::TrashHeader, true);
    View::tasks(&deleted)?;

    Ok(())
}
