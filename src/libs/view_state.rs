//! Persistence of the list view between invocations.
//!
//! The CLI is not long-running, so the pager (current page, page size and
//! sort) is written to `view.json` after every `list` and read back on the
//! next one. Clicking the same sort column twice therefore works across runs.

use super::config::Config;
use super::data_storage::DataStorage;
use super::page::{Pager, SortDirection, SortState};
use anyhow::Result;
use std::fs::{self, File};

pub const VIEW_STATE_FILE_NAME: &str = "view.json";

pub struct ViewState;

impl ViewState {
    /// Loads the saved pager, or builds one from the configuration defaults.
    pub fn load(config: &Config) -> Result<Pager> {
        let path = DataStorage::new().get_path(VIEW_STATE_FILE_NAME)?;
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<Pager>(&content) {
                Ok(pager) => return Ok(pager),
                Err(e) => tracing::warn!(error = %e, "ignoring unreadable view state"),
            }
        }
        Ok(Self::initial(config))
    }

    pub fn initial(config: &Config) -> Pager {
        let mut pager = Pager::new(config.page_size);
        if let Some(column) = config.default_sort {
            pager.sort = SortState::new(column, SortDirection::Asc);
        }
        pager
    }

    pub fn save(pager: &Pager) -> Result<()> {
        let path = DataStorage::new().get_path(VIEW_STATE_FILE_NAME)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(&file, pager)?;
        Ok(())
    }
}
