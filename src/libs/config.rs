//! Application configuration.
//!
//! Settings are stored as pretty-printed JSON in the platform data directory
//! (see [`DataStorage`]). A missing file is not an error: defaults apply until
//! the user runs `sitrack init`.
//!
//! ## Database location
//!
//! The database path is resolved in this order:
//!
//! 1. `SITRACK_DB` environment variable (a `.env` file is honored at startup)
//! 2. `db_path` from `config.json`
//! 3. `tracker.db` inside the data directory
//!
//! ```rust,no_run
//! use sitrack::libs::config::Config;
//!
//! let config = Config::read()?;
//! let db_file = config.db_path()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use super::page::{PageSize, SortColumn, PAGE_SIZE_CHOICES};
use crate::libs::messages::Message;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "tracker.db";
pub const DB_PATH_ENV: &str = "SITRACK_DB";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Explicit database file; `None` means the data directory default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Initial page size for the task list.
    pub page_size: PageSize,

    /// Sort applied when the list view has no saved state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortColumn>,
}

impl Config {
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns `false` when there was none.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(path) = env::var_os(DB_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        DataStorage::new().get_path(DB_FILE_NAME)
    }

    /// Interactive setup, pre-filled with the current configuration.
    pub fn init() -> Result<Self> {
        let current = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let db_path: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptDbPath.to_string())
            .default(current.db_path.as_ref().map(|p| p.display().to_string()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        let size_index = PAGE_SIZE_CHOICES.iter().position(|s| *s == current.page_size.get()).unwrap_or(0);
        let size_selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptPageSize.to_string())
            .items(&PAGE_SIZE_CHOICES)
            .default(size_index)
            .interact()?;

        let mut sort_items = vec!["newest first".to_string()];
        sort_items.extend(SortColumn::ALL.iter().map(|c| c.to_string()));
        let sort_index = current
            .default_sort
            .and_then(|s| SortColumn::ALL.iter().position(|c| *c == s))
            .map(|i| i + 1)
            .unwrap_or(0);
        let sort_selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptDefaultSort.to_string())
            .items(&sort_items)
            .default(sort_index)
            .interact()?;

        Ok(Config {
            db_path: if db_path.trim().is_empty() { None } else { Some(PathBuf::from(db_path.trim())) },
            page_size: PageSize::new(PAGE_SIZE_CHOICES[size_selection])?,
            default_sort: sort_selection.checked_sub(1).map(|i| SortColumn::ALL[i]),
        })
    }
}
