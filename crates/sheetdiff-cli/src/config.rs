//! Configuration loading for the sheetdiff CLI.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default width at which cell text is cut in diff output
pub const DEFAULT_MAX_CELL_WIDTH: usize = 40;

/// Settings read from `config.toml`
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// History database file
    pub database: Option<PathBuf>,
    /// Field delimiter for CSV inputs
    pub csv_delimiter: Option<char>,
    /// Longest cell text shown in diff output
    pub max_cell_width: Option<usize>,
}

impl Config {
    pub fn max_cell_width(&self) -> usize {
        self.max_cell_width.unwrap_or(DEFAULT_MAX_CELL_WIDTH)
    }

    /// CSV delimiter as a byte; only ASCII delimiters are usable
    pub fn csv_delimiter(&self) -> Result<Option<u8>> {
        match self.csv_delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => anyhow::bail!("CSV delimiter must be ASCII, got {:?}", c),
        }
    }

    /// Database path: explicit flag or env, then config, then the data dir
    pub fn database_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        Ok(project_dirs()?.data_dir().join("history.db"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "sheetdiff").context("Could not determine home directory")
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}
