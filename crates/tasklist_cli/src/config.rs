//! Runtime configuration for the `tasklist` binary.
//!
//! Precedence for every setting: command-line flag, then environment
//! variable, then platform default.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tasklist_core::{default_log_level, LogLevel};

pub const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";
pub const LOG_DIR_ENV: &str = "TASKLIST_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TASKLIST_LOG_LEVEL";

const APP_DIR_NAME: &str = "tasklist";
const DB_FILE_NAME: &str = "tasks.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: LogLevel,
}

impl Settings {
    /// Resolves settings from flag values; `None` falls back to defaults.
    ///
    /// Paths are made absolute against the current directory.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        Self::resolve_in(&cwd, db_path, log_dir, log_level)
    }

    fn resolve_in(
        cwd: &Path,
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self> {
        let db_path = cwd.join(db_path.unwrap_or_else(default_db_path));
        let log_dir = match log_dir {
            Some(dir) => cwd.join(dir),
            None => db_path
                .parent()
                .map_or_else(|| cwd.join(LOG_DIR_NAME), |parent| parent.join(LOG_DIR_NAME)),
        };
        let log_level = match log_level {
            Some(raw) => raw.parse::<LogLevel>().map_err(anyhow::Error::msg)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }

    /// Creates the directory holding the database file.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(DB_FILE_NAME)
}
