//! `tasklist` entry point: a SQLite-backed to-do list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tasklist_core::db::open_db;
use tasklist_core::{init_logging, SqliteTaskStore, TaskId, TaskListController};

mod commands;
mod config;
mod tui;

use config::{Settings, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};

/// A single list of to-do items kept in a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "tasklist", version)]
struct Cli {
    /// Database file (created on first use).
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// Directory for rolling log files.
    #[arg(long, global = true, env = LOG_DIR_ENV)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = LOG_LEVEL_ENV)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive list (default).
    Ui,

    /// Print tasks in display order.
    List {
        /// Emit JSON instead of numbered lines.
        #[arg(long)]
        json: bool,
    },

    /// Create a task.
    Add { title: String },

    /// Rename a task.
    Edit { id: TaskId, title: String },

    /// Delete a task.
    Rm { id: TaskId },

    /// Print one task.
    Show { id: TaskId },

    /// Check that the core library is linked.
    Ping,
}

fn main() -> Result<()> {
    let Cli {
        db,
        log_dir,
        log_level,
        cmd,
    } = Cli::parse();
    let cmd = cmd.unwrap_or(Command::Ui);

    if let Command::Ping = cmd {
        println!("tasklist_core ping={}", tasklist_core::ping());
        println!("tasklist_core version={}", tasklist_core::core_version());
        return Ok(());
    }

    let settings = Settings::resolve(db, log_dir, log_level)?;
    settings.ensure_db_dir()?;
    if let Err(err) = init_logging(settings.log_level.as_str(), &settings.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let conn = open_db(&settings.db_path)
        .with_context(|| format!("failed to open `{}`", settings.db_path.display()))?;
    let store = SqliteTaskStore::try_new(&conn)?;
    let controller = TaskListController::load(store)?;

    match cmd {
        Command::Ui => tui::run(controller),
        other => {
            let mut stdout = std::io::stdout().lock();
            commands::run(other, controller, &mut stdout)
        }
    }
}
