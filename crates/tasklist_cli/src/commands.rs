//! One-shot subcommands.

use std::io::Write;

use anyhow::{anyhow, Result};
use tasklist_core::{TaskListController, TaskStore};

use crate::Command;

/// Executes a non-interactive command and writes its report to `out`.
pub fn run<S: TaskStore, W: Write>(
    command: Command,
    mut controller: TaskListController<S>,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::List { json } => {
            if json {
                serde_json::to_writer_pretty(&mut *out, controller.tasks())?;
                writeln!(out)?;
            } else if controller.is_empty() {
                writeln!(out, "No tasks.")?;
            } else {
                for (index, task) in controller.tasks().iter().enumerate() {
                    writeln!(out, "{}. {}", index + 1, task.title)?;
                }
            }
        }
        Command::Add { title } => {
            let task = controller.add(&title)?;
            writeln!(out, "{}", task.id)?;
        }
        Command::Edit { id, title } => {
            let task = controller.rename(id, &title)?;
            writeln!(out, "{}\t{}", task.id, task.title)?;
        }
        Command::Rm { id } => {
            controller.remove(id)?;
            writeln!(out, "deleted {id}")?;
        }
        Command::Show { id } => {
            let task = controller
                .store()
                .get(id)?
                .ok_or_else(|| anyhow!("task not found: {id}"))?;
            writeln!(out, "id:      {}", task.id)?;
            writeln!(out, "title:   {}", task.title)?;
            writeln!(out, "created: {}", task.created_at)?;
            writeln!(out, "updated: {}", task.updated_at)?;
        }
        Command::Ui | Command::Ping => {
            return Err(anyhow!("command is not a one-shot subcommand"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::Command;
    use tasklist_core::db::open_db_in_memory;
    use tasklist_core::{SqliteTaskStore, TaskListController, TaskStore};

    fn output(command: Command, store: &SqliteTaskStore<'_>) -> anyhow::Result<String> {
        let controller = TaskListController::load(store)?;
        let mut buf = Vec::new();
        run(command, controller, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn list_prints_numbered_titles_in_order() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteTaskStore::try_new(&conn).unwrap();
        assert_eq!(output(Command::List { json: false }, &store).unwrap(), "No tasks.\n");

        store.create("Buy milk").unwrap();
        store.create("Walk dog").unwrap();

        let text = output(Command::List { json: false }, &store).unwrap();
        assert_eq!(text, "1. Buy milk\n2. Walk dog\n");
    }

    #[test]
    fn add_edit_rm_round_through_the_store() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteTaskStore::try_new(&conn).unwrap();

        let id = output(
            Command::Add {
                title: "Buy milk".to_string(),
            },
            &store,
        )
        .unwrap();
        let id = id.trim().parse().unwrap();

        output(
            Command::Edit {
                id,
                title: "Buy oat milk".to_string(),
            },
            &store,
        )
        .unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().title, "Buy oat milk");

        let shown = output(Command::Show { id }, &store).unwrap();
        assert!(shown.contains("Buy oat milk"));

        output(Command::Rm { id }, &store).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());
        assert!(output(Command::Rm { id }, &store).is_err());
    }

    #[test]
    fn list_json_is_machine_readable() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteTaskStore::try_new(&conn).unwrap();
        let task = store.create("json me").unwrap();

        let text = output(Command::List { json: true }, &store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["id"], task.id.to_string());
        assert_eq!(value[0]["title"], "json me");
    }

    #[test]
    fn blank_add_is_rejected() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteTaskStore::try_new(&conn).unwrap();

        let err = output(
            Command::Add {
                title: "  ".to_string(),
            },
            &store,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
