//! Interactive terminal front-end.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use tasklist_core::{TaskListController, TaskStore};

mod app;
mod input;
mod view;

use self::app::App;

/// Runs the list screen until the user quits.
///
/// The terminal is restored even when the loop fails.
pub fn run<S: TaskStore>(controller: TaskListController<S>) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(
        "event=ui_start module=tui status=ok count={}",
        controller.len()
    );
    let result = run_event_loop(&mut terminal, App::new(controller));

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_event_loop<S: TaskStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| view::draw(f, &app))?;
        if app.should_quit() {
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
}
