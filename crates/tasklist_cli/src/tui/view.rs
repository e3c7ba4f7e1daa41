//! Rendering for the list screen and its dialogs.

use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tasklist_core::TaskStore;

use super::app::{App, Dialog, Status};
use super::input::TextInput;

const SCREEN_TITLE: &str = "Task List";
const HEADER_BG: Color = Color::Rgb(21, 101, 192);
const HELP: &str = "a add · enter edit · d delete · r reload · q quit";

pub fn draw<S: TaskStore>(f: &mut Frame<'_>, app: &App<S>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {SCREEN_TITLE}"),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(HEADER_BG));
    f.render_widget(title, header);

    draw_list(f, body, app);
    draw_footer(f, footer, app);

    match app.dialog() {
        Some(Dialog::Add { input }) => {
            draw_prompt(f, "New Task", "What do you want to do?", input);
        }
        Some(Dialog::Edit { input, .. }) => {
            draw_prompt(f, "Edit item", "Edit your item", input);
        }
        Some(Dialog::ConfirmDelete { title, .. }) => draw_confirm(f, title),
        None => {}
    }
}

fn draw_list<S: TaskStore>(f: &mut Frame<'_>, area: Rect, app: &App<S>) {
    let tasks = app.controller().tasks();
    if tasks.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No tasks yet. Press `a` to add one.",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'_>> = tasks
        .iter()
        .map(|task| ListItem::new(Line::from(task.title.as_str())))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(HEADER_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(app.selected());
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_footer<S: TaskStore>(f: &mut Frame<'_>, area: Rect, app: &App<S>) {
    let line = match app.status() {
        Some(Status::Error(message)) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        )),
        Some(Status::Info(message)) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_prompt(f: &mut Frame<'_>, title: &str, message: &str, input: &TextInput) {
    let area = centered(f.area(), 50, 6);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Clear, area);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [message_area, input_area, _, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(message), message_area);
    let field = if input.value().is_empty() {
        Line::from(Span::styled("New Task", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(input.value())
    };
    let scroll = cursor_scroll(input.cursor(), input_area.width);
    f.render_widget(Paragraph::new(field).scroll((0, scroll)), input_area);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "enter save · esc cancel",
            Style::default().fg(Color::DarkGray),
        ))),
        hint_area,
    );

    let column = u16::try_from(input.cursor()).unwrap_or(u16::MAX) - scroll;
    f.set_cursor_position(Position::new(input_area.x + column, input_area.y));
}

fn draw_confirm(f: &mut Frame<'_>, title: &str) {
    let area = centered(f.area(), 50, 4);
    let block = Block::default()
        .title("Delete task")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    f.render_widget(Clear, area);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(format!("Delete \"{title}\"?")),
        Line::from(Span::styled(
            "y confirm · any other key cancels",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn cursor_scroll(cursor: usize, width: u16) -> u16 {
    let cursor = u16::try_from(cursor).unwrap_or(u16::MAX);
    cursor.saturating_sub(width.saturating_sub(1))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::{centered, cursor_scroll, draw};
    use crate::tui::app::App;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;
    use tasklist_core::db::open_db_in_memory;
    use tasklist_core::{SqliteTaskStore, TaskListController, TaskStore};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_titles_and_add_dialog() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteTaskStore::try_new(&conn).unwrap();
        store.create("Buy milk").unwrap();
        let mut app = App::new(TaskListController::load(&store).unwrap());
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();

        terminal.draw(|f| draw(f, &app)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Task List"));
        assert!(text.contains("Buy milk"));

        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        terminal.draw(|f| draw(f, &app)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("New Task"));
        assert!(text.contains("What do you want to do?"));
    }

    #[test]
    fn centered_clamps_to_small_areas() {
        let rect = centered(Rect::new(0, 0, 20, 3), 50, 6);
        assert_eq!(rect, Rect::new(0, 0, 20, 3));
        assert_eq!(cursor_scroll(3, 10), 0);
        assert_eq!(cursor_scroll(15, 10), 6);
    }
}
