//! Interactive list state and key handling.
//!
//! Kept free of terminal I/O so gestures can be driven from tests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklist_core::{StoreError, TaskId, TaskListController, TaskStore};

use super::input::TextInput;

/// Modal dialog currently covering the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// "New Task" prompt.
    Add { input: TextInput },
    /// "Edit item" prompt, prefilled with the current title.
    Edit { id: TaskId, input: TextInput },
    /// Delete confirmation; stands in for the swipe gesture.
    ConfirmDelete { id: TaskId, title: String },
}

/// One-line feedback shown under the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

pub struct App<S: TaskStore> {
    controller: TaskListController<S>,
    selected: usize,
    dialog: Option<Dialog>,
    status: Option<Status>,
    should_quit: bool,
}

impl<S: TaskStore> App<S> {
    pub fn new(controller: TaskListController<S>) -> Self {
        Self {
            controller,
            selected: 0,
            dialog: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &TaskListController<S> {
        &self.controller
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.controller.is_empty()).then_some(self.selected)
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.dialog.take() {
            None => self.handle_list_key(key),
            Some(Dialog::ConfirmDelete { id, title }) => {
                if matches!(key.code, KeyCode::Char('y' | 'Y')) {
                    self.delete(id, &title);
                } else {
                    self.status = None;
                }
            }
            Some(Dialog::Add { mut input }) => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => self.submit_add(input),
                _ => {
                    edit_input(&mut input, key);
                    self.dialog = Some(Dialog::Add { input });
                }
            },
            Some(Dialog::Edit { id, mut input }) => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => self.submit_edit(id, input),
                _ => {
                    edit_input(&mut input, key);
                    self.dialog = Some(Dialog::Edit { id, input });
                }
            },
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.controller.len().saturating_sub(1);
            }
            KeyCode::Char('a' | '+') => {
                self.status = None;
                self.dialog = Some(Dialog::Add {
                    input: TextInput::default(),
                });
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(task) = self.controller.get(self.selected) {
                    self.status = None;
                    self.dialog = Some(Dialog::Edit {
                        id: task.id,
                        input: TextInput::with_text(&task.title),
                    });
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(task) = self.controller.get(self.selected) {
                    self.status = None;
                    self.dialog = Some(Dialog::ConfirmDelete {
                        id: task.id,
                        title: task.title.clone(),
                    });
                }
            }
            KeyCode::Char('r') => match self.controller.reload() {
                Ok(()) => {
                    self.clamp_selection();
                    self.status = Some(Status::Info("Reloaded.".to_string()));
                }
                Err(err) => self.fail(&err),
            },
            _ => {}
        }
    }

    fn submit_add(&mut self, input: TextInput) {
        if input.is_blank() {
            self.status = Some(Status::Error("Task title cannot be empty.".to_string()));
            self.dialog = Some(Dialog::Add { input });
            return;
        }
        match self.controller.add(input.value()) {
            Ok(_) => {
                self.selected = self.controller.len() - 1;
                self.status = Some(Status::Info("Task added.".to_string()));
            }
            Err(err) => {
                self.fail(&err);
                self.dialog = Some(Dialog::Add { input });
            }
        }
    }

    fn submit_edit(&mut self, id: TaskId, input: TextInput) {
        if input.is_blank() {
            self.status = Some(Status::Error("Task title cannot be empty.".to_string()));
            self.dialog = Some(Dialog::Edit { id, input });
            return;
        }
        match self.controller.rename(id, input.value()) {
            Ok(_) => {
                if let Some(index) = self.controller.position(id) {
                    self.selected = index;
                }
                self.status = Some(Status::Info("Task updated.".to_string()));
            }
            Err(StoreError::NotFound(_)) => match self.controller.reload() {
                Ok(()) => {
                    self.clamp_selection();
                    self.status = Some(Status::Error(
                        "That task no longer exists; list reloaded.".to_string(),
                    ));
                }
                Err(err) => {
                    self.status = Some(Status::Error(format!(
                        "That task no longer exists; reload failed: {err}"
                    )));
                }
            },
            Err(err) => {
                self.fail(&err);
                self.dialog = Some(Dialog::Edit { id, input });
            }
        }
    }

    fn delete(&mut self, id: TaskId, title: &str) {
        match self.controller.remove(id) {
            Ok(()) => {
                self.clamp_selection();
                self.status = Some(Status::Info(format!("Deleted \"{title}\".")));
            }
            Err(err) => self.fail(&err),
        }
    }

    fn fail(&mut self, err: &StoreError) {
        self.status = Some(Status::Error(format!("Error: {err}")));
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.controller.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.controller.len().saturating_sub(1));
    }
}

fn edit_input(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(ch),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}
