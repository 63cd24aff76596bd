use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::dialog::{Dialog, DialogResult, Intent};
use crate::store::TaskStore;
use crate::tasks::{ActionError, Controller, MSG_BUSY, MSG_LOADING};
use crate::view::{self, Filter, ListView};

use super::event::{self, AppEvent};
use super::form;
use super::keymap::{Action, KeyMap};
use super::theme::Theme;
use super::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

/// A store-touching operation waiting for the next frame, so the busy state
/// is on screen before the blocking call starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load,
    Add(String),
    Toggle(String),
    Confirmed {
        intent: Intent,
        value: Option<String>,
    },
}

pub struct App<S> {
    pub controller: Controller<S>,
    pub dialog: Dialog,
    pub keymap: KeyMap,
    pub theme: Theme,
    pub focus: Focus,
    pub input: String,
    pub input_cursor: usize,
    /// Index into the visible (filtered) rows.
    pub selected: usize,
    pub show_help: bool,
    pub should_quit: bool,
    queued: Option<Command>,
}

impl<S: TaskStore> App<S> {
    pub fn new(controller: Controller<S>, theme: Theme) -> Self {
        let mut app = App {
            controller,
            dialog: Dialog::default(),
            keymap: KeyMap::default_keymap(),
            theme,
            focus: Focus::Input,
            input: String::new(),
            input_cursor: 0,
            selected: 0,
            show_help: false,
            should_quit: false,
            queued: None,
        };
        app.queue(Command::Load);
        app
    }

    /// Busy while an operation is queued or running.
    pub fn is_busy(&self) -> bool {
        self.queued.is_some() || self.controller.is_busy()
    }

    pub fn view(&self) -> ListView {
        let state = self.controller.state();
        view::build(&state.tasks, state.filter, self.is_busy())
    }

    fn selected_id(&self) -> Option<String> {
        self.view().rows.get(self.selected).map(|r| r.id.clone())
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let poll_timeout = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if self.queued.is_some() {
                self.run_queued();
                continue;
            }

            if let AppEvent::Key(key) = event::poll(poll_timeout)? {
                self.handle_key(key.code, key.modifiers);
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Execute the queued command, if any. Errors have already been turned
    /// into on-screen messages by the controller.
    pub fn run_queued(&mut self) {
        let Some(command) = self.queued.take() else {
            return;
        };
        let result = match &command {
            Command::Load => self.controller.load(),
            Command::Add(text) => {
                let result = self.controller.add(text);
                if result.is_ok() {
                    self.input.clear();
                    self.input_cursor = 0;
                }
                result
            }
            Command::Toggle(id) => self.controller.toggle(id),
            Command::Confirmed { intent, value } => {
                let result = self.controller.apply(intent, value.as_deref());
                self.dialog.close();
                result
            }
        };
        if let Err(ActionError::Busy) = result {
            self.controller.state_mut().message = MSG_BUSY.to_string();
        }
        self.clamp_selection();
    }

    /// Queue a mutation unless one is already in flight.
    fn queue(&mut self, command: Command) {
        if self.is_busy() {
            self.controller.state_mut().message = MSG_BUSY.to_string();
            return;
        }
        if command == Command::Load {
            self.controller.state_mut().message = MSG_LOADING.to_string();
        }
        self.queued = Some(command);
    }

    fn clamp_selection(&mut self) {
        let visible = self.view().rows.len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.dialog.is_open() {
            self.handle_dialog_key(code, modifiers);
            return;
        }
        match self.focus {
            Focus::Input => self.handle_input_key(code, modifiers),
            Focus::List => {
                if let Some(action) = self.keymap.lookup(code, modifiers) {
                    self.perform(action);
                }
            }
        }
    }

    fn handle_dialog_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Esc => {
                self.dialog.cancel();
            }
            KeyCode::Enter => {
                if let DialogResult::Confirmed { intent, value } = self.dialog.confirm() {
                    self.queue(Command::Confirmed { intent, value });
                }
            }
            _ => {
                self.dialog
                    .edit(|buf, cursor| form::edit_line(buf, cursor, code, modifiers));
            }
        }
    }

    fn handle_input_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc | KeyCode::Tab | KeyCode::Down => self.focus = Focus::List,
            _ => {
                if form::edit_line(&mut self.input, &mut self.input_cursor, code, modifiers) {
                    self.controller.check_input(&self.input);
                }
            }
        }
    }

    fn submit_input(&mut self) {
        self.controller.check_input(&self.input);
        if !self.controller.state().input_error.is_empty() {
            return;
        }
        let text = self.input.trim().to_string();
        self.queue(Command::Add(text));
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ShowHelp => self.show_help = true,
            Action::Reload => self.queue(Command::Load),
            Action::FocusInput => self.focus = Focus::Input,
            Action::MoveUp => self.selected = self.selected.saturating_sub(1),
            Action::MoveDown => {
                self.selected += 1;
                self.clamp_selection();
            }
            Action::NextFilter => self.set_filter(self.controller.state().filter.cycle()),
            Action::FilterAll => self.set_filter(Filter::All),
            Action::FilterDone => self.set_filter(Filter::Done),
            Action::FilterTodo => self.set_filter(Filter::Todo),
            Action::Toggle => {
                if let Some(id) = self.selected_id() {
                    self.queue(Command::Toggle(id));
                }
            }
            Action::Rename => {
                if let Some(options) = self
                    .selected_id()
                    .and_then(|id| self.controller.rename_dialog(&id))
                {
                    self.open_dialog(options);
                }
            }
            Action::Delete => {
                if let Some(options) = self
                    .selected_id()
                    .and_then(|id| self.controller.remove_one_dialog(&id))
                {
                    self.open_dialog(options);
                }
            }
            Action::DeleteDone => {
                if let Some(options) = self.controller.remove_done_dialog() {
                    self.open_dialog(options);
                }
            }
            Action::DeleteAll => {
                if let Some(options) = self.controller.remove_all_dialog() {
                    self.open_dialog(options);
                }
            }
        }
    }

    /// Row and bulk controls are disabled while busy.
    fn open_dialog(&mut self, options: crate::dialog::DialogOptions) {
        if self.is_busy() {
            self.controller.state_mut().message = MSG_BUSY.to_string();
            return;
        }
        self.dialog.open(options);
    }

    fn set_filter(&mut self, filter: Filter) {
        self.controller.set_filter(filter);
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Task;
    use crate::store::fake::FakeStore;

    fn task(id: &str, text: &str, completed: bool, created_at: i64) -> Task {
        Task {
            id: id.into(),
            text: text.into(),
            completed,
            created_at,
        }
    }

    fn app() -> App<FakeStore> {
        let store = FakeStore::with_tasks(vec![
            task("a", "Water plants", false, 100),
            task("b", "Pay rent now", true, 200),
        ]);
        let mut app = App::new(Controller::new(store), Theme::default());
        app.run_queued();
        app
    }

    fn key(app: &mut App<FakeStore>, code: KeyCode) {
        app.handle_key(code, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App<FakeStore>, text: &str) {
        for c in text.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn reload_shows_loading_until_it_runs() {
        let mut app = app();
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Char('r'));
        assert_eq!(app.queued, Some(Command::Load));
        assert_eq!(app.controller.state().message, MSG_LOADING);

        app.run_queued();
        assert!(app.controller.state().message.is_empty());
        assert_eq!(app.controller.store().call_count("fetch_all"), 2);
    }

    #[test]
    fn starts_by_loading() {
        let app = app();
        assert_eq!(app.controller.state().tasks.len(), 2);
        assert!(!app.is_busy());
    }

    #[test]
    fn typing_shows_live_validation_and_enter_adds() {
        let mut app = app();
        type_text(&mut app, "Buy");
        assert_eq!(
            app.controller.state().input_error,
            "Task must be at least 5 characters."
        );
        key(&mut app, KeyCode::Enter);
        assert!(!app.is_busy());

        type_text(&mut app, " milk");
        assert!(app.controller.state().input_error.is_empty());
        key(&mut app, KeyCode::Enter);
        assert!(app.is_busy());
        assert!(!app.view().add_enabled);

        app.run_queued();
        assert_eq!(app.controller.state().tasks[0].text, "Buy milk");
        assert!(app.input.is_empty());
        assert_eq!(app.controller.store().call_count("create"), 1);
    }

    #[test]
    fn second_mutation_is_rejected_while_queued() {
        let mut app = app();
        type_text(&mut app, "Buy milk");
        key(&mut app, KeyCode::Enter);
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Char(' '));
        assert_eq!(app.controller.state().message, MSG_BUSY);
        assert_eq!(app.queued, Some(Command::Add("Buy milk".into())));

        app.run_queued();
        assert_eq!(app.controller.state().tasks.len(), 3);
        assert_eq!(app.controller.store().call_count("update_field"), 0);
    }

    #[test]
    fn toggle_selected_row() {
        let mut app = app();
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Down);
        key(&mut app, KeyCode::Char(' '));
        app.run_queued();
        // Rows are newest first: b, a.
        assert!(app.controller.state().find("a").unwrap().completed);
    }

    #[test]
    fn delete_goes_through_confirm_dialog() {
        let mut app = app();
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Char('d'));
        assert!(app.dialog.is_open());

        key(&mut app, KeyCode::Esc);
        assert!(!app.dialog.is_open());
        assert_eq!(app.controller.state().tasks.len(), 2);

        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Enter);
        assert!(app.dialog.session().unwrap().pending);
        app.run_queued();
        assert!(!app.dialog.is_open());
        assert!(app.controller.state().find("b").is_none());
    }

    #[test]
    fn rename_with_invalid_text_keeps_dialog_open() {
        let mut app = app();
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Char('e'));
        app.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL);
        type_text(&mut app, "9 lives");
        key(&mut app, KeyCode::Enter);

        assert!(app.dialog.is_open());
        assert!(!app.is_busy());
        assert_eq!(app.controller.store().call_count("update_field"), 0);

        app.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL);
        type_text(&mut app, "Pay all rent");
        key(&mut app, KeyCode::Enter);
        app.run_queued();
        assert!(!app.dialog.is_open());
        assert_eq!(app.controller.state().find("b").unwrap().text, "Pay all rent");
    }

    #[test]
    fn delete_done_with_nothing_done_shows_notice() {
        let mut app = app();
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Char(' '));
        app.run_queued();
        app.handle_key(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert!(!app.dialog.is_open());
        assert_eq!(app.controller.state().message, "No done tasks to delete.");
    }

    #[test]
    fn filter_keys_reset_selection() {
        let mut app = app();
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Down);
        key(&mut app, KeyCode::Char('3'));
        assert_eq!(app.selected, 0);
        let view = app.view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, "a");
    }
}
