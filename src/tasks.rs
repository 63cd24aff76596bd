//! In-memory task list kept in step with a [`TaskStore`].
//!
//! Every mutation takes the busy flag, calls the store, and only touches the
//! local list once the store has reported success. Failures leave the list as
//! it was and set a message naming the failed action.

use std::fmt;

use crate::dialog::{DialogMode, DialogOptions, Intent};
use crate::store::{NewTask, Task, TaskField, TaskPredicate, TaskStore, sort_newest_first};
use crate::validate::validate_task_text;
use crate::view::Filter;

pub const MSG_LOADING: &str = "Loading tasks...";
pub const MSG_LOAD_FAILED: &str = "Could not load tasks. Check your store configuration.";
pub const MSG_ADD_FAILED: &str = "Failed to add task.";
pub const MSG_UPDATE_FAILED: &str = "Failed to update task.";
pub const MSG_RENAME_FAILED: &str = "Failed to rename task.";
pub const MSG_DELETE_FAILED: &str = "Failed to delete task.";
pub const MSG_DELETE_DONE_FAILED: &str = "Failed to delete done tasks.";
pub const MSG_DELETE_ALL_FAILED: &str = "Failed to delete tasks.";
pub const MSG_NO_DONE: &str = "No done tasks to delete.";
pub const MSG_NO_TASKS: &str = "No tasks to delete.";
pub const MSG_BUSY: &str = "Busy, please wait.";

#[derive(Debug)]
pub enum ActionError {
    /// Another operation holds the busy flag.
    Busy,
    /// Rejected locally; the store was never called.
    Validation(String),
    Store {
        action: &'static str,
        source: anyhow::Error,
    },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Busy => f.write_str(MSG_BUSY),
            ActionError::Validation(msg) => f.write_str(msg),
            ActionError::Store { action, source } => write!(f, "failed to {action}: {source:#}"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Everything the view needs, in one place.
#[derive(Debug, Default, Clone)]
pub struct TaskListState {
    /// Newest first.
    pub tasks: Vec<Task>,
    pub filter: Filter,
    pub busy: bool,
    /// Status line: load state, failures, "nothing to delete" notices.
    pub message: String,
    /// Inline error under the add input.
    pub input_error: String,
}

impl TaskListState {
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn has_done(&self) -> bool {
        self.tasks.iter().any(|t| t.completed)
    }

    fn patch(&mut self, id: &str, field: &TaskField) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            field.apply(task);
        }
    }
}

pub struct Controller<S> {
    store: S,
    state: TaskListState,
}

impl<S: TaskStore> Controller<S> {
    pub fn new(store: S) -> Self {
        Controller {
            store,
            state: TaskListState::default(),
        }
    }

    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TaskListState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.state.filter = filter;
    }

    /// Live feedback for the add input.
    pub fn check_input(&mut self, text: &str) {
        self.state.input_error = validate_task_text(text);
    }

    fn begin(&mut self) -> Result<(), ActionError> {
        if self.state.busy {
            tracing::debug!("rejected operation while busy");
            return Err(ActionError::Busy);
        }
        self.state.busy = true;
        Ok(())
    }

    fn end(&mut self) {
        self.state.busy = false;
    }

    fn fail(&mut self, action: &'static str, message: &str, source: anyhow::Error) -> ActionError {
        tracing::warn!(action, error = %format!("{source:#}"), "store operation failed");
        self.state.message = message.to_string();
        ActionError::Store { action, source }
    }

    /// Replace the list with the store's contents, newest first.
    pub fn load(&mut self) -> Result<(), ActionError> {
        self.begin()?;
        self.state.message = MSG_LOADING.to_string();
        let result = self.store.fetch_all();
        let outcome = match result {
            Ok(mut tasks) => {
                sort_newest_first(&mut tasks);
                tracing::info!(count = tasks.len(), "loaded tasks");
                self.state.tasks = tasks;
                self.state.message.clear();
                Ok(())
            }
            Err(e) => {
                self.state.tasks.clear();
                Err(self.fail("load tasks", MSG_LOAD_FAILED, e))
            }
        };
        self.end();
        outcome
    }

    pub fn add(&mut self, text: &str) -> Result<(), ActionError> {
        let error = validate_task_text(text);
        if !error.is_empty() {
            self.state.input_error.clone_from(&error);
            return Err(ActionError::Validation(error));
        }
        self.begin()?;
        let result = self.store.create(&NewTask::now(text.trim()));
        let outcome = match result {
            Ok(task) => {
                tracing::info!(id = %task.id, "task added");
                self.state.tasks.insert(0, task);
                self.state.input_error.clear();
                self.state.message.clear();
                Ok(())
            }
            Err(e) => {
                let err = self.fail("add task", MSG_ADD_FAILED, e);
                self.state.input_error = MSG_ADD_FAILED.to_string();
                Err(err)
            }
        };
        self.end();
        outcome
    }

    /// Flip `completed`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) -> Result<(), ActionError> {
        let Some(completed) = self.state.find(id).map(|t| t.completed) else {
            return Ok(());
        };
        let field = TaskField::Completed(!completed);
        self.update(id, &field, "update task", MSG_UPDATE_FAILED)
    }

    pub fn rename(&mut self, id: &str, text: &str) -> Result<(), ActionError> {
        let error = validate_task_text(text);
        if !error.is_empty() {
            return Err(ActionError::Validation(error));
        }
        if self.state.find(id).is_none() {
            return Ok(());
        }
        let field = TaskField::Text(text.trim().to_string());
        self.update(id, &field, "rename task", MSG_RENAME_FAILED)
    }

    fn update(
        &mut self,
        id: &str,
        field: &TaskField,
        action: &'static str,
        failure: &str,
    ) -> Result<(), ActionError> {
        self.begin()?;
        let outcome = match self.store.update_field(id, field) {
            Ok(()) => {
                tracing::info!(id, field = field.name(), "task updated");
                self.state.patch(id, field);
                self.state.message.clear();
                Ok(())
            }
            Err(e) => Err(self.fail(action, failure, e)),
        };
        self.end();
        outcome
    }

    pub fn remove_one(&mut self, id: &str) -> Result<(), ActionError> {
        if self.state.find(id).is_none() {
            return Ok(());
        }
        self.begin()?;
        let outcome = match self.store.delete_one(id) {
            Ok(()) => {
                tracing::info!(id, "task deleted");
                self.state.tasks.retain(|t| t.id != id);
                self.state.message.clear();
                Ok(())
            }
            Err(e) => Err(self.fail("delete task", MSG_DELETE_FAILED, e)),
        };
        self.end();
        outcome
    }

    pub fn remove_done(&mut self) -> Result<(), ActionError> {
        if !self.state.has_done() {
            self.state.message = MSG_NO_DONE.to_string();
            return Ok(());
        }
        self.remove_where(TaskPredicate::Completed, "delete done tasks", MSG_DELETE_DONE_FAILED)
    }

    pub fn remove_all(&mut self) -> Result<(), ActionError> {
        if self.state.tasks.is_empty() {
            self.state.message = MSG_NO_TASKS.to_string();
            return Ok(());
        }
        self.remove_where(TaskPredicate::All, "delete all tasks", MSG_DELETE_ALL_FAILED)
    }

    /// Batch deletes are treated as all-or-nothing here: on failure the local
    /// list is kept whole even if the store removed some documents.
    fn remove_where(
        &mut self,
        predicate: TaskPredicate,
        action: &'static str,
        failure: &str,
    ) -> Result<(), ActionError> {
        self.begin()?;
        let outcome = match self.store.delete_where(predicate) {
            Ok(()) => {
                let before = self.state.tasks.len();
                self.state.tasks.retain(|t| !predicate.matches(t));
                tracing::info!(
                    ?predicate,
                    removed = before - self.state.tasks.len(),
                    "tasks deleted"
                );
                self.state.message.clear();
                Ok(())
            }
            Err(e) => Err(self.fail(action, failure, e)),
        };
        self.end();
        outcome
    }

    // ── Dialog openers ──

    pub fn rename_dialog(&self, id: &str) -> Option<DialogOptions> {
        let task = self.state.find(id)?;
        Some(DialogOptions {
            title: "Rename task".into(),
            body: "Enter the new task name.".into(),
            confirm_label: Some("Save".into()),
            mode: DialogMode::Prompt {
                default_value: task.text.clone(),
            },
            intent: Intent::Rename(task.id.clone()),
        })
    }

    pub fn remove_one_dialog(&self, id: &str) -> Option<DialogOptions> {
        let task = self.state.find(id)?;
        Some(DialogOptions {
            title: "Delete task".into(),
            body: format!("Are you sure you want to delete: \"{}\" ?", task.text),
            confirm_label: Some("Delete".into()),
            mode: DialogMode::Confirm,
            intent: Intent::RemoveOne(task.id.clone()),
        })
    }

    /// `None` (with a notice) when there is nothing done to delete.
    pub fn remove_done_dialog(&mut self) -> Option<DialogOptions> {
        if !self.state.has_done() {
            self.state.message = MSG_NO_DONE.to_string();
            return None;
        }
        Some(DialogOptions {
            title: "Delete done tasks".into(),
            body: "Are you sure you want to delete all completed tasks?".into(),
            confirm_label: Some("Delete".into()),
            mode: DialogMode::Confirm,
            intent: Intent::RemoveDone,
        })
    }

    /// `None` (with a notice) when the list is empty.
    pub fn remove_all_dialog(&mut self) -> Option<DialogOptions> {
        if self.state.tasks.is_empty() {
            self.state.message = MSG_NO_TASKS.to_string();
            return None;
        }
        Some(DialogOptions {
            title: "Delete all tasks".into(),
            body: "This will remove ALL tasks. Continue?".into(),
            confirm_label: Some("Delete All".into()),
            mode: DialogMode::Confirm,
            intent: Intent::RemoveAll,
        })
    }

    /// Run the operation a confirmed dialog asked for.
    pub fn apply(&mut self, intent: &Intent, value: Option<&str>) -> Result<(), ActionError> {
        match intent {
            Intent::Rename(id) => self.rename(id, value.unwrap_or_default()),
            Intent::RemoveOne(id) => self.remove_one(id),
            Intent::RemoveDone => self.remove_done(),
            Intent::RemoveAll => self.remove_all(),
        }
    }
}
