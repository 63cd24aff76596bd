//! The shared confirm/prompt overlay.
//!
//! A [`Dialog`] holds at most one open session. Confirming yields a
//! [`DialogResult`] describing what the user agreed to; the caller runs the
//! action and then calls [`Dialog::close`]. Until then the session stays open
//! and marked pending, ignoring further input.

use crate::validate::validate_task_text;

/// What a confirmed dialog asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Rename(String),
    RemoveOne(String),
    RemoveDone,
    RemoveAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Confirm,
    Prompt { default_value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOptions {
    pub title: String,
    pub body: String,
    /// Label of the confirm control. Default: "Confirm"
    pub confirm_label: Option<String>,
    pub mode: DialogMode,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    Confirmed {
        intent: Intent,
        /// Trimmed input, prompt mode only.
        value: Option<String>,
    },
    /// Prompt input failed validation; the dialog stays open.
    Invalid(String),
    Cancelled,
    /// No open session, or the session is waiting on its action.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Confirm,
    Prompt {
        input: String,
        cursor: usize,
        error: String,
    },
}

#[derive(Debug, Clone)]
pub struct Session {
    pub title: String,
    pub body: String,
    pub confirm_label: String,
    pub mode: SessionMode,
    pub intent: Intent,
    /// Confirmed, action still running.
    pub pending: bool,
}

#[derive(Debug, Default)]
pub struct Dialog {
    session: Option<Session>,
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Open a session, replacing any existing one.
    pub fn open(&mut self, options: DialogOptions) {
        let mode = match options.mode {
            DialogMode::Confirm => SessionMode::Confirm,
            DialogMode::Prompt { default_value } => SessionMode::Prompt {
                cursor: default_value.len(),
                input: default_value,
                error: String::new(),
            },
        };
        self.session = Some(Session {
            title: options.title,
            body: options.body,
            confirm_label: options
                .confirm_label
                .unwrap_or_else(|| "Confirm".to_string()),
            mode,
            intent: options.intent,
            pending: false,
        });
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn cancel(&mut self) -> DialogResult {
        if self.session.as_ref().is_some_and(|s| !s.pending) {
            self.close();
            DialogResult::Cancelled
        } else {
            DialogResult::Ignored
        }
    }

    pub fn confirm(&mut self) -> DialogResult {
        let Some(session) = self.session.as_mut() else {
            return DialogResult::Ignored;
        };
        if session.pending {
            return DialogResult::Ignored;
        }
        let value = match &mut session.mode {
            SessionMode::Confirm => None,
            SessionMode::Prompt { input, error, .. } => {
                let message = validate_task_text(input);
                if !message.is_empty() {
                    error.clone_from(&message);
                    return DialogResult::Invalid(message);
                }
                error.clear();
                Some(input.trim().to_string())
            }
        };
        session.pending = true;
        DialogResult::Confirmed {
            intent: session.intent.clone(),
            value,
        }
    }

    /// Run an edit against the prompt buffer and cursor. Returns `false`
    /// when there is no editable prompt or `edit` did not consume the input.
    pub fn edit(&mut self, edit: impl FnOnce(&mut String, &mut usize) -> bool) -> bool {
        match self.session.as_mut() {
            Some(Session {
                pending: false,
                mode: SessionMode::Prompt { input, cursor, .. },
                ..
            }) => edit(input, cursor),
            _ => false,
        }
    }
}
