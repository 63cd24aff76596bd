#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// A task record before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub completed: bool,
    pub created_at: i64,
}

impl NewTask {
    /// A fresh, incomplete task stamped with the current time.
    pub fn now(text: &str) -> Self {
        NewTask {
            text: text.to_string(),
            completed: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_id(self, id: String) -> Task {
        Task {
            id,
            text: self.text,
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

/// A single-field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskField {
    Completed(bool),
    Text(String),
}

impl TaskField {
    /// Document field name, as stored.
    pub fn name(&self) -> &'static str {
        match self {
            TaskField::Completed(_) => "completed",
            TaskField::Text(_) => "text",
        }
    }

    pub fn apply(&self, task: &mut Task) {
        match self {
            TaskField::Completed(done) => task.completed = *done,
            TaskField::Text(text) => task.text.clone_from(text),
        }
    }
}

/// Selects the documents removed by a batch delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPredicate {
    Completed,
    All,
}

impl TaskPredicate {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskPredicate::Completed => task.completed,
            TaskPredicate::All => true,
        }
    }
}

/// Most recent first. Stable, so equal timestamps keep their fetched order.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
