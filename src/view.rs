use std::str::FromStr;

use crate::store::Task;

pub const MSG_EMPTY_STORE: &str = "No tasks yet. Add a new task above.";
pub const MSG_EMPTY_FILTER: &str = "No tasks in this filter.";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Done,
    Todo,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Done, Filter::Todo];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Done => "done",
            Filter::Todo => "todo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Done => "Done",
            Filter::Todo => "Todo",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Done => task.completed,
            Filter::Todo => !task.completed,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Filter::All => Filter::Done,
            Filter::Done => Filter::Todo,
            Filter::Todo => Filter::All,
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "done" => Ok(Filter::Done),
            "todo" => Ok(Filter::Todo),
            other => Err(format!("unknown filter '{other}' (expected all, done or todo)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Checkbox, rename and delete.
    pub controls_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub filter: Filter,
    pub active: bool,
}

/// What the screen shows for one state of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub rows: Vec<Row>,
    pub tabs: Vec<Tab>,
    pub empty_message: Option<&'static str>,
    pub add_enabled: bool,
    pub delete_done_enabled: bool,
    pub delete_all_enabled: bool,
    pub total: usize,
    pub done: usize,
}

impl ListView {
    pub fn todo(&self) -> usize {
        self.total - self.done
    }
}

pub fn build(tasks: &[Task], filter: Filter, busy: bool) -> ListView {
    let rows: Vec<Row> = tasks
        .iter()
        .filter(|t| filter.matches(t))
        .map(|t| Row {
            id: t.id.clone(),
            text: t.text.clone(),
            completed: t.completed,
            controls_enabled: !busy,
        })
        .collect();

    let empty_message = if tasks.is_empty() {
        Some(MSG_EMPTY_STORE)
    } else if rows.is_empty() {
        Some(MSG_EMPTY_FILTER)
    } else {
        None
    };

    let done = tasks.iter().filter(|t| t.completed).count();

    ListView {
        rows,
        tabs: Filter::ALL
            .iter()
            .map(|&f| Tab {
                filter: f,
                active: f == filter,
            })
            .collect(),
        empty_message,
        add_enabled: !busy,
        delete_done_enabled: !busy && done > 0,
        delete_all_enabled: !busy && !tasks.is_empty(),
        total: tasks.len(),
        done,
    }
}
