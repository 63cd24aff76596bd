//! Recording in-memory store for unit tests.

use std::cell::{Cell, RefCell};

use anyhow::{Result, bail};

use super::TaskStore;
use super::models::{NewTask, Task, TaskField, TaskPredicate};

#[derive(Default)]
pub struct FakeStore {
    pub docs: RefCell<Vec<Task>>,
    /// Names of the calls made, in order.
    pub calls: RefCell<Vec<&'static str>>,
    /// When set, every call fails after being recorded.
    pub fail: Cell<bool>,
    next_id: Cell<u32>,
}

impl FakeStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = FakeStore::default();
        *store.docs.borrow_mut() = tasks;
        store
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(name);
        if self.fail.get() {
            bail!("simulated {name} failure");
        }
        Ok(())
    }
}

impl TaskStore for FakeStore {
    fn fetch_all(&self) -> Result<Vec<Task>> {
        self.record("fetch_all")?;
        Ok(self.docs.borrow().clone())
    }

    fn create(&self, task: &NewTask) -> Result<Task> {
        self.record("create")?;
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let created = task.clone().with_id(format!("doc-{n}"));
        self.docs.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_field(&self, id: &str, field: &TaskField) -> Result<()> {
        self.record("update_field")?;
        let mut docs = self.docs.borrow_mut();
        let Some(doc) = docs.iter_mut().find(|t| t.id == id) else {
            bail!("task {id} not found");
        };
        field.apply(doc);
        Ok(())
    }

    fn delete_one(&self, id: &str) -> Result<()> {
        self.record("delete_one")?;
        self.docs.borrow_mut().retain(|t| t.id != id);
        Ok(())
    }

    fn delete_where(&self, predicate: TaskPredicate) -> Result<()> {
        self.record("delete_where")?;
        self.docs.borrow_mut().retain(|t| !predicate.matches(t));
        Ok(())
    }
}
