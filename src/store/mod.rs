mod firestore;
mod models;
mod sqlite;

#[cfg(test)]
pub(crate) mod fake;

pub use firestore::FirestoreStore;
pub use models::*;
pub use sqlite::SqliteStore;

use anyhow::Result;

use crate::config::{Backend, Config};

/// CRUD over a single collection of task documents.
///
/// Implementations own all wire behaviour. Every call either succeeds or
/// fails as a whole, except `delete_where`, which callers must not assume is
/// atomic across documents.
pub trait TaskStore {
    fn fetch_all(&self) -> Result<Vec<Task>>;

    /// Insert a record and return it with its store-assigned id.
    fn create(&self, task: &NewTask) -> Result<Task>;

    /// Fails if no document has this id.
    fn update_field(&self, id: &str, field: &TaskField) -> Result<()>;

    fn delete_one(&self, id: &str) -> Result<()>;

    fn delete_where(&self, predicate: TaskPredicate) -> Result<()>;
}

impl<T: TaskStore + ?Sized> TaskStore for Box<T> {
    fn fetch_all(&self) -> Result<Vec<Task>> {
        (**self).fetch_all()
    }

    fn create(&self, task: &NewTask) -> Result<Task> {
        (**self).create(task)
    }

    fn update_field(&self, id: &str, field: &TaskField) -> Result<()> {
        (**self).update_field(id, field)
    }

    fn delete_one(&self, id: &str) -> Result<()> {
        (**self).delete_one(id)
    }

    fn delete_where(&self, predicate: TaskPredicate) -> Result<()> {
        (**self).delete_where(predicate)
    }
}

/// Open the backend selected in config.
pub fn open(config: &Config) -> Result<Box<dyn TaskStore>> {
    match config.backend {
        Backend::Sqlite => {
            let store = SqliteStore::open()?;
            store.migrate()?;
            Ok(Box::new(store))
        }
        Backend::Firestore => Ok(Box::new(FirestoreStore::new(&config.firestore)?)),
    }
}
