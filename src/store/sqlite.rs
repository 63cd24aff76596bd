use std::time::Duration;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use uuid::Uuid;

use super::TaskStore;
use super::models::{NewTask, Task, TaskField, TaskPredicate};
use crate::config;

/// Local document collection in a `SQLite` file.
pub struct SqliteStore {
    pub conn: Connection,
}

impl SqliteStore {
    pub fn open() -> Result<Self> {
        let db_path = config::db_path()?;
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        tracing::info!(path = %db_path.display(), "opened sqlite store");
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL DEFAULT 0
            );
            ",
        )?;
        Ok(())
    }
}

impl TaskStore for SqliteStore {
    fn fetch_all(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, completed, created_at FROM tasks ORDER BY created_at DESC",
        )?;
        let tasks = stmt
            .query_map([], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    completed: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn create(&self, task: &NewTask) -> Result<Task> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO tasks (id, text, completed, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, task.text, task.completed, task.created_at],
        )?;
        Ok(task.clone().with_id(id))
    }

    fn update_field(&self, id: &str, field: &TaskField) -> Result<()> {
        let changed = match field {
            TaskField::Completed(done) => self.conn.execute(
                "UPDATE tasks SET completed = ?1 WHERE id = ?2",
                params![done, id],
            )?,
            TaskField::Text(text) => self
                .conn
                .execute("UPDATE tasks SET text = ?1 WHERE id = ?2", params![text, id])?,
        };
        if changed == 0 {
            bail!("task {id} not found");
        }
        Ok(())
    }

    fn delete_one(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn delete_where(&self, predicate: TaskPredicate) -> Result<()> {
        let sql = match predicate {
            TaskPredicate::Completed => "DELETE FROM tasks WHERE completed = 1",
            TaskPredicate::All => "DELETE FROM tasks",
        };
        // One transaction, so a batch delete never half-applies.
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(sql, [])?;
        tx.commit()?;
        tracing::debug!(?predicate, removed, "batch delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    fn new_task(text: &str, created_at: i64) -> NewTask {
        NewTask {
            text: text.into(),
            completed: false,
            created_at,
        }
    }

    #[test]
    fn create_assigns_unique_ids() {
        let store = store();
        let a = store.create(&new_task("first task", 1)).unwrap();
        let b = store.create(&new_task("second task", 2)).unwrap();
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.text, "first task");
        assert!(!a.completed);
    }

    #[test]
    fn fetch_all_is_newest_first() {
        let store = store();
        store.create(&new_task("older task", 10)).unwrap();
        store.create(&new_task("newer task", 20)).unwrap();
        let texts: Vec<String> = store.fetch_all().unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, ["newer task", "older task"]);
    }

    #[test]
    fn update_field_patches_and_rejects_unknown_id() {
        let store = store();
        let t = store.create(&new_task("write report", 1)).unwrap();
        store.update_field(&t.id, &TaskField::Completed(true)).unwrap();
        store
            .update_field(&t.id, &TaskField::Text("write final report".into()))
            .unwrap();

        let fetched = &store.fetch_all().unwrap()[0];
        assert!(fetched.completed);
        assert_eq!(fetched.text, "write final report");

        assert!(store.update_field("missing", &TaskField::Completed(true)).is_err());
    }

    #[test]
    fn delete_one_and_delete_where() {
        let store = store();
        let a = store.create(&new_task("alpha task", 1)).unwrap();
        let b = store.create(&new_task("bravo task", 2)).unwrap();
        let c = store.create(&new_task("charlie task", 3)).unwrap();

        store.delete_one(&a.id).unwrap();
        store.update_field(&b.id, &TaskField::Completed(true)).unwrap();
        store.delete_where(TaskPredicate::Completed).unwrap();

        let left = store.fetch_all().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, c.id);

        store.delete_where(TaskPredicate::All).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());
    }
}
