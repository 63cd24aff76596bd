use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::{Value, json};

use super::TaskStore;
use super::models::{NewTask, Task, TaskField, TaskPredicate};
use crate::config::FirestoreConfig;

const API_BASE: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: &str = "300";
/// Firestore rejects commits with more writes than this.
const MAX_WRITES_PER_COMMIT: usize = 500;

/// Task collection in Cloud Firestore, spoken to over the REST v1 API.
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    /// `projects/{project}/databases/(default)`
    database: String,
    collection: String,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            bail!("firestore backend selected but [firestore].project_id is empty");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(FirestoreStore {
            client,
            base_url: API_BASE.to_string(),
            database: format!("projects/{}/databases/(default)", config.project_id.trim()),
            collection: config.collection.clone(),
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}/documents/{}", self.base_url, self.database, self.collection)
    }

    fn document_name(&self, id: &str) -> String {
        format!("{}/documents/{}/{id}", self.database, self.collection)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, self.document_name(id))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.query(&[("key", key.as_str())]),
            None => builder,
        }
    }

    fn list_documents(&self) -> Result<Vec<Value>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self
                .request(Method::GET, &self.collection_url())
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }
            let body: Value = send(req, "list documents")?.json()?;
            if let Some(docs) = body.get("documents").and_then(Value::as_array) {
                documents.extend(docs.iter().cloned());
            }
            page_token = next_page_token(&body);
            if page_token.is_none() {
                break;
            }
        }
        tracing::debug!(count = documents.len(), "listed firestore documents");
        Ok(documents)
    }

    fn commit_deletes(&self, names: &[String]) -> Result<()> {
        let url = format!("{}/{}/documents:commit", self.base_url, self.database);
        for body in delete_commits(names) {
            send(
                self.request(Method::POST, &url).json(&body),
                "commit batch delete",
            )?;
        }
        Ok(())
    }
}

impl TaskStore for FirestoreStore {
    fn fetch_all(&self) -> Result<Vec<Task>> {
        self.list_documents()?
            .iter()
            .map(decode_document)
            .collect()
    }

    fn create(&self, task: &NewTask) -> Result<Task> {
        let body = json!({
            "fields": {
                "text": { "stringValue": task.text },
                "completed": { "booleanValue": task.completed },
                "createdAt": { "integerValue": task.created_at.to_string() },
            }
        });
        let created: Value = send(
            self.request(Method::POST, &self.collection_url()).json(&body),
            "create document",
        )?
        .json()?;
        let id = document_id(&created).context("create response has no document name")?;
        Ok(task.clone().with_id(id))
    }

    fn update_field(&self, id: &str, field: &TaskField) -> Result<()> {
        let value = match field {
            TaskField::Completed(done) => json!({ "booleanValue": done }),
            TaskField::Text(text) => json!({ "stringValue": text }),
        };
        let mut fields = serde_json::Map::new();
        fields.insert(field.name().to_string(), value);
        send(
            self.request(Method::PATCH, &self.document_url(id))
                .query(&[
                    ("updateMask.fieldPaths", field.name()),
                    ("currentDocument.exists", "true"),
                ])
                .json(&json!({ "fields": fields })),
            "update document",
        )?;
        Ok(())
    }

    fn delete_one(&self, id: &str) -> Result<()> {
        send(
            self.request(Method::DELETE, &self.document_url(id)),
            "delete document",
        )?;
        Ok(())
    }

    fn delete_where(&self, predicate: TaskPredicate) -> Result<()> {
        let mut names = Vec::new();
        for doc in self.list_documents()? {
            let task = decode_document(&doc)?;
            if predicate.matches(&task) {
                names.push(self.document_name(&task.id));
            }
        }
        self.commit_deletes(&names)
    }
}

fn send(req: RequestBuilder, action: &str) -> Result<Response> {
    let resp = req
        .send()
        .with_context(|| format!("firestore {action}: request failed"))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        bail!("firestore {action}: {status}: {}", body.trim());
    }
    Ok(resp)
}

/// Token for the next page of a list response. Absent or empty means done.
fn next_page_token(body: &Value) -> Option<String> {
    body.get("nextPageToken")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// `:commit` request bodies deleting `names`, at most
/// [`MAX_WRITES_PER_COMMIT`] writes each.
fn delete_commits(names: &[String]) -> Vec<Value> {
    names
        .chunks(MAX_WRITES_PER_COMMIT)
        .map(|chunk| {
            let writes: Vec<Value> = chunk.iter().map(|name| json!({ "delete": name })).collect();
            json!({ "writes": writes })
        })
        .collect()
}

/// Last path segment of a document's `name`.
fn document_id(doc: &Value) -> Option<String> {
    doc.get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Convert a typed Firestore document into a task. Missing fields take
/// their defaults so records written by other clients still load.
fn decode_document(doc: &Value) -> Result<Task> {
    let id = document_id(doc).context("document has no name")?;
    let fields = doc.get("fields");
    let field = |name: &str| fields.and_then(|f| f.get(name));

    let text = field("text")
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let completed = field("completed")
        .and_then(|v| v.get("booleanValue"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let created_at = field("createdAt").map_or(0, decode_integer);

    Ok(Task {
        id,
        text,
        completed,
        created_at,
    })
}

/// `integerValue` arrives as a JSON string; `doubleValue` as a number.
fn decode_integer(value: &Value) -> i64 {
    if let Some(i) = value.get("integerValue") {
        return match i {
            Value::String(s) => s.parse().unwrap_or(0),
            other => other.as_i64().unwrap_or(0),
        };
    }
    value
        .get("doubleValue")
        .and_then(Value::as_f64)
        .map_or(0, |f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(project_id: &str, api_key: &str) -> FirestoreConfig {
        FirestoreConfig {
            project_id: project_id.into(),
            api_key: api_key.into(),
            ..FirestoreConfig::default()
        }
    }

    #[test]
    fn requires_project_id() {
        assert!(FirestoreStore::new(&config("  ", "")).is_err());
    }

    #[test]
    fn builds_document_paths() {
        let store = FirestoreStore::new(&config("demo", "")).unwrap();
        assert!(store.api_key.is_none());
        assert_eq!(
            store.document_name("abc"),
            "projects/demo/databases/(default)/documents/tasks/abc"
        );
        assert_eq!(
            store.collection_url(),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/tasks"
        );
    }

    #[test]
    fn decodes_full_document() {
        let doc = json!({
            "name": "projects/demo/databases/(default)/documents/tasks/K7x",
            "fields": {
                "text": { "stringValue": "Buy milk" },
                "completed": { "booleanValue": true },
                "createdAt": { "integerValue": "1718000000000" }
            }
        });
        let task = decode_document(&doc).unwrap();
        assert_eq!(task.id, "K7x");
        assert_eq!(task.text, "Buy milk");
        assert!(task.completed);
        assert_eq!(task.created_at, 1_718_000_000_000);
    }

    #[test]
    fn decodes_sparse_document() {
        let doc = json!({
            "name": "projects/demo/databases/(default)/documents/tasks/old",
            "fields": { "createdAt": { "doubleValue": 12.0 } }
        });
        let task = decode_document(&doc).unwrap();
        assert_eq!(task.text, "");
        assert!(!task.completed);
        assert_eq!(task.created_at, 12);
    }

    #[test]
    fn page_token_ends_paging_when_missing_or_empty() {
        assert_eq!(
            next_page_token(&json!({ "documents": [], "nextPageToken": "p2" })),
            Some("p2".to_string())
        );
        assert_eq!(next_page_token(&json!({ "nextPageToken": "" })), None);
        assert_eq!(next_page_token(&json!({ "documents": [] })), None);
    }

    #[test]
    fn deletes_are_split_into_commits_of_500() {
        let names: Vec<String> = (0..1001).map(|i| format!("doc-{i}")).collect();
        let commits = delete_commits(&names);
        let sizes: Vec<usize> = commits
            .iter()
            .map(|c| c["writes"].as_array().unwrap().len())
            .collect();
        assert_eq!(sizes, [500, 500, 1]);
        assert_eq!(commits[1]["writes"][0]["delete"], "doc-500");
        assert_eq!(commits[2]["writes"][0]["delete"], "doc-1000");

        assert_eq!(delete_commits(&names[..500]).len(), 1);
        assert!(delete_commits(&[]).is_empty());
    }

    #[test]
    fn document_without_name_is_rejected() {
        assert!(decode_document(&json!({ "fields": {} })).is_err());
    }
}
