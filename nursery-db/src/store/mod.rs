//! Persistence gateway
//!
//! A narrow document-store abstraction over named collections. Services never
//! talk to a driver directly; they go through a [`Collection`] bound to one
//! [`DocumentStore`] backend. Documents are JSON objects keyed by
//! [`RecordKey`]; the key is stored outside the document body and surfaced as
//! the `id` field on reads.

mod memory;
mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use nursery_core::RecordKey;
use serde_json::{Map, Value};

use crate::error::DbResult;

/// A stored document body
pub type Document = Map<String, Value>;

/// Field carrying the record key on documents read back from a store
pub const ID_FIELD: &str = "id";

/// One predicate over a top-level document field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Field equals value
    Eq { field: String, value: Value },
    /// Array field contains value
    Contains { field: String, value: Value },
    /// Case-insensitive substring match against any of the fields
    TextSearch { fields: Vec<String>, needle: String },
}

impl FilterClause {
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            FilterClause::Eq { field, value } => doc.get(field) == Some(value),
            FilterClause::Contains { field, value } => match doc.get(field) {
                Some(Value::Array(items)) => items.contains(value),
                _ => false,
            },
            FilterClause::TextSearch { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|field| match doc.get(field) {
                    Some(Value::String(text)) => text.to_lowercase().contains(&needle),
                    _ => false,
                })
            }
        }
    }
}

/// Conjunction of filter clauses. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    clauses: Vec<FilterClause>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(FilterClause::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(FilterClause::Contains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn text_search<I, S>(mut self, fields: I, needle: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clauses.push(FilterClause::TextSearch {
            fields: fields.into_iter().map(Into::into).collect(),
            needle: needle.into(),
        });
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|clause| clause.matches(doc))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Single-field sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Order two documents by this sort key; missing fields sort first ascending
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Document store backend.
///
/// Implementations must be safe for concurrent use from many request tasks.
/// Writes that target a missing key report it through their return value,
/// never as an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and readiness output
    fn backend(&self) -> &'static str;

    /// Documents matching `filter`, optionally sorted and truncated
    async fn find_many(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> DbResult<Vec<Document>>;

    /// Number of documents matching `filter`, ignoring any limit
    async fn count(&self, collection: &str, filter: &DocumentFilter) -> DbResult<u64>;

    async fn find_one(&self, collection: &str, key: &RecordKey) -> DbResult<Option<Document>>;

    /// Store `doc` under `key`; fails with `AlreadyExists` if the key is taken
    async fn insert_one(&self, collection: &str, key: &RecordKey, doc: Document) -> DbResult<()>;

    /// Shallow-merge `patch` into the stored document. A `null` value removes
    /// the field. Returns the merged document, or `None` when `key` is absent.
    async fn update_one(
        &self,
        collection: &str,
        key: &RecordKey,
        patch: Document,
    ) -> DbResult<Option<Document>>;

    /// Returns whether a document was removed
    async fn delete_one(&self, collection: &str, key: &RecordKey) -> DbResult<bool>;

    /// Create tables and indexes where the backend has them
    async fn init_schema(&self) -> DbResult<()> {
        Ok(())
    }

    /// Cheap reachability probe
    async fn ping(&self) -> DbResult<()>;
}

/// Handle on one named collection of a store
#[derive(Clone)]
pub struct Collection {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
}

impl Collection {
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self { store, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn find_many(
        &self,
        filter: &DocumentFilter,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> DbResult<Vec<Document>> {
        self.store.find_many(self.name, filter, sort, limit).await
    }

    pub async fn count(&self, filter: &DocumentFilter) -> DbResult<u64> {
        self.store.count(self.name, filter).await
    }

    pub async fn find_one(&self, key: &RecordKey) -> DbResult<Option<Document>> {
        self.store.find_one(self.name, key).await
    }

    pub async fn insert_one(&self, key: &RecordKey, doc: Document) -> DbResult<()> {
        self.store.insert_one(self.name, key, doc).await
    }

    pub async fn update_one(&self, key: &RecordKey, patch: Document) -> DbResult<Option<Document>> {
        self.store.update_one(self.name, key, patch).await
    }

    pub async fn delete_one(&self, key: &RecordKey) -> DbResult<bool> {
        self.store.delete_one(self.name, key).await
    }
}

/// Apply a shallow patch in place; `null` removes the field
pub(crate) fn merge_patch(target: &mut Document, patch: Document) {
    for (field, value) in patch {
        if field == ID_FIELD {
            continue;
        }
        if value.is_null() {
            target.remove(&field);
        } else {
            target.insert(field, value);
        }
    }
}

/// Copy of `doc` with the record key surfaced as `id`
pub(crate) fn with_id(key: &RecordKey, doc: &Document) -> Document {
    let mut out = doc.clone();
    out.insert(ID_FIELD.to_string(), Value::String(key.as_str().to_string()));
    out
}
