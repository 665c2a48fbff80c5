//! SurrealDB document store
//!
//! Every query binds its values; only validated identifiers (collection and
//! field names) are interpolated into SurrealQL.

use async_trait::async_trait;
use nursery_core::RecordKey;
use serde::Deserialize;
use serde_json::Value;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

use super::{
    merge_patch, Document, DocumentFilter, DocumentStore, FilterClause, SortDirection, SortSpec,
    ID_FIELD,
};
use crate::config::StoreConfig;
use crate::error::{DbResult, NurseryDbError};
use crate::schema::NURSERY_SCHEMA;

/// Projection that surfaces the record key as a plain string `id`
const SELECT_DOCUMENT: &str = "SELECT *, meta::id(id) AS id";

/// SurrealDB-backed store
pub struct SurrealStore {
    db: Surreal<Any>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

impl SurrealStore {
    /// Connect, sign in when credentials are configured, and select the
    /// namespace and database
    pub async fn connect(config: &StoreConfig) -> DbResult<Self> {
        let db = any::connect(config.endpoint.as_str())
            .await
            .map_err(|e| NurseryDbError::Connection(e.to_string()))?;

        if let Some((username, password)) = config.credentials() {
            db.signin(Root { username, password })
                .await
                .map_err(|e| NurseryDbError::Connection(e.to_string()))?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(|e| NurseryDbError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    async fn run(&self, query: SurrealQuery) -> DbResult<surrealdb::Response> {
        let mut request = self.db.query(query.sql);
        for binding in query.bindings {
            request = request.bind(binding);
        }
        let response = request
            .await
            .map_err(|e| NurseryDbError::QueryError(e.to_string()))?;
        response
            .check()
            .map_err(|e| NurseryDbError::QueryError(e.to_string()))
    }

    async fn fetch_one(&self, table: &str, key: &RecordKey) -> DbResult<Option<Document>> {
        let query = SurrealQuery::new(format!(
            "{} FROM type::thing($tb, $key)",
            SELECT_DOCUMENT
        ))
        .bind("tb", table)
        .bind("key", key.as_str());

        let mut response = self.run(query).await?;
        let row: Option<Value> = response
            .take(0)
            .map_err(|e| NurseryDbError::QueryError(e.to_string()))?;
        row.map(|value| into_document(table, value)).transpose()
    }
}

#[async_trait]
impl DocumentStore for SurrealStore {
    fn backend(&self) -> &'static str {
        "surrealdb"
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> DbResult<Vec<Document>> {
        let table = identifier(collection)?;
        let mut query = SurrealQuery::new(format!("{} FROM {}", SELECT_DOCUMENT, table));
        query.push_filter(filter)?;

        if let Some(sort) = sort {
            let direction = match sort.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            let field = identifier(&sort.field)?;
            query.sql.push_str(&format!(" ORDER BY {} {}", field, direction));
        }
        if let Some(limit) = limit {
            query.sql.push_str(" LIMIT $limit");
            query = query.bind("limit", limit as u64);
        }

        let mut response = self.run(query).await?;
        let rows: Vec<Value> = response
            .take(0)
            .map_err(|e| NurseryDbError::QueryError(e.to_string()))?;
        rows.into_iter()
            .map(|row| into_document(collection, row))
            .collect()
    }

    async fn count(&self, collection: &str, filter: &DocumentFilter) -> DbResult<u64> {
        let table = identifier(collection)?;
        let mut query = SurrealQuery::new(format!("SELECT count() FROM {}", table));
        query.push_filter(filter)?;
        query.sql.push_str(" GROUP ALL");

        let mut response = self.run(query).await?;
        let row: Option<CountRow> = response
            .take(0)
            .map_err(|e| NurseryDbError::QueryError(e.to_string()))?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }

    async fn find_one(&self, collection: &str, key: &RecordKey) -> DbResult<Option<Document>> {
        let table = identifier(collection)?;
        self.fetch_one(table, key).await
    }

    async fn insert_one(&self, collection: &str, key: &RecordKey, mut doc: Document) -> DbResult<()> {
        let table = identifier(collection)?;
        doc.remove(ID_FIELD);

        let query = SurrealQuery::new("CREATE type::thing($tb, $key) CONTENT $data RETURN NONE")
            .bind("tb", table)
            .bind("key", key.as_str())
            .bind("data", Value::Object(doc));

        self.run(query).await.map_err(|e| match e {
            NurseryDbError::QueryError(msg) if msg.contains("already exists") => {
                NurseryDbError::AlreadyExists(format!("{}:{}", table, key))
            }
            other => other,
        })?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        key: &RecordKey,
        patch: Document,
    ) -> DbResult<Option<Document>> {
        let table = identifier(collection)?;
        let Some(mut doc) = self.fetch_one(table, key).await? else {
            return Ok(None);
        };

        merge_patch(&mut doc, patch);
        let mut content = doc.clone();
        content.remove(ID_FIELD);

        let query = SurrealQuery::new("UPDATE type::thing($tb, $key) CONTENT $data RETURN NONE")
            .bind("tb", table)
            .bind("key", key.as_str())
            .bind("data", Value::Object(content));
        self.run(query).await?;

        Ok(Some(doc))
    }

    async fn delete_one(&self, collection: &str, key: &RecordKey) -> DbResult<bool> {
        let table = identifier(collection)?;
        if self.fetch_one(table, key).await?.is_none() {
            return Ok(false);
        }

        let query = SurrealQuery::new("DELETE type::thing($tb, $key) RETURN NONE")
            .bind("tb", table)
            .bind("key", key.as_str());
        self.run(query).await?;
        Ok(true)
    }

    async fn init_schema(&self) -> DbResult<()> {
        self.db
            .query(NURSERY_SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| NurseryDbError::SchemaError(e.to_string()))?;
        tracing::info!("Catalog schema initialized");
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        self.db
            .health()
            .await
            .map_err(|e| NurseryDbError::Connection(e.to_string()))
    }
}

/// SurrealQL text plus its bound parameters
struct SurrealQuery {
    sql: String,
    bindings: Vec<(String, Value)>,
}

impl SurrealQuery {
    fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.bindings.push((name.to_string(), value.into()));
        self
    }

    fn param(&mut self, value: Value) -> String {
        let name = format!("p{}", self.bindings.len());
        self.bindings.push((name.clone(), value));
        format!("${}", name)
    }

    fn push_filter(&mut self, filter: &DocumentFilter) -> DbResult<()> {
        if filter.is_empty() {
            return Ok(());
        }

        let mut conditions = Vec::with_capacity(filter.clauses().len());
        for clause in filter.clauses() {
            let condition = match clause {
                FilterClause::Eq { field, value } => {
                    format!("{} = {}", identifier(field)?, self.param(value.clone()))
                }
                FilterClause::Contains { field, value } => {
                    format!("{} CONTAINS {}", identifier(field)?, self.param(value.clone()))
                }
                FilterClause::TextSearch { fields, needle } => {
                    let param = self.param(Value::String(needle.to_lowercase()));
                    let alternatives = fields
                        .iter()
                        .map(|field| {
                            identifier(field).map(|field| {
                                format!(
                                    "string::contains(string::lowercase({} ?? ''), {})",
                                    field, param
                                )
                            })
                        })
                        .collect::<DbResult<Vec<_>>>()?;
                    if alternatives.is_empty() {
                        "false".to_string()
                    } else {
                        format!("({})", alternatives.join(" OR "))
                    }
                }
            };
            conditions.push(condition);
        }

        self.sql.push_str(" WHERE ");
        self.sql.push_str(&conditions.join(" AND "));
        Ok(())
    }
}

/// Accept only plain identifiers for interpolation
fn identifier(name: &str) -> DbResult<&str> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(NurseryDbError::InvalidField(name.to_string()))
    }
}

fn into_document(collection: &str, value: Value) -> DbResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(NurseryDbError::QueryError(format!(
            "expected object row from {}, got {}",
            collection, other
        ))),
    }
}
