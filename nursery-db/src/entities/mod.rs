//! Stored-document mappings for catalog records

mod category;
mod plant;

pub use category::CategoryEntity;

use nursery_core::RecordKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DbResult, NurseryDbError};
use crate::store::{Document, ID_FIELD};

/// A record persisted as one document in a named collection.
///
/// The key travels outside the document body: `to_document` strips `id`,
/// and stores put it back on reads.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Sized {
    const COLLECTION: &'static str;

    fn key(&self) -> &RecordKey;

    fn to_document(&self) -> DbResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(mut map) => {
                map.remove(ID_FIELD);
                Ok(map)
            }
            other => Err(NurseryDbError::MalformedDocument {
                collection: Self::COLLECTION,
                reason: format!("entity serialized to non-object {}", other),
            }),
        }
    }

    fn from_document(doc: Document) -> DbResult<Self> {
        serde_json::from_value(Value::Object(doc)).map_err(|e| NurseryDbError::MalformedDocument {
            collection: Self::COLLECTION,
            reason: e.to_string(),
        })
    }
}
