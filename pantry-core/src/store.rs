use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::{PantryError, PantryResult};

/// A semi-structured record: top-level field name → JSON value.
pub type Document = Map<String, Value>;

/// A document together with the id it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: Document,
}

impl DocumentSnapshot {
    pub fn new(id: impl Into<String>, data: Document) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Document database contract, addressed by collection name + document id.
///
/// - `get`          → fetch one by id
/// - `list_all`     → every document in a collection
/// - `upsert_merge` → create, or merge top-level fields into an existing one
/// - `delete`       → remove one by id
///
/// All methods have default implementations that fail with
/// `NotImplemented`, so a backend can override only what it supports.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when it does not exist.
    async fn get(&self, _collection: &str, _id: &str) -> PantryResult<Option<Document>> {
        Err(PantryError::not_implemented("Method not implemented: get").into_anyhow())
    }

    /// List every document in a collection. Order is backend-defined.
    async fn list_all(&self, _collection: &str) -> PantryResult<Vec<DocumentSnapshot>> {
        Err(PantryError::not_implemented("Method not implemented: list_all").into_anyhow())
    }

    /// Create the document if absent, else overwrite only the given
    /// top-level fields and leave the rest intact.
    async fn upsert_merge(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Document,
    ) -> PantryResult<()> {
        Err(PantryError::not_implemented("Method not implemented: upsert_merge").into_anyhow())
    }

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, _collection: &str, _id: &str) -> PantryResult<()> {
        Err(PantryError::not_implemented("Method not implemented: delete").into_anyhow())
    }
}

/// Merge `fields` into `target` with merge-upsert semantics.
pub fn merge_fields(target: &mut Document, fields: Document) {
    for (key, value) in fields {
        target.insert(key, value);
    }
}
