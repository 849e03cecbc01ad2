use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::bail_pantry;
use crate::errors::PantryResult;
use crate::store::{merge_fields, Document, DocumentSnapshot, DocumentStore};

/// In-process document store.
///
/// Collections are created lazily on first write. Documents within a
/// collection list in id order. Empty ids are rejected on write.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> PantryResult<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list_all(&self, collection: &str) -> PantryResult<Vec<DocumentSnapshot>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| DocumentSnapshot::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upsert_merge(&self, collection: &str, id: &str, fields: Document) -> PantryResult<()> {
        if id.is_empty() {
            bail_pantry!(invalid, "empty document id in {}", collection);
        }
        let mut collections = self.collections.write();
        let doc = collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default();
        merge_fields(doc, fields);
        tracing::trace!(collection, id, "document merged");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> PantryResult<()> {
        let mut collections = self.collections.write();
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        tracing::trace!(collection, id, "document deleted");
        Ok(())
    }
}
