#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pantry_blob::{BlobAdapter, MemoryBlobStore};
use pantry_core::{
    Document, DocumentSnapshot, DocumentStore, MemoryDocumentStore, PantryError, PantryResult,
};
use pantry_inventory::{InventoryConfig, InventoryService};

/// Memory store whose reads, lists and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryDocumentStore,
    pub fail_get: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_write: AtomicBool,
    /// Fail only the write with this 1-based number; 0 disables it
    pub fail_write_number: AtomicUsize,
    pub writes: AtomicUsize,
}

impl FlakyStore {
    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }

    pub fn fail_write_number(&self, n: usize) {
        self.fail_write_number.store(n, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> PantryResult<()> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_write_number.load(Ordering::SeqCst) == n {
            return Err(PantryError::unavailable(format!("write {} rejected", n)).into_anyhow());
        }
        Self::check(&self.fail_write, "write")
    }

    fn check(flag: &AtomicBool, what: &str) -> PantryResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(PantryError::unavailable(format!("{} unavailable", what)).into_anyhow());
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> PantryResult<Option<Document>> {
        Self::check(&self.fail_get, "read")?;
        self.inner.get(collection, id).await
    }

    async fn list_all(&self, collection: &str) -> PantryResult<Vec<DocumentSnapshot>> {
        Self::check(&self.fail_list, "list")?;
        self.inner.list_all(collection).await
    }

    async fn upsert_merge(&self, collection: &str, id: &str, fields: Document) -> PantryResult<()> {
        self.check_write()?;
        self.inner.upsert_merge(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> PantryResult<()> {
        self.check_write()?;
        self.inner.delete(collection, id).await
    }
}

pub struct Harness<S> {
    pub documents: Arc<S>,
    pub blobs: Arc<MemoryBlobStore>,
    pub service: InventoryService,
}

pub fn harness_with<S>(documents: S, config: InventoryConfig) -> Harness<S>
where
    S: DocumentStore + 'static,
{
    let documents = Arc::new(documents);
    let blobs = Arc::new(MemoryBlobStore::with_base_url("https://files.example/"));
    let adapter = BlobAdapter::from_arc(blobs.clone(), config.blob_config());
    let service = InventoryService::new(documents.clone(), adapter, config);
    Harness {
        documents,
        blobs,
        service,
    }
}

pub fn harness() -> Harness<MemoryDocumentStore> {
    harness_with(MemoryDocumentStore::new(), InventoryConfig::default())
}

pub fn flaky_harness() -> Harness<FlakyStore> {
    harness_with(FlakyStore::default(), InventoryConfig::default())
}
