use std::sync::Arc;

use pantry_blob::{BlobAdapter, BlobStore};
use pantry_core::{DocumentStore, PantryConfigSnapshot};

use crate::config::InventoryConfig;

pub mod inventory;

/// Wire an [`inventory::InventoryService`] from configuration and the two
/// backing stores.
pub fn configure(
    config: &PantryConfigSnapshot,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
) -> inventory::InventoryService {
    let config = InventoryConfig::from_snapshot(config);
    let blobs = BlobAdapter::from_arc(blobs, config.blob_config());
    inventory::InventoryService::new(documents, blobs, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_blob::MemoryBlobStore;
    use pantry_core::{MemoryDocumentStore, PantryConfig};
    use tokio_test::{assert_ok, block_on};

    use inventory::AddMode;

    #[test]
    fn configure_applies_collection_and_price() {
        let mut raw = PantryConfig::new();
        raw.set("inventory.collection", "pantry");
        raw.set("inventory.default_price", "3.5");

        let documents = Arc::new(MemoryDocumentStore::new());
        let service = configure(&raw.snapshot(), documents.clone(), Arc::new(MemoryBlobStore::new()));

        assert_ok!(block_on(service.add_item("Onion", AddMode::Predefined, None)));
        assert_eq!(documents.len("pantry"), 1);
        assert_eq!(documents.len("inventory"), 0);
        assert_eq!(service.view().get("Onion").map(|i| i.price), Some(3.5));
    }
}
