use std::sync::Arc;

use pantry_blob::{BlobAdapter, BlobPut, UploadObserver};
use pantry_core::DocumentStore;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::ImageFile;
use crate::error::{InventoryError, InventoryResult};
use crate::item::ItemFields;

/// Upload-then-link workflow for item images.
///
/// Uploads the file under the key derived from the item name, resolves its
/// download URL and only then merges `imageUrl` into the item document.
/// A failed upload or URL lookup never touches the document.
///
/// `add_item` only uses the upload half, so the new item's quantity, price
/// and image land in a single write.
#[derive(Clone)]
pub struct ImageAttachment {
    documents: Arc<dyn DocumentStore>,
    blobs: BlobAdapter,
    collection: String,
    observer: Option<UploadObserver>,
}

impl ImageAttachment {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: BlobAdapter, collection: impl Into<String>) -> Self {
        Self {
            documents,
            blobs,
            collection: collection.into(),
            observer: None,
        }
    }

    /// Receive upload progress for every attachment
    pub fn with_observer(mut self, observer: UploadObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run the workflow and return the linked download URL.
    #[instrument(skip(self, file), fields(size = file.bytes.len()))]
    pub async fn attach(&self, name: &str, file: ImageFile) -> InventoryResult<String> {
        if name.is_empty() {
            return Err(InventoryError::EmptyName);
        }

        match self.upload_and_link(name, file).await {
            Ok(url) => {
                info!(item = name, url = %url, "image attached");
                Ok(url)
            }
            Err(e) => {
                error!(item = name, error = %e, "image attachment failed");
                Err(e)
            }
        }
    }

    /// Run the workflow on the runtime without waiting for it.
    ///
    /// The handle may be dropped; failures are still logged.
    pub fn spawn(&self, name: &str, file: ImageFile) -> JoinHandle<InventoryResult<String>> {
        let this = self.clone();
        let name = name.to_string();
        tokio::spawn(async move { this.attach(&name, file).await })
    }

    async fn upload_and_link(&self, name: &str, file: ImageFile) -> InventoryResult<String> {
        let url = self.upload(name, file).await?;

        let fields = ItemFields::new().image_url(Some(&url)).into_document();
        self.documents
            .upsert_merge(&self.collection, name, fields)
            .await?;

        Ok(url)
    }

    /// Upload the file for `name` and resolve its download URL without
    /// touching the item document.
    pub(crate) async fn upload(&self, name: &str, file: ImageFile) -> InventoryResult<String> {
        let mut put = BlobPut::new();
        if let Some(ct) = file.content_type {
            put = put.with_content_type(ct);
        }
        if let Some(filename) = file.filename {
            put = put.with_filename(filename);
        }

        let receipt = self
            .blobs
            .put_bytes(name, put, file.bytes, self.observer.clone())
            .await?;
        Ok(self.blobs.download_url(&receipt).await?)
    }
}
