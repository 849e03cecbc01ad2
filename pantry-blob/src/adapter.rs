use std::sync::Arc;

use bytes::Bytes;
use futures_util::StreamExt;
use tracing::{debug, error, info};

use crate::{
    chunked_stream, BlobConfig, BlobError, BlobPut, BlobReceipt, BlobResult, BlobStore,
    ByteStream, NamespacedKeyStrategy, UploadEvent, UploadObserver,
};

/// The main blob adapter - services embed this rather than talking to a
/// `BlobStore` directly.
///
/// It derives the object key from an item name, enforces the size guard,
/// reports upload progress and resolves download URLs.
#[derive(Clone)]
pub struct BlobAdapter {
    store: Arc<dyn BlobStore>,
    keys: NamespacedKeyStrategy,
    config: BlobConfig,
}

impl BlobAdapter {
    /// Create a new blob adapter keyed by `config.key_prefix`
    pub fn new<S: BlobStore + 'static>(store: S, config: BlobConfig) -> Self {
        Self::from_arc(Arc::new(store), config)
    }

    /// Create from a store that is shared elsewhere
    pub fn from_arc(store: Arc<dyn BlobStore>, config: BlobConfig) -> Self {
        Self {
            store,
            keys: NamespacedKeyStrategy::new(config.key_prefix.clone()),
            config,
        }
    }

    /// Store the blob for `name` from a stream, replacing any previous one.
    ///
    /// Emits `Started`, one `Progress` per chunk, then `Completed` or
    /// `Failed` to `observer`.
    pub async fn put(
        &self,
        name: &str,
        put: BlobPut,
        body: ByteStream,
        observer: Option<UploadObserver>,
    ) -> BlobResult<BlobReceipt> {
        let key = self.keys.object_key(name);

        match self.put_inner(&key, put, body, observer.clone()).await {
            Ok(receipt) => {
                info!(key = %receipt.key, size_bytes = receipt.size_bytes, "blob uploaded");
                emit(
                    &observer,
                    UploadEvent::Completed {
                        key,
                        size_bytes: receipt.size_bytes,
                    },
                );
                Ok(receipt)
            }
            Err(e) => {
                error!(key = %key, error = %e, "blob upload failed");
                emit(
                    &observer,
                    UploadEvent::Failed {
                        key,
                        reason: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    /// Store an in-memory payload, streamed in `config.chunk_bytes` pieces
    pub async fn put_bytes(
        &self,
        name: &str,
        put: BlobPut,
        data: Bytes,
        observer: Option<UploadObserver>,
    ) -> BlobResult<BlobReceipt> {
        let put = put.with_size_hint(data.len() as u64);
        let body = chunked_stream(data, self.config.chunk_bytes);
        self.put(name, put, body, observer).await
    }

    async fn put_inner(
        &self,
        key: &str,
        put: BlobPut,
        body: ByteStream,
        observer: Option<UploadObserver>,
    ) -> BlobResult<BlobReceipt> {
        if let Some(size) = put.size_hint {
            if size > self.config.max_blob_bytes {
                return Err(BlobError::TooLarge {
                    size,
                    limit: self.config.max_blob_bytes,
                });
            }
        }

        emit(
            &observer,
            UploadEvent::Started {
                key: key.to_string(),
                total: put.size_hint,
            },
        );

        let content_type = put
            .content_type
            .clone()
            .unwrap_or_else(|| self.config.default_content_type.clone());
        let body = observed(
            key.to_string(),
            body,
            put.size_hint,
            self.config.max_blob_bytes,
            observer,
        );

        let result = self.store.put(key, Some(&content_type), body).await?;

        Ok(BlobReceipt::new(key, result.size_bytes, content_type)
            .with_filename(put.filename)
            .with_etag(result.etag))
    }

    /// Resolve the download URL of a stored blob
    pub async fn download_url(&self, receipt: &BlobReceipt) -> BlobResult<String> {
        self.store.download_url(&receipt.key).await
    }
}

fn emit(observer: &Option<UploadObserver>, event: UploadEvent) {
    debug!(?event, "upload event");
    if let Some(observer) = observer {
        observer(&event);
    }
}

/// Wrap `body` so every chunk is reported and the size guard holds even
/// without a size hint.
fn observed(
    key: String,
    body: ByteStream,
    total: Option<u64>,
    max_bytes: u64,
    observer: Option<UploadObserver>,
) -> ByteStream {
    let stream = async_stream::stream! {
        let mut body = body;
        let mut transferred: u64 = 0;
        while let Some(chunk) = StreamExt::next(&mut body).await {
            match chunk {
                Ok(bytes) => {
                    transferred += bytes.len() as u64;
                    if transferred > max_bytes {
                        yield Err(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("Blob exceeds maximum {}", max_bytes),
                        ));
                        return;
                    }
                    emit(&observer, UploadEvent::Progress {
                        key: key.clone(),
                        transferred,
                        total,
                    });
                    yield Ok(bytes);
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    };
    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBlobStore;
    use parking_lot::Mutex;

    fn recording_observer() -> (UploadObserver, Arc<Mutex<Vec<UploadEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let observer: UploadObserver = Arc::new(move |event: &UploadEvent| {
            sink.lock().push(event.clone());
        });
        (observer, events)
    }

    #[tokio::test]
    async fn put_bytes_reports_progress_per_chunk() {
        let store = Arc::new(MemoryBlobStore::new());
        let adapter = BlobAdapter::from_arc(store.clone(), BlobConfig::new().with_chunk_bytes(4));
        let (observer, events) = recording_observer();

        let receipt = adapter
            .put_bytes("tomato", BlobPut::new(), Bytes::from_static(b"0123456789"), Some(observer))
            .await
            .unwrap();

        assert_eq!(receipt.key, "inventory-images/tomato");
        assert_eq!(receipt.size_bytes, 10);

        let events = events.lock();
        assert_eq!(events.len(), 5); // started, 3 progress, completed
        assert_eq!(
            events[0],
            UploadEvent::Started { key: "inventory-images/tomato".into(), total: Some(10) }
        );
        assert_eq!(
            events[3],
            UploadEvent::Progress { key: "inventory-images/tomato".into(), transferred: 10, total: Some(10) }
        );
        assert!(events[4].is_terminal());
        assert_eq!(store.object("inventory-images/tomato").unwrap().len(), 10);
    }

    #[tokio::test]
    async fn oversized_hint_is_rejected_before_upload() {
        let store = Arc::new(MemoryBlobStore::new());
        let adapter = BlobAdapter::from_arc(store.clone(), BlobConfig::new().with_max_blob_bytes(4));
        let (observer, events) = recording_observer();

        let err = adapter
            .put_bytes("leek", BlobPut::new(), Bytes::from_static(b"too large"), Some(observer))
            .await
            .unwrap_err();

        assert!(matches!(err, BlobError::TooLarge { size: 9, limit: 4 }));
        assert!(store.object("inventory-images/leek").is_none());
        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], UploadEvent::Failed { .. }));
    }

    #[tokio::test]
    async fn oversized_stream_without_hint_fails() {
        let adapter = BlobAdapter::new(MemoryBlobStore::new(), BlobConfig::new().with_max_blob_bytes(4));
        let body = chunked_stream(Bytes::from_static(b"way too large"), 2);

        let err = adapter.put("leek", BlobPut::new(), body, None).await.unwrap_err();
        assert!(matches!(err, BlobError::Io { .. }));
    }

    #[tokio::test]
    async fn reupload_overwrites_and_resolves_url() {
        let store = Arc::new(MemoryBlobStore::new());
        let adapter = BlobAdapter::from_arc(store.clone(), BlobConfig::new());

        adapter
            .put_bytes("onion", BlobPut::new(), Bytes::from_static(b"first"), None)
            .await
            .unwrap();
        let receipt = adapter
            .put_bytes("onion", BlobPut::new().with_content_type("image/png"), Bytes::from_static(b"second!"), None)
            .await
            .unwrap();

        assert_eq!(store.object("inventory-images/onion").unwrap(), Bytes::from_static(b"second!"));
        assert_eq!(receipt.content_type, "image/png");
        assert_eq!(
            adapter.download_url(&receipt).await.unwrap(),
            "memory://inventory-images/onion"
        );
    }
}
