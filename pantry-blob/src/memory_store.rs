use std::collections::HashMap;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use parking_lot::{Mutex, RwLock};

use crate::store::url_path;
use crate::{BlobError, BlobResult, BlobStore, ByteStream, GetResult, ObjectHead, PutResult};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
    etag: String,
    last_modified: i64,
}

/// In-process blob store. Download URLs are `<base_url>/<key>`.
#[derive(Debug)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    base_url: String,
    fail_next_put: Mutex<Option<String>>,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://")
    }

    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            base_url: base_url.into(),
            fail_next_put: Mutex::new(None),
        }
    }

    /// Content stored at `key`, if any
    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.read().get(key).map(|o| o.data.clone())
    }

    /// Every stored key, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Make the next `put` fail with `reason` without storing anything.
    pub fn fail_next_put<S: Into<String>>(&self, reason: S) {
        *self.fail_next_put.lock() = Some(reason.into());
    }

    fn url_for(&self, key: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, url_path(key))
        } else {
            format!("{}/{}", self.base_url, url_path(key))
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        mut stream: ByteStream,
    ) -> BlobResult<PutResult> {
        let injected = self.fail_next_put.lock().take();
        if let Some(reason) = injected {
            return Err(BlobError::upload_failed(reason));
        }

        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        let data = buf.freeze();
        let size_bytes = data.len() as u64;
        let etag = uuid::Uuid::new_v4().simple().to_string();

        self.objects.write().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
                etag: etag.clone(),
                last_modified: chrono::Utc::now().timestamp(),
            },
        );

        Ok(PutResult {
            etag: Some(etag),
            size_bytes,
        })
    }

    async fn get(&self, key: &str) -> BlobResult<GetResult> {
        let object = self
            .objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::not_found(key))?;

        let data = object.data;
        let size_bytes = data.len() as u64;
        Ok(GetResult {
            stream: Box::pin(futures_util::stream::once(async move { Ok(data) })),
            size_bytes,
            content_type: object.content_type,
            etag: Some(object.etag),
        })
    }

    async fn head(&self, key: &str) -> BlobResult<ObjectHead> {
        let objects = self.objects.read();
        let object = objects.get(key).ok_or_else(|| BlobError::not_found(key))?;
        Ok(ObjectHead {
            size_bytes: object.data.len() as u64,
            content_type: object.content_type.clone(),
            etag: Some(object.etag.clone()),
            last_modified: Some(object.last_modified),
        })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.objects.write().remove(key);
        Ok(())
    }

    async fn download_url(&self, key: &str) -> BlobResult<String> {
        if !self.objects.read().contains_key(key) {
            return Err(BlobError::not_found(key));
        }
        Ok(self.url_for(key))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunked_stream;

    #[tokio::test]
    async fn roundtrip_and_head() {
        let store = MemoryBlobStore::with_base_url("https://cdn.example/");
        store
            .put("a/b", Some("image/jpeg"), chunked_stream(Bytes::from_static(b"jpeg"), 2))
            .await
            .unwrap();

        let head = store.head("a/b").await.unwrap();
        assert_eq!(head.size_bytes, 4);
        assert_eq!(head.content_type.as_deref(), Some("image/jpeg"));

        let mut got = store.get("a/b").await.unwrap();
        let chunk = got.stream.next().await.unwrap().unwrap();
        assert_eq!(chunk, Bytes::from_static(b"jpeg"));

        assert_eq!(store.download_url("a/b").await.unwrap(), "https://cdn.example/a/b");
    }

    #[tokio::test]
    async fn url_escapes_key_segments() {
        let store = MemoryBlobStore::with_base_url("https://cdn.example");
        store
            .put("images/Bell Pepper", None, chunked_stream(Bytes::from_static(b"x"), 1))
            .await
            .unwrap();
        assert_eq!(
            store.download_url("images/Bell Pepper").await.unwrap(),
            "https://cdn.example/images/Bell%20Pepper"
        );
    }

    #[tokio::test]
    async fn missing_blob_has_no_url() {
        let store = MemoryBlobStore::new();
        assert!(matches!(
            store.download_url("nope").await,
            Err(BlobError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let store = MemoryBlobStore::new();
        store.fail_next_put("network down");

        let first = store
            .put("k", None, chunked_stream(Bytes::from_static(b"x"), 1))
            .await;
        assert!(matches!(first, Err(BlobError::UploadFailed { .. })));
        assert!(store.keys().is_empty());

        store
            .put("k", None, chunked_stream(Bytes::from_static(b"x"), 1))
            .await
            .unwrap();
        assert_eq!(store.keys(), vec!["k".to_string()]);
    }
}
