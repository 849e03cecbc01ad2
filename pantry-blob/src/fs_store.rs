use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::store::url_path;
use crate::{BlobError, BlobResult, BlobStore, ByteStream, GetResult, ObjectHead, PutResult};

/// Filesystem blob store.
///
/// Blobs live at `<root>/<key>`; download URLs are `<public_base_url>/<key>`
/// with each key segment percent-encoded,
/// so `root` is expected to be served by a static file server.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Keys must be relative and must not climb out of the root.
    fn full_path(&self, key: &str) -> BlobResult<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(BlobError::invalid_key(key));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        key: &str,
        _content_type: Option<&str>,
        mut stream: ByteStream,
    ) -> BlobResult<PutResult> {
        let full_path = self.full_path(key)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // temp file + rename so readers never see a partial blob
        let mut temp_name = full_path.clone().into_os_string();
        temp_name.push(".part");
        let temp_path = PathBuf::from(temp_name);

        let mut file = fs::File::create(&temp_path).await?;
        let mut size_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(e.into());
                }
            };
            file.write_all(&chunk).await?;
            size_bytes += chunk.len() as u64;
        }
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "fs_store: rename failed");
            e
        })?;
        debug!(key, size_bytes, "fs_store: put");

        Ok(PutResult {
            etag: None,
            size_bytes,
        })
    }

    async fn get(&self, key: &str) -> BlobResult<GetResult> {
        let full_path = self.full_path(key)?;
        let data = match fs::read(&full_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BlobError::not_found(key))
            }
            Err(e) => return Err(e.into()),
        };
        let size_bytes = data.len() as u64;
        let data = bytes::Bytes::from(data);
        Ok(GetResult {
            stream: Box::pin(futures_util::stream::once(async move { Ok(data) })),
            size_bytes,
            content_type: None,
            etag: None,
        })
    }

    async fn head(&self, key: &str) -> BlobResult<ObjectHead> {
        let full_path = self.full_path(key)?;
        let meta = match fs::metadata(&full_path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BlobError::not_found(key))
            }
            Err(e) => return Err(e.into()),
        };
        let last_modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64);
        Ok(ObjectHead {
            size_bytes: meta.len(),
            content_type: None,
            etag: None,
            last_modified,
        })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        let full_path = self.full_path(key)?;
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }

    async fn download_url(&self, key: &str) -> BlobResult<String> {
        let full_path = self.full_path(key)?;
        if !fs::try_exists(&full_path).await? {
            return Err(BlobError::not_found(key));
        }
        Ok(format!("{}/{}", self.public_base_url, url_path(key)))
    }

}
