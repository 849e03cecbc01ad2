use async_trait::async_trait;

use crate::{BlobResult, ByteStream};

/// Object storage primitives, addressed by full object key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob from a stream, replacing any blob already at `key`
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        stream: ByteStream,
    ) -> BlobResult<PutResult>;

    /// Get a blob as a stream
    async fn get(&self, key: &str) -> BlobResult<GetResult>;

    /// Size and type of a stored object, without its body
    async fn head(&self, key: &str) -> BlobResult<ObjectHead>;

    /// Delete a blob
    async fn delete(&self, key: &str) -> BlobResult<()>;

    /// Resolve a URL the stored blob can be downloaded from.
    ///
    /// Fails with `NotFound` when nothing is stored at `key`.
    async fn download_url(&self, key: &str) -> BlobResult<String>;
}

/// What the backend reports after storing an object
#[derive(Debug, Clone)]
pub struct PutResult {
    pub etag: Option<String>,
    pub size_bytes: u64,
}

/// Result of a get operation
pub struct GetResult {
    pub stream: ByteStream,
    pub size_bytes: u64,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

/// Metadata about a blob
#[derive(Debug, Clone)]
pub struct ObjectHead {
    pub size_bytes: u64,
    pub content_type: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<i64>,
}

/// Maps an item name to the object key its image lives under:
/// `<prefix>/<name>`, so re-uploading for the same name overwrites.
#[derive(Debug, Clone)]
pub struct NamespacedKeyStrategy {
    prefix: String,
}

impl NamespacedKeyStrategy {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn object_key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }
}

impl Default for NamespacedKeyStrategy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_KEY_PREFIX)
    }
}

/// Percent-encode each `/`-separated segment of `key` for use in a URL path.
pub fn url_path(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_keys() {
        let keys = NamespacedKeyStrategy::default();
        assert_eq!(keys.object_key("tomato"), "inventory-images/tomato");

        let keys = NamespacedKeyStrategy::new("photos/");
        assert_eq!(keys.object_key("Onion"), "photos/Onion");

        let keys = NamespacedKeyStrategy::new("");
        assert_eq!(keys.object_key("Onion"), "Onion");
    }

    #[test]
    fn url_path_escapes_segments_but_keeps_separators() {
        assert_eq!(url_path("inventory-images/tomato"), "inventory-images/tomato");
        assert_eq!(url_path("inventory-images/Bell Pepper"), "inventory-images/Bell%20Pepper");
        assert_eq!(url_path("inventory-images/Item#1"), "inventory-images/Item%231");
        assert_eq!(url_path("inventory-images/50%off"), "inventory-images/50%25off");
    }
}
