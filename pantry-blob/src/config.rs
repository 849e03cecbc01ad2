/// Key prefix inventory images are uploaded under.
pub const DEFAULT_KEY_PREFIX: &str = "inventory-images";

/// Configuration for blob operations
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Absolute max size allowed for a single blob (safety guard)
    pub max_blob_bytes: u64,

    /// Content type recorded when the caller does not supply one
    pub default_content_type: String,

    /// Size of the pieces an in-memory payload is streamed in; one
    /// progress event is emitted per piece
    pub chunk_bytes: usize,

    /// Prefix for object keys
    pub key_prefix: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: 20 * 1024 * 1024, // 20MB
            default_content_type: "application/octet-stream".to_string(),
            chunk_bytes: 256 * 1024,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max blob size
    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }

    pub fn with_chunk_bytes(mut self, bytes: usize) -> Self {
        self.chunk_bytes = bytes;
        self
    }

    pub fn with_key_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}
