use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the adapter knows about a blob it just stored.
///
/// Feed it back to [`crate::BlobAdapter::download_url`] to get a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobReceipt {
    pub key: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub filename: Option<String>,
    pub etag: Option<String>,
    pub stored_at: DateTime<Utc>,
}

impl BlobReceipt {
    pub fn new(key: impl Into<String>, size_bytes: u64, content_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes,
            content_type: content_type.into(),
            filename: None,
            etag: None,
            stored_at: Utc::now(),
        }
    }

    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }
}
