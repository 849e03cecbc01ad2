use bytes::Bytes;
use futures_util::stream::{self, Stream};
use std::pin::Pin;
use std::sync::Arc;

/// Stream of bytes for blob content
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Split an in-memory payload into a stream of `chunk_size` pieces.
///
/// A zero `chunk_size` yields the payload as a single chunk.
pub fn chunked_stream(data: Bytes, chunk_size: usize) -> ByteStream {
    let chunk_size = if chunk_size == 0 { data.len().max(1) } else { chunk_size };
    let mut chunks = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let end = (offset + chunk_size).min(data.len());
        chunks.push(Ok(data.slice(offset..end)));
        offset = end;
    }
    Box::pin(stream::iter(chunks))
}

/// Request to store a blob
#[derive(Debug, Clone, Default)]
pub struct BlobPut {
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub size_hint: Option<u64>,
}

impl BlobPut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_size_hint(mut self, size: u64) -> Self {
        self.size_hint = Some(size);
        self
    }
}

/// Lifecycle of a single upload, as seen by an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Started {
        key: String,
        total: Option<u64>,
    },
    Progress {
        key: String,
        transferred: u64,
        total: Option<u64>,
    },
    Completed {
        key: String,
        size_bytes: u64,
    },
    Failed {
        key: String,
        reason: String,
    },
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadEvent::Completed { .. } | UploadEvent::Failed { .. })
    }
}

/// Callback receiving upload events. Must not block.
pub type UploadObserver = Arc<dyn Fn(&UploadEvent) + Send + Sync>;
