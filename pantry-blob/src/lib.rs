//! # pantry-blob: image storage for pantry items
//!
//! `pantry-blob` uploads item images to a blob store and hands back a URL
//! the image can be downloaded from.
//!
//! - **Streaming uploads** with per-chunk progress events
//! - **Name-derived keys**: `inventory-images/<name>`, so a re-upload for
//!   the same item replaces the previous image
//! - **Storage agnostic**: memory, filesystem and S3-compatible backends
//!
//! ## Quick Start
//!
//! ```rust
//! use pantry_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let adapter = BlobAdapter::new(MemoryBlobStore::new(), BlobConfig::default());
//!
//! let receipt = adapter
//!     .put_bytes("tomato", BlobPut::new().with_content_type("image/jpeg"), bytes::Bytes::from_static(b"..."), None)
//!     .await?;
//! let url = adapter.download_url(&receipt).await?;
//! assert_eq!(url, "memory://inventory-images/tomato");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Inventory     │  ← Item image workflow
//! ├─────────────────┤
//! │   BlobAdapter   │  ← Keys, size guard, progress, URLs
//! ├─────────────────┤
//! │   BlobStore     │  ← Storage primitives
//! └─────────────────┘
//! ```

pub mod adapter;
mod config;
mod error;
mod fs_store;
mod memory_store;
mod receipt;
mod s3_store;
pub mod store;
mod types;

// Flat re-exports
pub use adapter::BlobAdapter;
pub use config::{BlobConfig, DEFAULT_KEY_PREFIX};
pub use error::{BlobError, BlobResult};
pub use fs_store::FsBlobStore;
pub use memory_store::MemoryBlobStore;
pub use receipt::BlobReceipt;
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{
    url_path, BlobStore, GetResult, NamespacedKeyStrategy, ObjectHead, PutResult,
};
pub use types::{chunked_stream, BlobPut, ByteStream, UploadEvent, UploadObserver};

/// Everything an image workflow usually needs
pub mod prelude {
    pub use crate::{
        BlobAdapter, BlobConfig, BlobError, BlobPut, BlobReceipt, BlobResult, BlobStore,
        ByteStream, MemoryBlobStore, UploadEvent, UploadObserver,
    };
}
