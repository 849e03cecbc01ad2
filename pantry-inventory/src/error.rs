use pantry_blob::BlobError;
use pantry_core::PantryError;
use thiserror::Error;

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Failures surfaced by the inventory service.
///
/// Empty item names are not errors for add/remove; those are no-ops.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("document store error: {0}")]
    Store(#[source] PantryError),

    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),

    #[error("malformed inventory document {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("item name must not be empty")]
    EmptyName,

    #[error("unknown add mode {mode:?}, expected \"manual\" or \"predefined\"")]
    UnknownAddMode { mode: String },
}

impl From<anyhow::Error> for InventoryError {
    fn from(err: anyhow::Error) -> Self {
        InventoryError::Store(PantryError::normalize(err))
    }
}

impl InventoryError {
    /// True for failures of an external collaborator (store or blob)
    pub fn is_backend(&self) -> bool {
        matches!(self, InventoryError::Store(_) | InventoryError::Blob(_))
    }
}
