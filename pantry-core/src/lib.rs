//! pantry-core: document store contract, errors and configuration
//! shared by the pantry crates.

pub mod config;
pub mod errors;
pub mod memory;
pub mod store;

pub use config::{PantryConfig, PantryConfigSnapshot};
pub use errors::{ErrorKind, PantryError, PantryResult};
pub use memory::MemoryDocumentStore;
pub use store::{Document, DocumentSnapshot, DocumentStore};
