//! pantry-inventory: track named pantry items, their quantities, prices
//! and images.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pantry_blob::MemoryBlobStore;
//! use pantry_core::{MemoryDocumentStore, PantryConfig};
//! use pantry_inventory::{configure, AddMode};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), pantry_inventory::InventoryError> {
//! let inventory = configure(
//!     &PantryConfig::new().snapshot(),
//!     Arc::new(MemoryDocumentStore::new()),
//!     Arc::new(MemoryBlobStore::new()),
//! );
//!
//! inventory.add_item("Onion", AddMode::Predefined, None).await?;
//! inventory.add_item("Onion", AddMode::Predefined, None).await?;
//!
//! let onion = inventory.view().get("Onion").unwrap();
//! assert_eq!(onion.quantity, 2);
//! assert_eq!(onion.image_url.as_deref(), Some("/images/onion.jfif"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod item;
pub mod services;
pub mod view;

pub use config::{InventoryConfig, DEFAULT_PRICE, PLACEHOLDER_IMAGE};
pub use error::{InventoryError, InventoryResult};
pub use item::InventoryItem;
pub use services::configure;
pub use services::inventory::{
    AddMode, ImageAttachment, ImageFile, InventoryService, ItemChange, PredefinedCatalog,
};
pub use view::InventoryView;
