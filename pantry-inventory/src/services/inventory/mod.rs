mod inventory_images;
mod inventory_service;
mod inventory_shared;

pub use inventory_images::ImageAttachment;
pub use inventory_service::InventoryService;
pub use inventory_shared::{AddMode, ImageFile, ItemChange, PredefinedCatalog};
