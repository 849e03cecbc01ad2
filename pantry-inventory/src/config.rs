use pantry_blob::{BlobConfig, DEFAULT_KEY_PREFIX};
use pantry_core::PantryConfigSnapshot;

/// Price written on every add unless configured otherwise.
pub const DEFAULT_PRICE: f64 = 2.0;

/// Image reference used when an item has no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "/images/default.jpg";

/// Collection inventory documents live in.
pub const DEFAULT_COLLECTION: &str = "inventory";

/// Inventory service settings.
///
/// Read from a [`PantryConfigSnapshot`] with these keys:
///
/// | key                                  | default               |
/// |--------------------------------------|-----------------------|
/// | `inventory.collection`               | `inventory`           |
/// | `inventory.default_price`            | `2`                   |
/// | `inventory.placeholder_image`        | `/images/default.jpg` |
/// | `inventory.image_prefix`             | `inventory-images`    |
/// | `inventory.max_image_bytes`          | 20 MiB                |
/// | `inventory.preserve_image_on_readd`  | `false`               |
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    pub collection: String,
    pub default_price: f64,
    pub placeholder_image: String,
    pub image_prefix: String,
    pub max_image_bytes: u64,
    /// Re-adding an existing item in manual mode without a file keeps its
    /// stored image instead of replacing it with the placeholder.
    pub preserve_image_on_readd: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            default_price: DEFAULT_PRICE,
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            image_prefix: DEFAULT_KEY_PREFIX.to_string(),
            max_image_bytes: BlobConfig::default().max_blob_bytes,
            preserve_image_on_readd: false,
        }
    }
}

impl InventoryConfig {
    pub fn from_snapshot(snapshot: &PantryConfigSnapshot) -> Self {
        let defaults = Self::default();
        Self {
            collection: snapshot
                .get_string("inventory.collection")
                .unwrap_or(defaults.collection),
            default_price: snapshot
                .get_f64("inventory.default_price")
                .filter(|p| p.is_finite() && *p >= 0.0)
                .unwrap_or(defaults.default_price),
            placeholder_image: snapshot
                .get_string("inventory.placeholder_image")
                .unwrap_or(defaults.placeholder_image),
            image_prefix: snapshot
                .get_string("inventory.image_prefix")
                .unwrap_or(defaults.image_prefix),
            max_image_bytes: snapshot
                .get_u64("inventory.max_image_bytes")
                .unwrap_or(defaults.max_image_bytes),
            preserve_image_on_readd: snapshot
                .get_bool("inventory.preserve_image_on_readd")
                .unwrap_or(defaults.preserve_image_on_readd),
        }
    }

    pub fn preserve_image_on_readd(mut self, preserve: bool) -> Self {
        self.preserve_image_on_readd = preserve;
        self
    }

    /// Blob settings matching this inventory configuration
    pub fn blob_config(&self) -> BlobConfig {
        BlobConfig::new()
            .with_key_prefix(self.image_prefix.clone())
            .with_max_blob_bytes(self.max_image_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::PantryConfig;

    #[test]
    fn defaults_match_the_stored_layout() {
        let config = InventoryConfig::from_snapshot(&PantryConfig::new().snapshot());
        assert_eq!(config, InventoryConfig::default());
        assert_eq!(config.collection, "inventory");
        assert_eq!(config.default_price, 2.0);
        assert_eq!(config.blob_config().key_prefix, "inventory-images");
    }

    #[test]
    fn overrides_and_invalid_values() {
        let mut raw = PantryConfig::new();
        raw.set("inventory.collection", "pantry");
        raw.set("inventory.default_price", "-4");
        raw.set("inventory.preserve_image_on_readd", "true");
        raw.set("inventory.max_image_bytes", "1024");

        let config = InventoryConfig::from_snapshot(&raw.snapshot());
        assert_eq!(config.collection, "pantry");
        assert_eq!(config.default_price, DEFAULT_PRICE);
        assert!(config.preserve_image_on_readd);
        assert_eq!(config.blob_config().max_blob_bytes, 1024);
    }
}
