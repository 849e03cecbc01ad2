use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Where an added item's image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddMode {
    /// A user-supplied file, or the placeholder when none is given
    #[default]
    Manual,
    /// The bundled catalog image for the item name
    Predefined,
}

impl AddMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddMode::Manual => "manual",
            AddMode::Predefined => "predefined",
        }
    }
}

impl fmt::Display for AddMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddMode {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(AddMode::Manual),
            "predefined" => Ok(AddMode::Predefined),
            other => Err(InventoryError::UnknownAddMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// What a mutating call did to the stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemChange {
    Created,
    Incremented { quantity: u64 },
    Decremented { quantity: u64 },
    Deleted,
    /// Empty name, or removal of an item that does not exist
    Ignored,
}

/// An uploaded image file.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl ImageFile {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            filename: None,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Static lower-case item name → bundled image reference.
#[derive(Debug, Clone)]
pub struct PredefinedCatalog {
    entries: BTreeMap<String, String>,
}

impl PredefinedCatalog {
    /// The bundled produce catalog
    pub fn standard() -> Self {
        Self::from_entries([
            ("broccoli", "/images/brocilli.jfif"),
            ("carrot", "/images/carrot.jfif"),
            ("cauliflower", "/images/cauli.jfif"),
            ("chilli", "/images/chilli.jfif"),
            ("cucumber", "/images/cucumber.jfif"),
            ("green", "/images/green.jfif"),
            ("onion", "/images/onion.jfif"),
        ])
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, image)| (name.into().to_lowercase(), image.into()))
                .collect(),
        }
    }

    /// Image for `name`, matched case-insensitively
    pub fn image_for(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.image_for(name).is_some()
    }

    /// Catalog names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }
}

impl Default for PredefinedCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
