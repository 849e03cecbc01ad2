use pantry_core::{Document, DocumentSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InventoryError, InventoryResult};
use crate::services::inventory::PredefinedCatalog;

pub(crate) const FIELD_QUANTITY: &str = "quantity";
pub(crate) const FIELD_PRICE: &str = "price";
pub(crate) const FIELD_IMAGE_URL: &str = "imageUrl";

/// One tracked item. `name` is the document id and is not stored as a
/// field of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Stored document shape. Missing fields are tolerated so documents
/// created by an image patch alone still decode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    quantity: Option<u64>,
    price: Option<f64>,
    image_url: Option<String>,
}

impl InventoryItem {
    /// Decode a stored document; a missing quantity reads as 0 and a
    /// missing price as `default_price`.
    pub fn from_document(id: &str, data: Document, default_price: f64) -> InventoryResult<Self> {
        let stored: StoredItem =
            serde_json::from_value(Value::Object(data)).map_err(|source| InventoryError::Decode {
                id: id.to_string(),
                source,
            })?;
        Ok(Self {
            name: id.to_string(),
            quantity: stored.quantity.unwrap_or(0),
            price: stored.price.unwrap_or(default_price),
            image_url: stored.image_url,
        })
    }

    pub fn from_snapshot(snapshot: DocumentSnapshot, default_price: f64) -> InventoryResult<Self> {
        Self::from_document(&snapshot.id, snapshot.data, default_price)
    }

    /// Image to show for this item: its own, else the catalog image for
    /// its lower-cased name, else `placeholder`.
    pub fn display_image<'a>(&'a self, catalog: &'a PredefinedCatalog, placeholder: &'a str) -> &'a str {
        self.image_url
            .as_deref()
            .or_else(|| catalog.image_for(&self.name))
            .unwrap_or(placeholder)
    }
}

/// Builder for the partial documents written with merge semantics.
#[derive(Debug, Default)]
pub(crate) struct ItemFields(Document);

impl ItemFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn quantity(mut self, quantity: u64) -> Self {
        self.0.insert(FIELD_QUANTITY.to_string(), Value::from(quantity));
        self
    }

    pub(crate) fn price(mut self, price: f64) -> Self {
        self.0.insert(FIELD_PRICE.to_string(), number(price));
        self
    }

    pub(crate) fn image_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url {
            self.0
                .insert(FIELD_IMAGE_URL.to_string(), Value::String(url.to_string()));
        }
        self
    }

    pub(crate) fn into_document(self) -> Document {
        self.0
    }
}

/// Whole prices are stored as integers (`2`, not `2.0`).
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value >= 0.0 && value <= u64::MAX as f64 {
        Value::from(value as u64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn decodes_stored_layout() {
        let item = InventoryItem::from_document(
            "Broccoli",
            doc(json!({ "quantity": 3, "price": 2, "imageUrl": "/images/brocilli.jfif" })),
            2.0,
        )
        .unwrap();

        assert_eq!(item.name, "Broccoli");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, 2.0);
        assert_eq!(item.image_url.as_deref(), Some("/images/brocilli.jfif"));
    }

    #[test]
    fn image_only_document_decodes_with_zero_quantity() {
        let item =
            InventoryItem::from_document("tomato", doc(json!({ "imageUrl": "u" })), 2.5).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.price, 2.5);
    }

    #[test]
    fn wrong_types_are_decode_errors() {
        let err = InventoryItem::from_document("Leek", doc(json!({ "quantity": "many" })), 2.0)
            .unwrap_err();
        assert!(matches!(err, InventoryError::Decode { ref id, .. } if id == "Leek"));
    }

    #[test]
    fn fields_serialize_prices_like_the_store() {
        let fields = ItemFields::new()
            .quantity(1)
            .price(2.0)
            .image_url(None)
            .into_document();
        assert_eq!(Value::Object(fields), json!({ "quantity": 1, "price": 2 }));

        let fields = ItemFields::new().price(2.75).into_document();
        assert_eq!(fields["price"], json!(2.75));
    }

    #[test]
    fn display_image_falls_back_to_catalog_then_placeholder() {
        let catalog = PredefinedCatalog::standard();
        let mut item = InventoryItem {
            name: "Carrot".into(),
            quantity: 1,
            price: 2.0,
            image_url: None,
        };
        assert_eq!(item.display_image(&catalog, "/p.jpg"), "/images/carrot.jfif");

        item.name = "Kale".into();
        assert_eq!(item.display_image(&catalog, "/p.jpg"), "/p.jpg");

        item.image_url = Some("https://cdn/kale".into());
        assert_eq!(item.display_image(&catalog, "/p.jpg"), "https://cdn/kale");
    }

    #[test]
    fn serializes_camel_case() {
        let item = InventoryItem {
            name: "Onion".into(),
            quantity: 2,
            price: 2.0,
            image_url: Some("/images/onion.jfif".into()),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["imageUrl"], "/images/onion.jfif");
        assert_eq!(json["name"], "Onion");
    }
}
