use std::sync::Arc;

use pantry_blob::BlobAdapter;
use pantry_core::DocumentStore;
use tracing::{debug, error, info};

use super::{AddMode, ImageAttachment, ImageFile, ItemChange, PredefinedCatalog};
use crate::config::InventoryConfig;
use crate::error::{InventoryError, InventoryResult};
use crate::item::{InventoryItem, ItemFields};
use crate::view::InventoryView;

/// Inventory CRUD over a document store.
///
/// The store is the source of truth. Every completed add/remove re-fetches
/// the whole collection into [`InventoryView`]; a failed call leaves the
/// view as it was and returns the error after logging it.
///
/// Quantity changes are read-then-write without a transaction, so
/// concurrent calls for the same item can lose updates.
pub struct InventoryService {
    documents: Arc<dyn DocumentStore>,
    images: ImageAttachment,
    catalog: PredefinedCatalog,
    config: InventoryConfig,
    view: Arc<InventoryView>,
}

impl InventoryService {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: BlobAdapter, config: InventoryConfig) -> Self {
        let images = ImageAttachment::new(Arc::clone(&documents), blobs, config.collection.clone());
        Self {
            documents,
            images,
            catalog: PredefinedCatalog::standard(),
            config,
            view: Arc::new(InventoryView::new()),
        }
    }

    pub fn view(&self) -> &Arc<InventoryView> {
        &self.view
    }

    pub fn images(&self) -> &ImageAttachment {
        &self.images
    }

    /// Image to show for `item`: its own, else the catalog's, else the
    /// placeholder.
    pub fn display_image<'a>(&'a self, item: &'a InventoryItem) -> &'a str {
        item.display_image(&self.catalog, &self.config.placeholder_image)
    }

    /// Fetch every item and replace the view with the result.
    pub async fn list_inventory(&self) -> InventoryResult<Vec<InventoryItem>> {
        match self.fetch_all().await {
            Ok(items) => {
                self.view.replace(items.clone());
                debug!(count = items.len(), "inventory refreshed");
                Ok(items)
            }
            Err(e) => {
                error!(error = %e, "error fetching inventory");
                Err(e)
            }
        }
    }

    /// Read a single item straight from the store
    pub async fn get_item(&self, name: &str) -> InventoryResult<Option<InventoryItem>> {
        if name.is_empty() {
            return Ok(None);
        }
        self.read(name).await
    }

    /// Add one unit of `name`, resolving its image per `mode`.
    pub async fn add_item(
        &self,
        name: &str,
        mode: AddMode,
        file: Option<ImageFile>,
    ) -> InventoryResult<ItemChange> {
        if name.is_empty() {
            debug!("add_item ignored: empty name");
            return Ok(ItemChange::Ignored);
        }

        let change = match self.add_inner(name, mode, file).await {
            Ok(change) => change,
            Err(e) => {
                error!(item = name, mode = %mode, error = %e, "error adding item");
                return Err(e);
            }
        };
        info!(item = name, mode = %mode, ?change, "item added");

        self.list_inventory().await?;
        Ok(change)
    }

    /// Remove one unit of `name`; the last unit deletes the document.
    pub async fn remove_item(&self, name: &str) -> InventoryResult<ItemChange> {
        if name.is_empty() {
            debug!("remove_item ignored: empty name");
            return Ok(ItemChange::Ignored);
        }

        let change = match self.remove_inner(name).await {
            Ok(change) => change,
            Err(e) => {
                error!(item = name, error = %e, "error removing item");
                return Err(e);
            }
        };
        match change {
            ItemChange::Ignored => debug!(item = name, "remove_item ignored: no such item"),
            _ => info!(item = name, ?change, "item removed"),
        }

        self.list_inventory().await?;
        Ok(change)
    }

    /// Upload a new image for `name` and link it, then refresh the view.
    pub async fn attach_image(&self, name: &str, file: ImageFile) -> InventoryResult<String> {
        let url = self.images.attach(name, file).await?;
        self.list_inventory().await?;
        Ok(url)
    }

    async fn add_inner(
        &self,
        name: &str,
        mode: AddMode,
        file: Option<ImageFile>,
    ) -> InventoryResult<ItemChange> {
        let existing = self.read(name).await?;

        let image_url = match (mode, file) {
            (AddMode::Predefined, _) => self.catalog.image_for(name).map(str::to_string),
            (AddMode::Manual, Some(file)) => Some(self.images.upload(name, file).await?),
            (AddMode::Manual, None) => {
                if existing.is_some() && self.config.preserve_image_on_readd {
                    None
                } else {
                    Some(self.config.placeholder_image.clone())
                }
            }
        };

        let (quantity, change) = match &existing {
            Some(item) => {
                let quantity = item.quantity.saturating_add(1);
                (quantity, ItemChange::Incremented { quantity })
            }
            None => (1, ItemChange::Created),
        };

        let fields = ItemFields::new()
            .quantity(quantity)
            .price(self.config.default_price)
            .image_url(image_url.as_deref())
            .into_document();
        self.documents
            .upsert_merge(&self.config.collection, name, fields)
            .await?;

        Ok(change)
    }

    async fn remove_inner(&self, name: &str) -> InventoryResult<ItemChange> {
        let Some(item) = self.read(name).await? else {
            return Ok(ItemChange::Ignored);
        };

        if item.quantity <= 1 {
            self.documents
                .delete(&self.config.collection, name)
                .await?;
            return Ok(ItemChange::Deleted);
        }

        let quantity = item.quantity - 1;
        let fields = ItemFields::new().quantity(quantity).into_document();
        self.documents
            .upsert_merge(&self.config.collection, name, fields)
            .await?;
        Ok(ItemChange::Decremented { quantity })
    }

    async fn read(&self, name: &str) -> InventoryResult<Option<InventoryItem>> {
        let doc = self.documents.get(&self.config.collection, name).await?;
        doc.map(|data| InventoryItem::from_document(name, data, self.config.default_price))
            .transpose()
    }

    async fn fetch_all(&self) -> InventoryResult<Vec<InventoryItem>> {
        let snapshots = self.documents.list_all(&self.config.collection).await?;
        snapshots
            .into_iter()
            .map(|snapshot| InventoryItem::from_snapshot(snapshot, self.config.default_price))
            .collect::<Result<Vec<_>, InventoryError>>()
    }
}
