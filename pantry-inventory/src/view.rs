use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::item::InventoryItem;

/// Read-only projection of the inventory collection.
///
/// Replaced wholesale after every successful fetch; never patched
/// incrementally, and left untouched when a fetch fails.
#[derive(Debug, Default)]
pub struct InventoryView {
    items: RwLock<Vec<InventoryItem>>,
    refreshes: AtomicU64,
}

impl InventoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current listing, in store order
    pub fn items(&self) -> Vec<InventoryItem> {
        self.items.read().clone()
    }

    pub fn get(&self, name: &str) -> Option<InventoryItem> {
        self.items.read().iter().find(|i| i.name == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Number of successful refreshes so far
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub(crate) fn replace(&self, items: Vec<InventoryItem>) {
        *self.items.write() = items;
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }
}
