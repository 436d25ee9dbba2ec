//! Placed garments and the per-session store that owns them.
//!
//! The store is an insertion-ordered sequence. Removal never reorders the
//! survivors, and nothing is deduplicated: ids are assigned at placement
//! time and assumed unique. Renderers that need draw order should use
//! [`PlacementStore::render_order`] rather than sorting `list()` themselves.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;
use crate::engine::Placement;
use crate::geometry::{Point, Size};

/// Unique identifier for a placed garment.
pub type ItemId = Uuid;

/// A garment instance positioned on the canvas. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem {
    /// Assigned once, at placement time.
    pub id: ItemId,
    /// URL or handle of the image to draw.
    pub image_ref: String,
    /// Display name carried over from the wardrobe item.
    pub name: String,
    pub category: Category,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    pub size: Size,
    /// Draw order; lower values are drawn first. Not unique.
    pub stack_order: i32,
}

impl PlacedItem {
    /// Attach a fresh id and image metadata to a computed placement.
    #[must_use]
    pub fn new(placement: Placement, image_ref: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_ref: image_ref.into(),
            name: name.into(),
            category: placement.category,
            position: placement.position,
            size: placement.size,
            stack_order: placement.stack_order,
        }
    }
}

/// Ordered collection of the garments currently on the mannequin.
#[derive(Debug, Clone, Default)]
pub struct PlacementStore {
    items: Vec<PlacedItem>,
}

impl PlacementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item to the end of the sequence.
    pub fn add(&mut self, item: PlacedItem) {
        self.items.push(item);
    }

    /// Remove the first item with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<PlacedItem> {
        let index = self.items.iter().position(|item| item.id == *id)?;
        Some(self.items.remove(index))
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// All items in insertion order.
    #[must_use]
    pub fn list(&self) -> &[PlacedItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Items sorted by `stack_order` ascending; ties keep insertion order.
    #[must_use]
    pub fn render_order(&self) -> Vec<&PlacedItem> {
        let mut items: Vec<&PlacedItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.stack_order);
        items
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
