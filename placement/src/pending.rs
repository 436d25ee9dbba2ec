//! Drop payloads and the two-phase placement they start.
//!
//! A drop cannot be placed immediately: sizing needs the image's natural
//! dimensions, which the host usually has to fetch or decode first. The
//! drop handler therefore calls [`PendingPlacement::begin`], which captures
//! the canvas and computes the anchor at drop time, then resolves the size
//! of [`PendingPlacement::image_ref`] however it likes and finishes with
//! [`PendingPlacement::finish`].
//!
//! Two drops in flight at once are independent. Whichever finishes first is
//! stored first.

#[cfg(test)]
#[path = "pending_test.rs"]
mod pending_test;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::engine::{self, PlacementError};
use crate::geometry::{Canvas, Point, Size};
use crate::store::PlacedItem;

/// Payload written by the drag source and read by the drop target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub category: Category,
    #[serde(alias = "imageUrl")]
    pub image_ref: String,
    #[serde(default)]
    pub name: String,
    /// Pointer position relative to the canvas origin.
    pub pointer_x: f64,
    pub pointer_y: f64,
}

impl DropEvent {
    #[must_use]
    pub fn pointer(&self) -> Point {
        Point::new(self.pointer_x, self.pointer_y)
    }
}

/// A drop whose image size has not been resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlacement {
    event: DropEvent,
    canvas: Canvas,
    anchor: Point,
}

impl PendingPlacement {
    /// Phase one: snapshot the canvas and compute the anchor.
    #[must_use]
    pub fn begin(event: DropEvent, canvas: Canvas) -> Self {
        let anchor = engine::compute_anchor(&event.category, event.pointer(), canvas);
        Self { event, canvas, anchor }
    }

    /// The image whose natural size must be resolved before finishing.
    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.event.image_ref
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.event.category
    }

    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Phase two: size, position, and stack the item against the canvas
    /// captured at drop time. May be retried after `ImageNotReady`.
    ///
    /// # Errors
    ///
    /// Returns `ImageNotReady` if `natural` is not a positive size and
    /// `CanvasNotReady` if the captured canvas had no usable dimensions.
    pub fn finish(&self, natural: Size) -> Result<PlacedItem, PlacementError> {
        let placement = engine::place_at(&self.event.category, self.anchor, natural, self.canvas)?;
        Ok(PlacedItem::new(placement, self.event.image_ref.clone(), self.event.name.clone()))
    }
}
