//! Placement geometry: drop event in, positioned garment out.
//!
//! A placement runs four steps in a fixed order:
//!
//! 1. [`compute_anchor`] picks the body-relative slot for the category, or
//!    the (margin-clamped) drop point for unrecognized categories.
//! 2. [`compute_fit_size`] applies the category base scale and shrinks the
//!    result uniformly until it fits the category bounding box.
//! 3. [`compute_final_position`] centers the item on the anchor, applies
//!    the category's vertical offset, and clamps to the canvas last.
//! 4. [`stack_order`] assigns the category draw order.
//!
//! All functions are pure. The only failures are deferred states: the
//! image's natural size is not known yet, or the canvas has not been laid out.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::consts::{FREE_PLACEMENT_MARGIN, MAX_FIT_SCALE};
use crate::geometry::{Canvas, Point, Size};

/// Conditions under which placement must wait and be retried later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// The image's natural width or height is zero or not yet known.
    #[error("image natural size is not available yet")]
    ImageNotReady,
    /// The canvas has no usable width or height yet.
    #[error("canvas has not been laid out yet")]
    CanvasNotReady,
}

impl PlacementError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ImageNotReady => "E_IMAGE_NOT_READY",
            Self::CanvasNotReady => "E_CANVAS_NOT_READY",
        }
    }
}

/// A fully computed placement, ready to be given an id and stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub category: Category,
    pub position: Point,
    pub size: Size,
    pub stack_order: i32,
}

/// Run all four placement steps for one drop.
///
/// # Errors
///
/// Returns `ImageNotReady` if `natural` is not a positive size and
/// `CanvasNotReady` if the canvas has no usable dimensions.
pub fn place(category: &Category, drop: Point, natural: Size, canvas: Canvas) -> Result<Placement, PlacementError> {
    place_at(category, compute_anchor(category, drop, canvas), natural, canvas)
}

/// Steps two to four, for a drop whose anchor is already known.
///
/// # Errors
///
/// Same as [`place`].
pub fn place_at(category: &Category, anchor: Point, natural: Size, canvas: Canvas) -> Result<Placement, PlacementError> {
    let size = compute_fit_size(category, natural, canvas)?;
    let position = compute_final_position(anchor, size, category, canvas);
    Ok(Placement { category: category.clone(), position, size, stack_order: stack_order(category) })
}

/// Target point the garment is centered on.
///
/// Known categories snap to a fixed fraction of the canvas regardless of
/// where the item was dropped. Unrecognized categories use the drop point,
/// kept at least [`FREE_PLACEMENT_MARGIN`] away from every edge.
#[must_use]
pub fn compute_anchor(category: &Category, drop: Point, canvas: Canvas) -> Point {
    match category.anchor_fraction() {
        Some(fraction) => Point::new(
            non_negative(canvas.width) * fraction.x,
            non_negative(canvas.height) * fraction.y,
        ),
        None => Point::new(
            clamp_with_margin(drop.x, canvas.width, FREE_PLACEMENT_MARGIN),
            clamp_with_margin(drop.y, canvas.height, FREE_PLACEMENT_MARGIN),
        ),
    }
}

/// On-canvas size for an image of `natural` size.
///
/// The base-scaled size is shrunk (never grown) by a single uniform factor
/// so it fits the category bounding box; aspect ratio is preserved.
///
/// # Errors
///
/// Returns `ImageNotReady` if `natural` is not a positive size and
/// `CanvasNotReady` if the canvas has no usable dimensions.
pub fn compute_fit_size(category: &Category, natural: Size, canvas: Canvas) -> Result<Size, PlacementError> {
    if !natural.is_positive() {
        return Err(PlacementError::ImageNotReady);
    }
    if !canvas.is_ready() {
        return Err(PlacementError::CanvasNotReady);
    }

    let desired = natural.scaled(category.base_scale());
    let fraction = category.bounds_fraction();
    let bounds = Size::new(canvas.width * fraction.width, canvas.height * fraction.height);

    let fit_scale = (bounds.width / desired.width)
        .min(bounds.height / desired.height)
        .min(MAX_FIT_SCALE);

    Ok(desired.scaled(fit_scale))
}

/// Top-left corner for an item of `size` centered on `anchor`.
///
/// The category offset is applied after centering, and clamping to the
/// canvas is always the final step.
#[must_use]
pub fn compute_final_position(anchor: Point, size: Size, category: &Category, canvas: Canvas) -> Point {
    let x = anchor.x - size.width / 2.0;
    let y = anchor.y - size.height / 2.0 + category.offset_fraction() * size.height;

    Point::new(
        clamp_to_span(x, canvas.width - size.width),
        clamp_to_span(y, canvas.height - size.height),
    )
}

/// Draw order for a category.
#[must_use]
pub fn stack_order(category: &Category) -> i32 {
    category.stack_order()
}

// =============================================================================
// CLAMPING
// =============================================================================

/// Clamp `value` to `[0, max]`, collapsing to 0 when `max` is negative.
fn clamp_to_span(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

/// Clamp `value` to `[margin, extent - margin]`.
///
/// Extents too small to hold both margins, and non-finite drop values,
/// resolve to the middle of the extent.
fn clamp_with_margin(value: f64, extent: f64, margin: f64) -> f64 {
    let extent = non_negative(extent);
    if extent < margin * 2.0 || !value.is_finite() {
        return extent / 2.0;
    }
    value.min(extent - margin).max(margin)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
