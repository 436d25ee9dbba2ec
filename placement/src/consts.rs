//! Shared numeric constants for the placement crate.

// ── Free placement ──────────────────────────────────────────────

/// Minimum distance kept between a free-placed anchor and the canvas edge.
pub const FREE_PLACEMENT_MARGIN: f64 = 10.0;

// ── Fallback policy for unrecognized categories ─────────────────

/// Base scale applied to garments of an unrecognized category.
pub const DEFAULT_BASE_SCALE: f64 = 0.8;

/// Bounding-box fraction (of canvas width and height) for unrecognized categories.
pub const DEFAULT_BOUNDS_FRACTION: f64 = 0.4;

/// Mid-range stack order for unrecognized categories.
pub const DEFAULT_STACK_ORDER: i32 = 2;

// ── Fitting ─────────────────────────────────────────────────────

/// Upper limit on the fit scale: garments only ever shrink to fit.
pub const MAX_FIT_SCALE: f64 = 1.0;
