//! Garment placement engine for the virtual mannequin.
//!
//! This crate turns a dropped wardrobe item into a positioned, sized, and
//! layered garment on the try-on canvas. Everything here is pure and
//! synchronous: the host is responsible for resolving an image's natural
//! size (which may require a network fetch) and for owning the session that
//! holds the resulting [`store::PlacementStore`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`category`] | Garment categories and their per-category placement tables |
//! | [`geometry`] | `Point`, `Size`, and `Canvas` value types |
//! | [`engine`] | Anchor, fit-size, final-position, and stack-order computation |
//! | [`pending`] | Drop payloads and the two-phase pending placement |
//! | [`store`] | Placed items and the insertion-ordered session store |
//! | [`consts`] | Shared numeric constants (margins, defaults) |

pub mod category;
pub mod consts;
pub mod engine;
pub mod geometry;
pub mod pending;
pub mod store;

pub use category::Category;
pub use engine::{Placement, PlacementError, place};
pub use geometry::{Canvas, Point, Size};
pub use pending::{DropEvent, PendingPlacement};
pub use store::{ItemId, PlacedItem, PlacementStore};
