//! Garment categories and the per-category placement tables.
//!
//! Every lookup is an exhaustive `match` over [`Category`], so adding a new
//! garment type forces each table to be revisited. Unrecognized tags are
//! carried in [`Category::Other`] and always resolve through the fallback
//! arm: free placement, default scale and bounds, no offset, and a
//! mid-range stack order.

#[cfg(test)]
#[path = "category_test.rs"]
mod category_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BASE_SCALE, DEFAULT_BOUNDS_FRACTION, DEFAULT_STACK_ORDER};
use crate::geometry::{Point, Size};

/// The garment type tag attached to every wardrobe item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Shirts, blouses, jackets.
    Top,
    /// Trousers, skirts, shorts.
    Bottom,
    /// One-piece garments spanning torso and legs.
    Dress,
    /// Footwear.
    Shoes,
    /// Hats, scarves, bags, jewellery.
    Accessories,
    /// Any tag the engine does not recognize; keeps the raw tag.
    Other(String),
}

impl Category {
    /// The recognized categories in canonical order.
    pub const KNOWN: [Category; 5] =
        [Category::Top, Category::Bottom, Category::Dress, Category::Shoes, Category::Accessories];

    /// Parse a category tag. Never fails: unknown tags become [`Category::Other`].
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "top" | "tops" => Self::Top,
            "bottom" | "bottoms" => Self::Bottom,
            "dress" | "dresses" => Self::Dress,
            "shoes" | "shoe" => Self::Shoes,
            "accessories" | "accessory" => Self::Accessories,
            _ => Self::Other(tag.to_owned()),
        }
    }

    /// Canonical lowercase tag. `Other` returns the tag it was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Dress => "dress",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
            Self::Other(tag) => tag,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Body-relative anchor as fractions of canvas width and height.
    ///
    /// `None` means free placement at the drop point.
    #[must_use]
    pub fn anchor_fraction(&self) -> Option<Point> {
        match self {
            Self::Accessories => Some(Point::new(0.5, 0.20)),
            Self::Top => Some(Point::new(0.5, 0.36)),
            Self::Dress => Some(Point::new(0.5, 0.46)),
            Self::Bottom => Some(Point::new(0.5, 0.56)),
            Self::Shoes => Some(Point::new(0.5, 0.86)),
            Self::Other(_) => None,
        }
    }

    /// Multiplier applied to the natural image size before fitting.
    #[must_use]
    pub fn base_scale(&self) -> f64 {
        match self {
            Self::Top => 0.8,
            Self::Bottom => 0.7,
            Self::Dress => 0.9,
            Self::Shoes => 0.6,
            Self::Accessories => 0.5,
            Self::Other(_) => DEFAULT_BASE_SCALE,
        }
    }

    /// Maximum footprint as fractions of canvas width and height.
    #[must_use]
    pub fn bounds_fraction(&self) -> Size {
        match self {
            Self::Top => Size::new(0.35, 0.32),
            Self::Bottom => Size::new(0.38, 0.38),
            Self::Dress => Size::new(0.45, 0.48),
            Self::Shoes => Size::new(0.30, 0.20),
            Self::Accessories => Size::new(0.25, 0.20),
            Self::Other(_) => Size::new(DEFAULT_BOUNDS_FRACTION, DEFAULT_BOUNDS_FRACTION),
        }
    }

    /// Vertical nudge as a fraction of the item's own height. Negative is up.
    #[must_use]
    pub fn offset_fraction(&self) -> f64 {
        match self {
            Self::Top => -0.10,
            Self::Bottom => 0.05,
            Self::Dress => -0.05,
            Self::Shoes => 0.08,
            Self::Accessories => -0.15,
            Self::Other(_) => 0.0,
        }
    }

    /// Draw order; lower values are drawn beneath higher values.
    #[must_use]
    pub fn stack_order(&self) -> i32 {
        match self {
            Self::Shoes => 0,
            Self::Bottom => 1,
            Self::Dress => 2,
            Self::Top => 3,
            Self::Accessories => 4,
            Self::Other(_) => DEFAULT_STACK_ORDER,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
