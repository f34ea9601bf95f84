// The block record: the unit of placement.
//
// A block is either in stock (`in_stock = true`, position and layer carry no
// meaning) or placed (`in_stock = false`, `x`/`y`/`layer` valid). `x`/`y` is
// the un-rotated top-left corner in foundation-local coordinates. Nothing
// forbids overlap or a placed block resting outside the foundation.
//
// Transitions between the two states go through `returned_to_stock()` and
// `placed_at()`, which reset the ephemeral fields the same way every time.
// Dimensions and id are never touched by either.
//
// The serde shape is the persisted record shape: camelCase field names
// (`inStock`) and rotation as a bare degree number.

use crate::error::PlannerError;
use crate::types::{BlockId, Point2, Rotation, is_positive};
use serde::{Deserialize, Serialize};

/// Footprint and height of a block type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Validated constructor: all three extents positive and finite.
    pub fn new(length: f64, width: f64, height: f64) -> Result<Self, PlannerError> {
        if !is_positive(length) || !is_positive(width) || !is_positive(height) {
            return Err(PlannerError::InvalidDimensions {
                length,
                width,
                height,
            });
        }
        Ok(Self {
            length,
            width,
            height,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub rotation: Rotation,
    pub layer: u32,
    pub in_stock: bool,
}

impl Block {
    /// A fresh stock block at the origin, un-rotated, tagged with `layer`.
    pub fn new_in_stock(id: BlockId, dims: Dimensions, layer: u32) -> Self {
        Self {
            id,
            length: dims.length,
            width: dims.width,
            height: dims.height,
            x: 0.0,
            y: 0.0,
            rotation: Rotation::Deg0,
            layer,
            in_stock: true,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            length: self.length,
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_placed(&self) -> bool {
        !self.in_stock
    }

    pub fn corner(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Copy of this block back in stock: position cleared, layer reset to 0.
    /// Rotation is kept.
    pub fn returned_to_stock(&self) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            layer: 0,
            in_stock: true,
            ..self.clone()
        }
    }

    /// Copy of this block placed with its corner at `corner` on `layer`.
    pub fn placed_at(&self, corner: Point2, layer: u32) -> Self {
        Self {
            x: corner.x,
            y: corner.y,
            layer,
            in_stock: false,
            ..self.clone()
        }
    }

    /// Copy of this block moved to `corner`, staying on its layer.
    pub fn moved_to(&self, corner: Point2) -> Self {
        Self {
            x: corner.x,
            y: corner.y,
            ..self.clone()
        }
    }

    /// Copy with the rotation advanced one quarter turn. `x`/`y` are kept,
    /// so the footprint pivots around the stored corner.
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.next(),
            ..self.clone()
        }
    }

    /// One-line summary for block listings: `"240×40 (stock)"` or
    /// `"240×40 (layer 2)"`.
    pub fn listing_label(&self) -> String {
        if self.in_stock {
            format!("{}×{} (stock)", self.length, self.width)
        } else {
            format!("{}×{} (layer {})", self.length, self.width, self.layer)
        }
    }
}
