// 2D → 3D reconstruction of placed blocks.
//
// Each placed block becomes an axis-aligned box in 3D space (X along the
// foundation length, Y up, Z along the foundation width). The stored `(x, y)`
// is one fixed physical corner of the un-rotated footprint; rotation sweeps
// the rectangle around that corner, so the box's minimum corner (the pivot)
// depends on rotation:
//
//   rotation   pivot (x, z)
//   0°         (x,          y)
//   90°        (x − width,  y)
//   180°       (x − length, y − width)
//   270°       (x,          y − length)
//
// The pivot's vertical coordinate is `height × layer`: layers stack directly
// with no gap. In-plane extents swap at 90° and 270°. The box center is the
// pivot plus half the extents in X and Z, and the pivot minus half the height
// in Y.
//
// World placement shifts everything by `(−F.length/2, 0, −F.width/2)` so the
// foundation is centered on the origin.
//
// This is a pure derived view, recomputed whenever blocks change and never
// persisted. `recover_anchor` inverts it exactly for the values the editor
// produces.

use crate::block::Block;
use crate::color::{ColorAssigner, Hsl};
use crate::store::BlockStore;
use crate::types::{BlockId, Foundation, Rotation, Vec3};
use serde::Serialize;

/// An axis-aligned box: center and full extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BlockBox {
    pub center: Vec3,
    pub extents: Vec3,
}

/// Minimum corner of the rotated footprint in foundation-local 3D space.
pub fn pivot_corner(block: &Block) -> Vec3 {
    let floor = block.height * f64::from(block.layer);
    let (px, pz) = match block.rotation {
        Rotation::Deg0 => (block.x, block.y),
        Rotation::Deg90 => (block.x - block.width, block.y),
        Rotation::Deg180 => (block.x - block.length, block.y - block.width),
        Rotation::Deg270 => (block.x, block.y - block.length),
    };
    Vec3::new(px, floor, pz)
}

/// `(effective length, height, effective width)`.
pub fn effective_extents(block: &Block) -> Vec3 {
    if block.rotation.swaps_axes() {
        Vec3::new(block.width, block.height, block.length)
    } else {
        Vec3::new(block.length, block.height, block.width)
    }
}

/// Offset that centers the foundation on the 3D origin.
pub fn world_offset(foundation: &Foundation) -> Vec3 {
    Vec3::new(-foundation.length() / 2.0, 0.0, -foundation.width() / 2.0)
}

/// Box in foundation-local 3D space (origin at the foundation corner).
pub fn local_box(block: &Block) -> BlockBox {
    let pivot = pivot_corner(block);
    let extents = effective_extents(block);
    BlockBox {
        center: Vec3::new(
            pivot.x + extents.x / 2.0,
            pivot.y - extents.y / 2.0,
            pivot.z + extents.z / 2.0,
        ),
        extents,
    }
}

/// Box in world space.
pub fn reconstruct(block: &Block, foundation: &Foundation) -> BlockBox {
    let local = local_box(block);
    BlockBox {
        center: local.center + world_offset(foundation),
        extents: local.extents,
    }
}

/// What `recover_anchor` gives back: the stored corner and the layer floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    /// `height × layer`.
    pub floor: f64,
}

/// Undo `reconstruct`: given a world box and the block's rotation and
/// dimensions (from `template`), recover its stored corner and floor height.
pub fn recover_anchor(bbox: &BlockBox, template: &Block, foundation: &Foundation) -> Anchor {
    let local_center = bbox.center - world_offset(foundation);
    let e = bbox.extents;
    let pivot = Vec3::new(
        local_center.x - e.x / 2.0,
        local_center.y + e.y / 2.0,
        local_center.z - e.z / 2.0,
    );
    let (x, y) = match template.rotation {
        Rotation::Deg0 => (pivot.x, pivot.z),
        Rotation::Deg90 => (pivot.x + template.width, pivot.z),
        Rotation::Deg180 => (pivot.x + template.length, pivot.z + template.width),
        Rotation::Deg270 => (pivot.x, pivot.z + template.length),
    };
    Anchor {
        x,
        y,
        floor: pivot.y,
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// One renderable box with its display color.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneBox {
    pub id: BlockId,
    pub center: Vec3,
    pub extents: Vec3,
    pub color: Hsl,
}

/// Reconstruct every placed block, in store order. Stock blocks are skipped.
pub fn scene(
    store: &BlockStore,
    foundation: &Foundation,
    colors: &mut ColorAssigner,
) -> Vec<SceneBox> {
    store
        .placed()
        .map(|block| {
            let bbox = reconstruct(block, foundation);
            SceneBox {
                id: block.id.clone(),
                center: bbox.center,
                extents: bbox.extents,
                color: colors.color_for(block.length, block.width),
            }
        })
        .collect()
}

/// Camera hints for viewing the whole foundation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SceneFraming {
    pub camera_position: Vec3,
    /// Far clip distance: four times the larger foundation side.
    pub far: f64,
}

pub fn framing(foundation: &Foundation) -> SceneFraming {
    let (l, w) = (foundation.length(), foundation.width());
    let span = l.max(w);
    SceneFraming {
        camera_position: Vec3::new(l * 1.1, span * 0.7, w * 1.1),
        far: span * 4.0,
    }
}
