// Events emitted by `PlannerSession::apply()`.
//
// Events describe what a command actually changed, so a front end can
// re-render or log without diffing the store. A command that changes nothing
// (adding zero blocks, stepping below layer 0) emits nothing.

use crate::types::{BlockId, Point2, Rotation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlannerEvent {
    /// New stock blocks, in creation order.
    BlocksAdded { ids: Vec<BlockId> },
    BlockRemoved { id: BlockId },
    /// A block left stock and landed on the foundation.
    BlockPlaced {
        id: BlockId,
        position: Point2,
        layer: u32,
    },
    BlockStocked { id: BlockId },
    /// A placed block was dropped somewhere new. `snapped` is false when it
    /// hangs off the foundation and was committed as dropped.
    BlockMoved {
        id: BlockId,
        position: Point2,
        snapped: bool,
    },
    BlockRotated { id: BlockId, rotation: Rotation },
    LayerChanged { layer: u32 },
}
