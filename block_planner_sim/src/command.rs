// Commands that mutate a planning session.
//
// Every edit a front end can make goes through `PlannerCommand` and
// `PlannerSession::apply()`. Each command is one atomic read-modify-write of
// the block store; a command that fails leaves the session untouched.
//
// Current commands:
// - `AddBlocks`: create `quantity` stock blocks of one type at the current
//   layer.
// - `RemoveBlock`: delete a block by id.
// - `MoveFromStock`: put a stock block on the foundation, centered with
//   jitter, on the current layer.
// - `MoveToStock`: send a placed block back to the reserve pool.
// - `DropBlock`: drag end, resolved by `placement::resolve_drop`.
// - `Rotate`: advance a block's rotation one quarter turn.
// - `NextLayer` / `PreviousLayer`: move the layer cursor.
//
// See also: `session.rs` for the dispatcher, `event.rs` for what comes back.

use crate::types::BlockId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlannerCommand {
    AddBlocks {
        length: f64,
        width: f64,
        height: f64,
        quantity: u32,
    },
    RemoveBlock {
        id: BlockId,
    },
    MoveFromStock {
        id: BlockId,
    },
    MoveToStock {
        id: BlockId,
    },
    /// `x`, `y` is the proposed foundation-local corner; `stage_height` is
    /// the full height of the 2D stage in pixels, stock strip included.
    DropBlock {
        id: BlockId,
        x: f64,
        y: f64,
        stage_height: f64,
    },
    Rotate {
        id: BlockId,
    },
    NextLayer,
    PreviousLayer,
}
