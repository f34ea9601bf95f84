// Error types for the planner engine.
//
// Every failure here is a local state-validation failure; nothing is
// retryable. Not-found is always a distinct error, never a silent no-op, so
// callers decide whether to ignore or report it.

use crate::types::BlockId;
use thiserror::Error;

/// Block store lookups and inserts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no block with id {0}")]
    NotFound(BlockId),

    #[error("a block with id {0} already exists")]
    DuplicateId(BlockId),
}

/// Session-level command failures.
#[derive(Debug, Error, PartialEq)]
pub enum PlannerError {
    #[error("foundation has not been configured; placement is unavailable")]
    FoundationNotConfigured,

    #[error("foundation is already configured and cannot be resized")]
    FoundationAlreadyConfigured,

    #[error("foundation extents must be positive and finite (got {length} x {width})")]
    InvalidFoundation { length: f64, width: f64 },

    #[error("block dimensions must be positive and finite (got {length} x {width} x {height})")]
    InvalidDimensions { length: f64, width: f64, height: f64 },

    #[error("drop position must be finite (got {x}, {y})")]
    InvalidPosition { x: f64, y: f64 },

    #[error("stage height must be positive and finite (got {0})")]
    InvalidStageHeight(f64),

    #[error("block {0} is in stock")]
    BlockInStock(BlockId),

    #[error("block {0} is already placed")]
    BlockNotInStock(BlockId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Loading, saving and exporting the persisted block record.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("malformed block record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("block record I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("block record lists id {0} more than once")]
    DuplicateId(BlockId),

    #[error("block record entry {id} is invalid: {reason}")]
    InvalidBlock { id: BlockId, reason: String },
}

/// Reading a `PlannerConfig` or manifest file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}
