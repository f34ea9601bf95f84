// Persistence adapter: the block store as a flat record list.
//
// The persisted form is one JSON array of block records in store order, each
// `{ id, length, width, height, x, y, rotation, layer, inStock }`. Loading a
// record and saving it again reproduces it field for field; ids are kept
// verbatim, never regenerated.
//
// Loading validates more than the JSON shape: a record that repeats an id, or
// carries a non-positive dimension, is rejected as a whole. An illegal
// rotation value is caught by `Rotation`'s deserializer and surfaces as a
// parse error.
//
// `bootstrap` is the startup path. A missing record seeds the store from a
// manifest. A malformed one is discarded and the manifest reseeded, but the
// cause comes back in `Bootstrap::Reseeded` and is logged at warn level, so
// the caller can tell the user their saved layout was lost.
//
// See also: `manifest.rs` for seeding, `store.rs` for the in-memory side.

use crate::block::{Block, Dimensions};
use crate::error::{PersistError, PlannerError, StoreError};
use crate::manifest::Manifest;
use crate::prng::PlannerRng;
use crate::store::BlockStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Serialize the store as the persisted record list.
pub fn to_json(store: &BlockStore) -> Result<String, PersistError> {
    let records: Vec<&Block> = store.iter().collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parse a persisted record list back into a store.
pub fn from_json(json: &str) -> Result<BlockStore, PersistError> {
    let records: Vec<Block> = serde_json::from_str(json)?;

    for block in &records {
        if let Err(e) = Dimensions::new(block.length, block.width, block.height) {
            return Err(PersistError::InvalidBlock {
                id: block.id.clone(),
                reason: e.to_string(),
            });
        }
    }

    let mut store = BlockStore::new();
    store.add(records).map_err(|e| match e {
        StoreError::DuplicateId(id) => PersistError::DuplicateId(id),
        // `add` never looks anything up.
        StoreError::NotFound(id) => PersistError::InvalidBlock {
            id,
            reason: "unknown id".to_owned(),
        },
    })?;
    Ok(store)
}

/// The full serialized store as raw bytes, for writing out as a plain file.
pub fn export(store: &BlockStore) -> Result<Vec<u8>, PersistError> {
    Ok(to_json(store)?.into_bytes())
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// How `bootstrap` filled the store.
#[derive(Debug)]
pub enum Bootstrap {
    /// A saved record was loaded.
    Restored { count: usize },
    /// Nothing was saved; the manifest was expanded.
    Seeded { count: usize },
    /// The saved record was unusable and has been replaced by the manifest.
    Reseeded { count: usize, cause: PersistError },
}

impl Bootstrap {
    pub fn count(&self) -> usize {
        match self {
            Bootstrap::Restored { count }
            | Bootstrap::Seeded { count }
            | Bootstrap::Reseeded { count, .. } => *count,
        }
    }
}

/// Build the startup store from `saved`, falling back to `manifest` at
/// `layer`. Only an invalid manifest is an error.
pub fn bootstrap(
    saved: Option<&str>,
    manifest: &Manifest,
    layer: u32,
    rng: &mut PlannerRng,
) -> Result<(BlockStore, Bootstrap), PlannerError> {
    let cause = match saved.map(from_json) {
        Some(Ok(store)) => {
            let count = store.len();
            tracing::info!(count, "restored saved blocks");
            return Ok((store, Bootstrap::Restored { count }));
        }
        Some(Err(cause)) => Some(cause),
        None => None,
    };

    let mut store = BlockStore::new();
    store.add(manifest.expand(layer, rng)?)?;
    let count = store.len();

    let outcome = match cause {
        Some(cause) => {
            tracing::warn!(
                %cause,
                count,
                "discarded malformed saved blocks; reseeded from manifest"
            );
            Bootstrap::Reseeded { count, cause }
        }
        None => {
            tracing::info!(count, "seeded blocks from manifest");
            Bootstrap::Seeded { count }
        }
    };
    Ok((store, outcome))
}

// ---------------------------------------------------------------------------
// Save file
// ---------------------------------------------------------------------------

/// The single on-disk record.
#[derive(Clone, Debug)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw record text, or `None` if nothing has been saved.
    pub fn read(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, store: &BlockStore) -> Result<(), PersistError> {
        std::fs::write(&self.path, to_json(store)?)?;
        tracing::debug!(path = %self.path.display(), count = store.len(), "saved blocks");
        Ok(())
    }

    /// Load and validate the saved record, if any.
    pub fn load(&self) -> Result<Option<BlockStore>, PersistError> {
        self.read()?.as_deref().map(from_json).transpose()
    }

    /// Delete the record so the next start reseeds. Clearing an absent
    /// record is fine.
    pub fn clear(&self) -> Result<(), PersistError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
