// Planning session: the context that owns all engine state.
//
// `PlannerSession` bundles the config, the foundation (absent until set
// once), the layer cursor, the block store, the PRNG, and the color memo.
// Front ends mutate it only through `apply(PlannerCommand)`, which validates
// everything it needs up front, then writes the store once. On error nothing
// has changed.
//
// Initialization order: construct, optionally `bootstrap` or
// `seed_from_manifest` the store, then `set_foundation` before any placement
// command. Placement commands issued earlier fail with
// `FoundationNotConfigured` instead of computing geometry against nothing.
//
// The session is single-writer. All reads that feed a snap (the "other
// blocks" set) happen inside the same `apply` call that commits the result,
// so a snap always sees a fully committed store.
//
// See also: `command.rs` / `event.rs` for the input and output types,
// `placement.rs` for the geometry, `persist.rs` for bootstrap and save.

use crate::block::{Block, Dimensions};
use crate::color::{ColorAssigner, Hsl};
use crate::command::PlannerCommand;
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::event::PlannerEvent;
use crate::layer::LayerCursor;
use crate::manifest::Manifest;
use crate::persist::{self, Bootstrap};
use crate::placement::{self, DropOutcome, Viewport};
use crate::prng::PlannerRng;
use crate::reconstruct::{self, SceneBox, SceneFraming};
use crate::store::BlockStore;
use crate::types::{BlockId, Foundation, Point2, is_positive};

#[derive(Clone, Debug)]
pub struct PlannerSession {
    config: PlannerConfig,
    foundation: Option<Foundation>,
    layer: LayerCursor,
    store: BlockStore,
    rng: PlannerRng,
    colors: ColorAssigner,
}

impl PlannerSession {
    /// Empty session with default config.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, PlannerConfig::default())
    }

    pub fn with_config(seed: u64, config: PlannerConfig) -> Self {
        let colors = ColorAssigner::from_config(&config);
        Self {
            config,
            foundation: None,
            layer: LayerCursor::new(),
            store: BlockStore::new(),
            rng: PlannerRng::new(seed),
            colors,
        }
    }

    /// Replace the store wholesale, e.g. with one loaded from disk.
    pub fn with_store(mut self, store: BlockStore) -> Self {
        self.store = store;
        self
    }

    /// Start the layer cursor somewhere other than the ground.
    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = LayerCursor::at(layer);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn current_layer(&self) -> u32 {
        self.layer.current()
    }

    /// Placed blocks on the current layer.
    pub fn current_layer_blocks(&self) -> impl Iterator<Item = &Block> {
        self.store.on_layer(self.layer.current())
    }

    // -----------------------------------------------------------------------
    // Foundation
    // -----------------------------------------------------------------------

    /// One-time foundation setup. There is no resize.
    pub fn set_foundation(&mut self, length: f64, width: f64) -> Result<Foundation, PlannerError> {
        if self.foundation.is_some() {
            return Err(PlannerError::FoundationAlreadyConfigured);
        }
        let foundation = Foundation::new(length, width)?;
        tracing::info!(%foundation, "foundation configured");
        self.foundation = Some(foundation);
        Ok(foundation)
    }

    pub fn foundation(&self) -> Option<&Foundation> {
        self.foundation.as_ref()
    }

    pub fn require_foundation(&self) -> Result<Foundation, PlannerError> {
        self.foundation.ok_or(PlannerError::FoundationNotConfigured)
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    /// Replace the store per `persist::bootstrap`, seeding at the current
    /// layer.
    pub fn bootstrap(
        &mut self,
        saved: Option<&str>,
        manifest: &Manifest,
    ) -> Result<Bootstrap, PlannerError> {
        let (store, outcome) =
            persist::bootstrap(saved, manifest, self.layer.current(), &mut self.rng)?;
        self.store = store;
        Ok(outcome)
    }

    /// Append the expanded manifest to the store. Returns the new ids.
    pub fn seed_from_manifest(
        &mut self,
        manifest: &Manifest,
    ) -> Result<Vec<BlockId>, PlannerError> {
        let blocks = manifest.expand(self.layer.current(), &mut self.rng)?;
        let ids = blocks.iter().map(|b| b.id.clone()).collect();
        self.store.add(blocks)?;
        Ok(ids)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn apply(&mut self, command: PlannerCommand) -> Result<Vec<PlannerEvent>, PlannerError> {
        tracing::debug!(?command, layer = self.layer.current(), "applying command");
        match command {
            PlannerCommand::AddBlocks {
                length,
                width,
                height,
                quantity,
            } => self.add_blocks(Dimensions::new(length, width, height)?, quantity),
            PlannerCommand::RemoveBlock { id } => {
                self.store.remove(&id)?;
                Ok(vec![PlannerEvent::BlockRemoved { id }])
            }
            PlannerCommand::MoveFromStock { id } => self.move_from_stock(id),
            PlannerCommand::MoveToStock { id } => self.move_to_stock(id),
            PlannerCommand::DropBlock {
                id,
                x,
                y,
                stage_height,
            } => self.drop_block(id, Point2::new(x, y), stage_height),
            PlannerCommand::Rotate { id } => {
                let rotated = self.store.get(&id)?.rotated();
                let rotation = rotated.rotation;
                self.store.update(rotated)?;
                Ok(vec![PlannerEvent::BlockRotated { id, rotation }])
            }
            PlannerCommand::NextLayer => {
                let layer = self.layer.next();
                Ok(vec![PlannerEvent::LayerChanged { layer }])
            }
            PlannerCommand::PreviousLayer => {
                let before = self.layer.current();
                let layer = self.layer.previous();
                if layer == before {
                    Ok(Vec::new())
                } else {
                    Ok(vec![PlannerEvent::LayerChanged { layer }])
                }
            }
        }
    }

    fn add_blocks(
        &mut self,
        dims: Dimensions,
        quantity: u32,
    ) -> Result<Vec<PlannerEvent>, PlannerError> {
        if quantity == 0 {
            return Ok(Vec::new());
        }
        let layer = self.layer.current();
        let blocks: Vec<Block> = (0..quantity)
            .map(|_| Block::new_in_stock(BlockId::generate(&mut self.rng), dims, layer))
            .collect();
        let ids: Vec<BlockId> = blocks.iter().map(|b| b.id.clone()).collect();
        self.store.add(blocks)?;
        Ok(vec![PlannerEvent::BlocksAdded { ids }])
    }

    fn move_from_stock(&mut self, id: BlockId) -> Result<Vec<PlannerEvent>, PlannerError> {
        let foundation = self.require_foundation()?;
        let block = self.store.get(&id)?;
        if block.is_placed() {
            return Err(PlannerError::BlockNotInStock(id));
        }
        let position = placement::entry_position(
            block,
            &foundation,
            self.config.jitter_radius,
            &mut self.rng,
        );
        let layer = self.layer.current();
        let placed = block.placed_at(position, layer);
        self.store.update(placed)?;
        Ok(vec![PlannerEvent::BlockPlaced { id, position, layer }])
    }

    fn move_to_stock(&mut self, id: BlockId) -> Result<Vec<PlannerEvent>, PlannerError> {
        let block = self.store.get(&id)?;
        if block.in_stock {
            return Err(PlannerError::BlockInStock(id));
        }
        let stocked = block.returned_to_stock();
        self.store.update(stocked)?;
        Ok(vec![PlannerEvent::BlockStocked { id }])
    }

    /// Drag end. Coordinates must be finite and the stage height positive;
    /// anything else is rejected before the store is read.
    fn drop_block(
        &mut self,
        id: BlockId,
        proposed: Point2,
        stage_height: f64,
    ) -> Result<Vec<PlannerEvent>, PlannerError> {
        if !proposed.x.is_finite() || !proposed.y.is_finite() {
            return Err(PlannerError::InvalidPosition {
                x: proposed.x,
                y: proposed.y,
            });
        }
        if !is_positive(stage_height) {
            return Err(PlannerError::InvalidStageHeight(stage_height));
        }
        let foundation = self.require_foundation()?;
        let block = self.store.get(&id)?;
        if block.in_stock {
            return Err(PlannerError::BlockInStock(id));
        }
        let viewport = Viewport::new(stage_height, &self.config);
        let outcome = placement::resolve_drop(
            block,
            proposed,
            self.store.iter(),
            &foundation,
            &viewport,
            self.config.snap_tolerance,
        );
        tracing::debug!(%id, %proposed, ?outcome, "drop resolved");

        let (updated, event) = match outcome {
            DropOutcome::ReturnToStock => {
                (block.returned_to_stock(), PlannerEvent::BlockStocked { id })
            }
            DropOutcome::Snapped(position) => (
                block.moved_to(position),
                PlannerEvent::BlockMoved {
                    id,
                    position,
                    snapped: true,
                },
            ),
            DropOutcome::Unconstrained(position) => (
                block.moved_to(position),
                PlannerEvent::BlockMoved {
                    id,
                    position,
                    snapped: false,
                },
            ),
        };
        self.store.update(updated)?;
        Ok(vec![event])
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn color_for(&mut self, length: f64, width: f64) -> Hsl {
        self.colors.color_for(length, width)
    }

    /// 3D boxes for every placed block.
    pub fn scene(&mut self) -> Result<Vec<SceneBox>, PlannerError> {
        let foundation = self.require_foundation()?;
        Ok(reconstruct::scene(&self.store, &foundation, &mut self.colors))
    }

    pub fn framing(&self) -> Result<SceneFraming, PlannerError> {
        Ok(reconstruct::framing(&self.require_foundation()?))
    }
}
