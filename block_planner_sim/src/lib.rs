// block_planner_sim: spatial placement engine for the block planner.
//
// Blocks of known length, width and height are arranged on a fixed
// rectangular foundation across stacked layers, with spare blocks held in a
// stock pool. This crate holds the model and every computation over it; a
// front end (the `planner` CLI in `block_planner_cli`, or anything else)
// issues commands and renders the results.
//
// Module overview:
// - `session.rs`:     PlannerSession, the state context; `apply()` dispatches commands.
// - `command.rs`:     PlannerCommand, every mutation a front end can request.
// - `event.rs`:       PlannerEvent, what a command changed.
// - `store.rs`:       BlockStore, insertion-ordered id → Block map with filtered views.
// - `block.rs`:       Block record and its stock/placed transitions.
// - `placement.rs`:   Edge snapping, drop resolution, stock entry jitter.
// - `layer.rs`:       Current-layer cursor (floored at 0, unbounded above).
// - `reconstruct.rs`: 2D → 3D boxes via the corner-pivot convention, scene framing.
// - `color.rs`:       Hash-derived, memoized HSL color per block type.
// - `manifest.rs`:    Seed manifests, including the default stock list.
// - `persist.rs`:     Flat JSON record list, bootstrap fallback, save file.
// - `config.rs`:      PlannerConfig, every tunable the engine reads.
// - `error.rs`:       StoreError / PlannerError / PersistError / ConfigError.
// - `types.rs`:       BlockId, Rotation, Point2, Vec3, Foundation.
// - `prng`:           Re-exported from `block_planner_prng`: xoshiro256++ with SplitMix64 seeding.
//
// **Determinism.** Given the same seed and the same command sequence, a
// session produces the same ids, positions and events. The only randomness is
// the session's `PlannerRng`. The color memo is the one hash map, and it is
// only ever used for lookups.

pub mod block;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod layer;
pub mod manifest;
pub mod persist;
pub mod placement;
pub use block_planner_prng as prng;
pub mod reconstruct;
pub mod session;
pub mod store;
pub mod types;
