// Placement engine: edge snapping, drop resolution, and stock entry.
//
// ## Edge snapping
//
// Snap references on each axis are the two foundation edges plus both edges
// of every other placed block, in that order and in store order. Placed blocks
// on every layer count, not just the candidate's own layer, so a block on
// layer 2 lines up with the block it sits on in layer 1.
//
// For each reference edge `e`, in order:
//   - if the candidate's leading edge is within tolerance of `e`, it moves to `e`;
//   - then, if its trailing edge is within tolerance of `e`, it moves so the
//     trailing edge sits on `e`.
// The position updates as it goes, so later matches see earlier moves and the
// last match wins. There is no nearest-edge preference.
//
// The snapped position is then clamped so the whole footprint is on the
// foundation. References and the candidate both use un-rotated extents.
//
// ## Drop resolution
//
// A drag ends at a proposed corner. If the drop point falls below the stock
// band under the editing viewport the block goes back to stock. Otherwise a
// footprint fully on the foundation is snapped; one that hangs off the edge is
// committed exactly where it was dropped.
//
// ## Stock entry
//
// A block leaving stock lands centered on the foundation, nudged by a small
// integer jitter on each axis. The jitter source is injected so everything
// else here stays deterministic.
//
// All functions are pure over a snapshot of the store; `session.rs` does the
// read-modify-write.

use crate::block::Block;
use crate::config::PlannerConfig;
use crate::prng::PlannerRng;
use crate::types::{Foundation, Point2};

// ---------------------------------------------------------------------------
// Jitter
// ---------------------------------------------------------------------------

/// Source of the integer offsets applied on stock entry.
pub trait JitterSource {
    /// An integer uniform in `[-radius, radius]`.
    fn jitter(&mut self, radius: u32) -> i64;
}

impl JitterSource for PlannerRng {
    fn jitter(&mut self, radius: u32) -> i64 {
        self.symmetric_jitter(radius)
    }
}

/// Always centers exactly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn jitter(&mut self, _radius: u32) -> i64 {
        0
    }
}

/// Corner for a block entering the foundation from stock: centered, then
/// offset by one jitter draw on X followed by one on Y.
pub fn entry_position(
    block: &Block,
    foundation: &Foundation,
    radius: u32,
    jitter: &mut impl JitterSource,
) -> Point2 {
    let jx = jitter.jitter(radius) as f64;
    let jy = jitter.jitter(radius) as f64;
    Point2::new(
        (foundation.length() - block.length) / 2.0 + jx,
        (foundation.width() - block.width) / 2.0 + jy,
    )
}

// ---------------------------------------------------------------------------
// Snapping
// ---------------------------------------------------------------------------

/// Reference edges on one axis: `0`, `extent`, then `start` and
/// `start + size` for each span.
pub fn snap_edges(extent: f64, spans: impl IntoIterator<Item = (f64, f64)>) -> Vec<f64> {
    let mut edges = vec![0.0, extent];
    for (start, size) in spans {
        edges.push(start);
        edges.push(start + size);
    }
    edges
}

/// Snap one axis against `edges` in order. Last match wins.
pub fn snap_axis(start: f64, size: f64, edges: &[f64], tolerance: f64) -> f64 {
    let mut pos = start;
    for &edge in edges {
        if (pos - edge).abs() <= tolerance {
            pos = edge;
        }
        if (pos + size - edge).abs() <= tolerance {
            pos = edge - size;
        }
    }
    pos
}

/// Keep `[pos, pos + size]` inside `[0, extent]`. When the block is larger
/// than the extent the lower bound wins.
pub fn clamp_axis(pos: f64, size: f64, extent: f64) -> f64 {
    pos.min(extent - size).max(0.0)
}

/// Snapped and clamped corner for `block` proposed at `proposed`.
///
/// `others` may contain anything from the store; stock blocks and `block`
/// itself are skipped.
pub fn snap<'a>(
    block: &Block,
    proposed: Point2,
    others: impl IntoIterator<Item = &'a Block>,
    foundation: &Foundation,
    tolerance: f64,
) -> Point2 {
    let refs: Vec<&Block> = others
        .into_iter()
        .filter(|other| other.is_placed() && other.id != block.id)
        .collect();
    let edges_x = snap_edges(foundation.length(), refs.iter().map(|o| (o.x, o.length)));
    let edges_y = snap_edges(foundation.width(), refs.iter().map(|o| (o.y, o.width)));

    let x = snap_axis(proposed.x, block.length, &edges_x, tolerance);
    let y = snap_axis(proposed.y, block.width, &edges_y, tolerance);
    Point2::new(
        clamp_axis(x, block.length, foundation.length()),
        clamp_axis(y, block.width, foundation.width()),
    )
}

// ---------------------------------------------------------------------------
// Drop resolution
// ---------------------------------------------------------------------------

/// Vertical layout of the 2D editor, in screen pixels.
///
/// The stage is split into an editing area on top and the stock strip
/// (`inventory_height`) below it. The foundation is vertically centered in the
/// editing area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub stage_height: f64,
    pub inventory_height: f64,
    pub stock_drop_margin: f64,
}

impl Viewport {
    pub fn new(stage_height: f64, config: &PlannerConfig) -> Self {
        Self {
            stage_height,
            inventory_height: config.inventory_height,
            stock_drop_margin: config.stock_drop_margin,
        }
    }

    pub fn editing_height(&self) -> f64 {
        self.stage_height - self.inventory_height
    }

    /// Screen Y of the foundation's top edge.
    pub fn foundation_top(&self, foundation: &Foundation) -> f64 {
        (self.editing_height() - foundation.width()) / 2.0
    }

    /// Screen Y below which a drop returns the block to stock.
    pub fn stock_boundary(&self) -> f64 {
        self.editing_height() + self.stock_drop_margin
    }

    /// Whether dropping `block` with its corner at `proposed` lands in the
    /// stock band. The drop point is the footprint's vertical middle.
    pub fn is_stock_drop(&self, foundation: &Foundation, block: &Block, proposed: Point2) -> bool {
        let drop_y = self.foundation_top(foundation) + proposed.y + block.width / 2.0;
        drop_y > self.stock_boundary()
    }
}

/// What a drag end does to a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DropOutcome {
    /// Back to the reserve pool; the proposed position is discarded.
    ReturnToStock,
    /// Fully on the foundation; committed at the snapped corner.
    Snapped(Point2),
    /// Partly or wholly off the foundation; committed as dropped.
    Unconstrained(Point2),
}

pub fn resolve_drop<'a>(
    block: &Block,
    proposed: Point2,
    others: impl IntoIterator<Item = &'a Block>,
    foundation: &Foundation,
    viewport: &Viewport,
    tolerance: f64,
) -> DropOutcome {
    if viewport.is_stock_drop(foundation, block, proposed) {
        return DropOutcome::ReturnToStock;
    }
    if foundation.contains(proposed, block.length, block.width) {
        DropOutcome::Snapped(snap(block, proposed, others, foundation, tolerance))
    } else {
        DropOutcome::Unconstrained(proposed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Dimensions;
    use crate::types::BlockId;

    const TOL: f64 = 8.0;

    fn foundation() -> Foundation {
        Foundation::new(2130.0, 660.0).unwrap()
    }

    fn placed(id: &str, length: f64, width: f64, x: f64, y: f64, layer: u32) -> Block {
        Block::new_in_stock(
            BlockId::from(id),
            Dimensions::new(length, width, 58.0).unwrap(),
            0,
        )
        .placed_at(Point2::new(x, y), layer)
    }

    fn none<'a>() -> Vec<&'a Block> {
        Vec::new()
    }

    /// Replays a fixed list of offsets.
    struct Scripted(Vec<i64>);

    impl JitterSource for Scripted {
        fn jitter(&mut self, _radius: u32) -> i64 {
            self.0.remove(0)
        }
    }

    #[test]
    fn edge_set_order() {
        let edges = snap_edges(100.0, [(10.0, 5.0), (50.0, 20.0)]);
        assert_eq!(edges, vec![0.0, 100.0, 10.0, 15.0, 50.0, 70.0]);
    }

    #[test]
    fn leading_edge_snaps_to_foundation_origin() {
        let b = placed("b", 240.0, 40.0, 0.0, 0.0, 0);
        let p = snap(&b, Point2::new(6.0, 7.5), none(), &foundation(), TOL);
        assert_eq!(p, Point2::new(0.0, 0.0));
    }

    #[test]
    fn trailing_edge_snaps_to_far_foundation_edge() {
        let b = placed("b", 240.0, 40.0, 0.0, 0.0, 0);
        let p = snap(&b, Point2::new(1885.0, 615.0), none(), &foundation(), TOL);
        assert_eq!(p, Point2::new(2130.0 - 240.0, 660.0 - 40.0));
    }

    #[test]
    fn beyond_tolerance_is_left_alone() {
        let b = placed("b", 240.0, 40.0, 0.0, 0.0, 0);
        let p = snap(&b, Point2::new(8.5, 300.0), none(), &foundation(), TOL);
        assert_eq!(p, Point2::new(8.5, 300.0));
    }

    #[test]
    fn gap_of_five_closes_to_shared_edge() {
        let a = placed("a", 240.0, 40.0, 100.0, 200.0, 0);
        let b = placed("b", 120.0, 40.0, 0.0, 0.0, 0);
        // A's right edge is at 340; B dropped 5 units to its right.
        let p = snap(&b, Point2::new(345.0, 203.0), [&a], &foundation(), TOL);
        assert_eq!(p, Point2::new(340.0, 200.0));
    }

    #[test]
    fn later_edges_win() {
        // Edges at 0 then 5 are both within reach of x = 3; 5 comes later.
        let b = placed("b", 10.0, 10.0, 0.0, 0.0, 0);
        let other = placed("o", 100.0, 10.0, 5.0, 300.0, 0);
        let p = snap(&b, Point2::new(3.0, 200.0), [&other], &foundation(), TOL);
        assert_eq!(p.x, 5.0);
    }

    #[test]
    fn all_layers_are_snap_references() {
        let below = placed("below", 240.0, 40.0, 500.0, 100.0, 0);
        let b = placed("b", 240.0, 40.0, 0.0, 0.0, 1);
        let p = snap(&b, Point2::new(504.0, 97.0), [&below], &foundation(), TOL);
        assert_eq!(p, Point2::new(500.0, 100.0));
    }

    #[test]
    fn self_and_stock_blocks_are_ignored() {
        let b = placed("b", 100.0, 40.0, 300.0, 300.0, 0);
        let stocked = placed("s", 100.0, 40.0, 400.0, 400.0, 0).returned_to_stock();
        // Stale copy of `b` at its old position must not attract it.
        let p = snap(&b, Point2::new(305.0, 305.0), [&b, &stocked], &foundation(), TOL);
        assert_eq!(p, Point2::new(305.0, 305.0));
    }

    #[test]
    fn snapped_result_is_clamped_inside() {
        // A reference just outside the foundation pulls the candidate out;
        // the clamp brings it back.
        let outside = placed("o", 100.0, 40.0, -104.0, 100.0, 0);
        let b = placed("b", 100.0, 40.0, 0.0, 0.0, 0);
        let p = snap(&b, Point2::new(2.0, 100.0), [&outside], &foundation(), TOL);
        assert!(p.x >= 0.0);
        assert_eq!(p.y, 100.0);
    }

    #[test]
    fn snapping_settles_on_a_sparse_layout() {
        let f = foundation();
        let others = [
            placed("a", 240.0, 40.0, 100.0, 200.0, 0),
            placed("c", 120.0, 50.0, 900.0, 0.0, 1),
            placed("d", 65.0, 40.0, 2065.0, 620.0, 0),
        ];
        let b = placed("b", 120.0, 40.0, 0.0, 0.0, 0);
        for proposed in [
            Point2::new(345.0, 203.0),
            Point2::new(1016.0, 46.0),
            Point2::new(1940.0, 615.0),
            Point2::new(700.0, 400.0),
            Point2::new(3.0, 655.0),
        ] {
            let once = snap(&b, proposed, &others, &f, TOL);
            let twice = snap(&b, once, &others, &f, TOL);
            assert_eq!(once, twice, "not idempotent from {proposed}");
        }
    }

    #[test]
    fn in_bounds_candidates_stay_in_bounds() {
        let f = foundation();
        let others = [placed("a", 240.0, 40.0, 1890.0, 0.0, 0)];
        let b = placed("b", 240.0, 50.0, 0.0, 0.0, 0);
        for step in 0..=40 {
            let x = step as f64 * (1890.0 / 40.0);
            let y = step as f64 * (610.0 / 40.0);
            let p = snap(&b, Point2::new(x, y), &others, &f, TOL);
            assert!(f.contains(p, b.length, b.width), "{p} escaped");
        }
    }

    #[test]
    fn entry_is_centered_plus_jitter() {
        let b = placed("b", 240.0, 40.0, 0.0, 0.0, 0).returned_to_stock();
        let p = entry_position(&b, &foundation(), 10, &mut Scripted(vec![-10, 7]));
        assert_eq!(p, Point2::new(945.0 - 10.0, 310.0 + 7.0));
        assert_eq!(
            entry_position(&b, &foundation(), 10, &mut NoJitter),
            Point2::new(945.0, 310.0)
        );
    }

    #[test]
    fn rng_jitter_stays_in_band() {
        let b = placed("b", 240.0, 40.0, 0.0, 0.0, 0);
        let mut rng = PlannerRng::new(3);
        for _ in 0..500 {
            let p = entry_position(&b, &foundation(), 10, &mut rng);
            assert!((935.0..=955.0).contains(&p.x));
            assert!((300.0..=320.0).contains(&p.y));
        }
    }

    fn viewport() -> Viewport {
        // Editing area 720 px tall; foundation top at (720 - 660) / 2 = 30.
        Viewport::new(900.0, &PlannerConfig::default())
    }

    #[test]
    fn viewport_geometry() {
        let v = viewport();
        assert_eq!(v.editing_height(), 720.0);
        assert_eq!(v.foundation_top(&foundation()), 30.0);
        assert_eq!(v.stock_boundary(), 800.0);
    }

    #[test]
    fn deep_drop_returns_to_stock() {
        let b = placed("b", 240.0, 40.0, 100.0, 100.0, 0);
        // 30 + 760 + 20 = 810 > 800
        let proposed = Point2::new(100.0, 760.0);
        let outcome = resolve_drop(&b, proposed, none(), &foundation(), &viewport(), TOL);
        assert_eq!(outcome, DropOutcome::ReturnToStock);
    }

    #[test]
    fn drop_on_the_boundary_stays_out_of_stock() {
        let b = placed("b", 240.0, 40.0, 100.0, 100.0, 0);
        // 30 + 750 + 20 = 800, not strictly below.
        let proposed = Point2::new(100.0, 750.0);
        let outcome = resolve_drop(&b, proposed, none(), &foundation(), &viewport(), TOL);
        assert_eq!(outcome, DropOutcome::Unconstrained(proposed));
    }

    #[test]
    fn overhanging_drop_is_committed_raw() {
        let b = placed("b", 240.0, 40.0, 100.0, 100.0, 0);
        let proposed = Point2::new(1895.0, 3.0);
        let outcome = resolve_drop(&b, proposed, none(), &foundation(), &viewport(), TOL);
        assert_eq!(outcome, DropOutcome::Unconstrained(proposed));
    }

    #[test]
    fn inside_drop_is_snapped() {
        let a = placed("a", 240.0, 40.0, 100.0, 200.0, 0);
        let b = placed("b", 120.0, 40.0, 800.0, 500.0, 0);
        let proposed = Point2::new(345.0, 203.0);
        let outcome = resolve_drop(&b, proposed, [&a], &foundation(), &viewport(), TOL);
        assert_eq!(outcome, DropOutcome::Snapped(Point2::new(340.0, 200.0)));
    }

    #[test]
    fn chained_edges_can_move_a_snapped_block_again() {
        // Each pass follows the last matching edge, so a result that lands
        // near a later edge moves again on the next pass.
        let f = Foundation::new(300.0, 400.0).unwrap();
        let others = [
            placed("a", 49.0, 10.0, 49.0, 380.0, 0),
            placed("c", 56.0, 10.0, 131.0, 380.0, 0),
            placed("d", 58.0, 10.0, 126.0, 380.0, 0),
            placed("e", 43.0, 10.0, 213.0, 380.0, 0),
        ];
        let b = placed("b", 46.0, 10.0, 0.0, 0.0, 0);
        let once = snap(&b, Point2::new(144.0, 250.0), &others, &f, TOL);
        assert_eq!(once, Point2::new(138.0, 250.0));
        let twice = snap(&b, once, &others, &f, TOL);
        assert_eq!(twice, Point2::new(126.0, 250.0));
    }
}
