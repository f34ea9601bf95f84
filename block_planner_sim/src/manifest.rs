// Seed manifests: block types and quantities that fill the stock of a fresh
// session.
//
// A manifest is a list of `(length, width, height, quantity)` entries. Each
// entry expands into `quantity` individual stock blocks with fresh ids, the
// entry's footprint, `x = y = 0`, rotation 0, and the layer current at seed
// time. The default manifest is the stock list the editor ships with.

use crate::block::{Block, Dimensions};
use crate::error::{ConfigError, PlannerError};
use crate::prng::PlannerRng;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub quantity: u32,
}

impl ManifestEntry {
    pub const fn new(length: f64, width: f64, height: f64, quantity: u32) -> Self {
        Self {
            length,
            width,
            height,
            quantity,
        }
    }
}

/// An ordered list of block types to seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        const H: f64 = 58.0;
        let entries = vec![
            ManifestEntry::new(240.0, 40.0, H, 37),
            ManifestEntry::new(110.0, 40.0, H, 3),
            ManifestEntry::new(120.0, 40.0, H, 3),
            ManifestEntry::new(65.0, 40.0, H, 1),
            ManifestEntry::new(240.0, 30.0, H, 8),
            ManifestEntry::new(130.0, 30.0, H, 2),
            ManifestEntry::new(150.0, 30.0, H, 1),
            ManifestEntry::new(110.0, 30.0, H, 1),
            ManifestEntry::new(115.0, 30.0, H, 1),
            ManifestEntry::new(240.0, 50.0, H, 20),
            ManifestEntry::new(180.0, 50.0, H, 5),
            ManifestEntry::new(130.0, 50.0, H, 1),
            ManifestEntry::new(90.0, 50.0, H, 3),
            ManifestEntry::new(140.0, 50.0, H, 1),
            ManifestEntry::new(120.0, 50.0, H, 48),
            ManifestEntry::new(80.0, 50.0, H, 1),
            ManifestEntry::new(100.0, 50.0, H, 1),
            ManifestEntry::new(110.0, 50.0, H, 1),
            ManifestEntry::new(127.0, 47.0, H, 1),
        ];
        Self { entries }
    }
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Total number of blocks the manifest expands to.
    pub fn block_count(&self) -> usize {
        self.entries.iter().map(|e| e.quantity as usize).sum()
    }

    /// Expand into stock blocks tagged with `layer`. Fails on the first entry
    /// with a non-positive dimension; nothing is produced in that case.
    pub fn expand(&self, layer: u32, rng: &mut PlannerRng) -> Result<Vec<Block>, PlannerError> {
        let dims = self
            .entries
            .iter()
            .map(|e| Dimensions::new(e.length, e.width, e.height))
            .collect::<Result<Vec<_>, _>>()?;

        let mut blocks = Vec::with_capacity(self.block_count());
        for (entry, dims) in self.entries.iter().zip(dims) {
            for _ in 0..entry.quantity {
                blocks.push(Block::new_in_stock(BlockId::generate(rng), dims, layer));
            }
        }
        Ok(blocks)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn default_manifest_shape() {
        let manifest = Manifest::default();
        assert_eq!(manifest.entries.len(), 19);
        assert_eq!(manifest.block_count(), 139);
        assert!(manifest.entries.iter().all(|e| e.height == 58.0));
    }

    #[test]
    fn expansion_makes_unique_stock_blocks() {
        let mut rng = PlannerRng::new(42);
        let blocks = Manifest::default().expand(0, &mut rng).unwrap();
        assert_eq!(blocks.len(), 139);
        assert!(blocks.iter().all(|b| b.in_stock && b.x == 0.0 && b.y == 0.0));
        let ids: BTreeSet<_> = blocks.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids.len(), blocks.len());
        // Entry order is preserved: 37 long blocks first.
        assert!(blocks[..37].iter().all(|b| b.length == 240.0 && b.width == 40.0));
        assert_eq!(blocks[37].length, 110.0);
    }

    #[test]
    fn seeded_blocks_take_the_current_layer() {
        let mut rng = PlannerRng::new(1);
        let manifest = Manifest::new(vec![ManifestEntry::new(100.0, 50.0, 30.0, 2)]);
        let blocks = manifest.expand(3, &mut rng).unwrap();
        assert!(blocks.iter().all(|b| b.layer == 3));
    }

    #[test]
    fn zero_quantity_entries_contribute_nothing() {
        let mut rng = PlannerRng::new(1);
        let manifest = Manifest::new(vec![
            ManifestEntry::new(100.0, 50.0, 30.0, 0),
            ManifestEntry::new(60.0, 20.0, 30.0, 1),
        ]);
        let blocks = manifest.expand(0, &mut rng).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].length, 60.0);
    }

    #[test]
    fn bad_dimensions_reject_the_whole_manifest() {
        let mut rng = PlannerRng::new(1);
        let manifest = Manifest::new(vec![
            ManifestEntry::new(100.0, 50.0, 30.0, 1),
            ManifestEntry::new(100.0, 0.0, 30.0, 1),
        ]);
        assert!(matches!(
            manifest.expand(0, &mut rng),
            Err(PlannerError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn manifest_json_is_a_plain_list() {
        let manifest = Manifest::from_json(
            r#"[{"length": 240, "width": 40, "height": 58, "quantity": 3}]"#,
        )
        .unwrap();
        assert_eq!(manifest.entries, vec![ManifestEntry::new(240.0, 40.0, 58.0, 3)]);
    }
}
