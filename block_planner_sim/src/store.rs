// In-memory block collection. This is the only mutable state in the engine.
//
// Blocks are held in an insertion-ordered map from id to record. Ordering
// matters because the persisted form is an ordered list: loading a record and
// saving it again must give back the same list. Removal uses `shift_remove`
// so the survivors keep their relative order.
//
// Filtered views (stock, placed, per-layer) are derived by scanning; the
// collection is a few hundred blocks at most.

use crate::block::Block;
use crate::error::StoreError;
use crate::types::BlockId;
use indexmap::IndexMap;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockStore {
    blocks: IndexMap<BlockId, Block>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `blocks` in order. Each must carry an id not already present;
    /// on a collision nothing is inserted.
    pub fn add(&mut self, blocks: Vec<Block>) -> Result<(), StoreError> {
        let mut incoming = BTreeSet::new();
        for block in &blocks {
            if self.blocks.contains_key(&block.id) || !incoming.insert(&block.id) {
                return Err(StoreError::DuplicateId(block.id.clone()));
            }
        }
        for block in blocks {
            self.blocks.insert(block.id.clone(), block);
        }
        Ok(())
    }

    /// Delete and return the block with `id`.
    pub fn remove(&mut self, id: &BlockId) -> Result<Block, StoreError> {
        self.blocks
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Replace the stored record with the same id, wholesale.
    pub fn update(&mut self, block: Block) -> Result<(), StoreError> {
        match self.blocks.get_mut(&block.id) {
            Some(slot) => {
                *slot = block;
                Ok(())
            }
            None => Err(StoreError::NotFound(block.id)),
        }
    }

    pub fn get(&self, id: &BlockId) -> Result<&Block, StoreError> {
        self.blocks
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn query<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Block> + 'a
    where
        P: Fn(&Block) -> bool + 'a,
    {
        self.blocks.values().filter(move |b| predicate(b))
    }

    /// The reserve pool.
    pub fn stock(&self) -> impl Iterator<Item = &Block> {
        self.query(|b| b.in_stock)
    }

    /// Every placed block, any layer.
    pub fn placed(&self) -> impl Iterator<Item = &Block> {
        self.query(Block::is_placed)
    }

    /// Placed blocks on `layer`.
    pub fn on_layer(&self, layer: u32) -> impl Iterator<Item = &Block> {
        self.query(move |b| b.is_placed() && b.layer == layer)
    }

    /// Distinct layers that hold at least one placed block, ascending.
    pub fn occupied_layers(&self) -> BTreeSet<u32> {
        self.placed().map(|b| b.layer).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Dimensions;
    use crate::types::Point2;

    fn block(id: &str) -> Block {
        Block::new_in_stock(
            BlockId::from(id),
            Dimensions::new(120.0, 40.0, 58.0).unwrap(),
            0,
        )
    }

    fn store_of(ids: &[&str]) -> BlockStore {
        let mut store = BlockStore::new();
        store.add(ids.iter().map(|id| block(id)).collect()).unwrap();
        store
    }

    #[test]
    fn add_preserves_order() {
        let store = store_of(&["c", "a", "b"]);
        let ids: Vec<&str> = store.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn add_rejects_existing_and_repeated_ids() {
        let mut store = store_of(&["a"]);
        assert_eq!(
            store.add(vec![block("b"), block("a")]),
            Err(StoreError::DuplicateId(BlockId::from("a")))
        );
        assert_eq!(
            store.add(vec![block("c"), block("c")]),
            Err(StoreError::DuplicateId(BlockId::from("c")))
        );
        // Rejected batches are all-or-nothing.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_keeps_survivor_order() {
        let mut store = store_of(&["a", "b", "c"]);
        let removed = store.remove(&BlockId::from("b")).unwrap();
        assert_eq!(removed.id.as_str(), "b");
        let ids: Vec<&str> = store.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut store = store_of(&["a"]);
        let ghost = BlockId::from("ghost");
        assert_eq!(store.remove(&ghost), Err(StoreError::NotFound(ghost.clone())));
        assert_eq!(
            store.update(block("ghost")),
            Err(StoreError::NotFound(ghost.clone()))
        );
        assert!(store.get(&ghost).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_wholesale() {
        let mut store = store_of(&["a", "b"]);
        let moved = store
            .get(&BlockId::from("a"))
            .unwrap()
            .placed_at(Point2::new(10.0, 20.0), 4);
        store.update(moved.clone()).unwrap();
        assert_eq!(store.get(&BlockId::from("a")).unwrap(), &moved);
        // Position in the order is unchanged.
        assert_eq!(store.iter().next().unwrap().id.as_str(), "a");
    }

    #[test]
    fn filtered_views() {
        let mut store = store_of(&["s1", "p0", "p1", "p1b", "s2"]);
        for (id, layer) in [("p0", 0), ("p1", 1), ("p1b", 1)] {
            let placed = store
                .get(&BlockId::from(id))
                .unwrap()
                .placed_at(Point2::new(0.0, 0.0), layer);
            store.update(placed).unwrap();
        }

        let stock: Vec<&str> = store.stock().map(|b| b.id.as_str()).collect();
        assert_eq!(stock, vec!["s1", "s2"]);
        let layer1: Vec<&str> = store.on_layer(1).map(|b| b.id.as_str()).collect();
        assert_eq!(layer1, vec!["p1", "p1b"]);
        assert_eq!(store.placed().count(), 3);
        assert_eq!(store.on_layer(7).count(), 0);
        assert_eq!(store.occupied_layers().into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn stock_blocks_never_count_toward_a_layer() {
        // Stock blocks keep whatever layer they were created with.
        let mut store = BlockStore::new();
        store
            .add(vec![Block::new_in_stock(
                BlockId::from("s"),
                Dimensions::new(1.0, 1.0, 1.0).unwrap(),
                2,
            )])
            .unwrap();
        assert_eq!(store.on_layer(2).count(), 0);
        assert!(store.occupied_layers().is_empty());
    }
}
