// The current-layer cursor.
//
// Layers are not stored entities: a layer "exists" when a placed block carries
// its index (see `BlockStore::occupied_layers`). The cursor only says which
// tier the editor is working on. It starts at 0, steps up without bound, and
// stepping down from 0 stays at 0.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerCursor {
    current: u32,
}

impl LayerCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor already sitting on `layer`.
    pub fn at(layer: u32) -> Self {
        Self { current: layer }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Step up one layer. Returns the new layer.
    pub fn next(&mut self) -> u32 {
        self.current = self.current.saturating_add(1);
        self.current
    }

    /// Step down one layer, floored at 0. Returns the new layer.
    pub fn previous(&mut self) -> u32 {
        self.current = self.current.saturating_sub(1);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_ground() {
        assert_eq!(LayerCursor::new().current(), 0);
    }

    #[test]
    fn previous_at_zero_is_clamped() {
        let mut cursor = LayerCursor::new();
        assert_eq!(cursor.previous(), 0);
        assert_eq!(cursor.previous(), 0);
    }

    #[test]
    fn next_then_previous_returns_home() {
        for start in [0, 1, 5, 41] {
            let mut cursor = LayerCursor::at(start);
            cursor.next();
            assert_eq!(cursor.previous(), start);
        }
    }

    #[test]
    fn next_is_unbounded_in_practice() {
        let mut cursor = LayerCursor::new();
        for _ in 0..1000 {
            cursor.next();
        }
        assert_eq!(cursor.current(), 1000);
    }
}
