// Deterministic display colors for block types.
//
// A block type is its `(length, width)` pair. The type key `"{length}x{width}"`
// is hashed with the 31-multiplier string hash (`h = h * 31 + unit`, wrapping
// at 32 bits), the hash is reduced modulo 360 to a hue, and saturation and
// lightness come from config. No palette table is needed and the same type
// always gets the same hue, across sessions too.
//
// Number formatting follows shortest round-trip text, so `120.0` keys as
// `"120"` and `12.5` as `"12.5"`. Keys are plain ASCII.
//
// Results are memoized per key for the life of the assigner. The key space is
// the set of distinct block types in a session, so there is no eviction.

use crate::config::PlannerConfig;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// An HSL color. Displays as CSS `hsl(h,s%,l%)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({},{}%,{}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// The composite key for a block type.
pub fn type_key(length: f64, width: f64) -> String {
    format!("{length}x{width}")
}

/// 32-bit wrapping `h * 31 + unit` hash over the key's bytes.
pub fn hash_key(key: &str) -> u32 {
    key.bytes().fold(0u32, |h, unit| {
        (h << 5).wrapping_sub(h).wrapping_add(u32::from(unit))
    })
}

/// Hue in `0..360` for a block type.
pub fn hue_for(length: f64, width: f64) -> u16 {
    (hash_key(&type_key(length, width)) % 360) as u16
}

/// Memoizing color lookup.
#[derive(Clone, Debug)]
pub struct ColorAssigner {
    saturation: u8,
    lightness: u8,
    memo: FxHashMap<String, Hsl>,
}

impl ColorAssigner {
    pub fn new(saturation: u8, lightness: u8) -> Self {
        Self {
            saturation,
            lightness,
            memo: FxHashMap::default(),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.color_saturation, config.color_lightness)
    }

    pub fn color_for(&mut self, length: f64, width: f64) -> Hsl {
        let key = type_key(length, width);
        if let Some(color) = self.memo.get(&key) {
            return *color;
        }
        let color = Hsl {
            hue: (hash_key(&key) % 360) as u16,
            saturation: self.saturation,
            lightness: self.lightness,
        };
        self.memo.insert(key, color);
        color
    }

    /// Number of distinct block types seen so far.
    pub fn cached_types(&self) -> usize {
        self.memo.len()
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}
