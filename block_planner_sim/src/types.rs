// Core value types shared across the planner.
//
// Coordinates come in two flavors. `Point2` is foundation-local 2D editing
// space: origin at the foundation's top-left corner, X along the foundation
// length, Y along its width. `Vec3` is 3D reconstruction space: X is the same
// as 2D X, Y points up, Z is 2D Y.
//
// Block ids are opaque strings. Fresh ids are UUID v4 text minted from the
// session's `PlannerRng`; ids read back from a saved record are kept verbatim,
// whatever their shape.

use crate::error::PlannerError;
use crate::prng::PlannerRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Block ids
// ---------------------------------------------------------------------------

/// Opaque, immutable block identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Mint a new id in 8-4-4-4-12 UUID v4 form.
    ///
    /// Version nibble (byte 6) is forced to `0100`, variant bits (byte 8) to
    /// `10`, as RFC 4122 requires.
    pub fn generate(rng: &mut PlannerRng) -> Self {
        let mut b = rng.next_128_bits();
        b[6] = (b[6] & 0x0F) | 0x40;
        b[8] = (b[8] & 0x3F) | 0x80;
        let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
        Self(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Quarter-turn rotation of a block footprint about its stored corner.
///
/// Persisted as the bare degree number (0, 90, 180 or 270). Any other number
/// in a saved record is a schema error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Next step of the 0 → 90 → 180 → 270 → 0 cycle.
    pub const fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// True for 90 and 270, where the in-plane extents trade places.
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

impl Serialize for Rotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.degrees())
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let degrees = u16::deserialize(deserializer)?;
        Rotation::from_degrees(degrees).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "rotation must be one of 0, 90, 180, 270 (got {degrees})"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A point in foundation-local 2D editing space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A point or extent in 3D reconstruction space. Y is up.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Foundation
// ---------------------------------------------------------------------------

/// The fixed rectangle blocks are arranged on. `length` runs along X,
/// `width` along Y. Both are positive and finite; there is no resize.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Foundation {
    length: f64,
    width: f64,
}

impl Foundation {
    pub fn new(length: f64, width: f64) -> Result<Self, PlannerError> {
        if !is_positive(length) || !is_positive(width) {
            return Err(PlannerError::InvalidFoundation { length, width });
        }
        Ok(Self { length, width })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Whether an un-rotated `length × width` footprint with its top-left
    /// corner at `corner` lies entirely on the foundation (edges inclusive).
    pub fn contains(&self, corner: Point2, length: f64, width: f64) -> bool {
        corner.x >= 0.0
            && corner.y >= 0.0
            && corner.x + length <= self.length
            && corner.y + width <= self.width
    }
}

impl fmt::Display for Foundation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.length, self.width)
    }
}

/// Positive and finite.
pub(crate) fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
