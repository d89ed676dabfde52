//! Treasure shape templates

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::hex::Hex;

/// Largest offset distance the shape editor accepts
pub const EDITOR_RADIUS: u64 = 2;

/// Largest offset distance any catalog shape may have. Keeps rotation
/// arithmetic well inside `i32`.
pub const MAX_SHAPE_REACH: u64 = 1 << 16;

/// Treasure shape identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rotation direction for a caller-held set of points
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Rotate every point 60 degrees around the anchor
pub fn rotate_points(points: &[Hex], rotation: Rotation) -> Vec<Hex> {
    points
        .iter()
        .map(|&p| match rotation {
            Rotation::Clockwise => p.rotate_cw(),
            Rotation::CounterClockwise => p.rotate_ccw(),
        })
        .collect()
}

/// A treasure template: axial offsets relative to an anchor at (0,0)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureShape {
    pub id: ShapeId,
    pub points: Vec<Hex>,
    pub active: bool,
}

impl TreasureShape {
    /// Active shape; duplicate offsets are collapsed, order preserved
    pub fn new(id: ShapeId, points: impl IntoIterator<Item = Hex>) -> Self {
        let mut unique: Vec<Hex> = Vec::new();
        for p in points {
            if !unique.contains(&p) {
                unique.push(p);
            }
        }
        Self {
            id,
            points: unique,
            active: true,
        }
    }

    /// Shape authored in the editor.
    ///
    /// Offsets must lie within [`EDITOR_RADIUS`] of the anchor, and the
    /// anchor itself is always part of the shape.
    pub fn from_editor(id: ShapeId, points: &[Hex]) -> Result<Self> {
        if points.is_empty() {
            return Err(PuzzleError::InvalidShape(
                "at least one cell must be selected".to_string(),
            ));
        }
        if let Some(p) = points.iter().find(|p| p.distance_to_center() > EDITOR_RADIUS) {
            return Err(PuzzleError::InvalidShape(format!(
                "offset ({}, {}) is farther than {} from the anchor",
                p.q, p.r, EDITOR_RADIUS
            )));
        }
        Ok(Self::new(
            id,
            std::iter::once(Hex::ORIGIN).chain(points.iter().copied()),
        ))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Distance of the farthest offset from the anchor
    pub fn reach(&self) -> u64 {
        self.points
            .iter()
            .map(Hex::distance_to_center)
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Offsets after `steps` clockwise rotations (new vector, template untouched)
    pub fn rotated(&self, steps: u8) -> Vec<Hex> {
        self.points.iter().map(|p| p.rotate_cw_n(steps)).collect()
    }

    /// All six rotations, index = clockwise steps
    pub fn rotations(&self) -> [Vec<Hex>; 6] {
        let mut current = self.points.clone();
        std::array::from_fn(|_| {
            let next = rotate_points(&current, Rotation::Clockwise);
            std::mem::replace(&mut current, next)
        })
    }

    /// True if `points` equals one rotation of this template as a set
    pub fn matches_rotation(&self, points: &[Hex]) -> bool {
        let mut wanted: Vec<Hex> = points.to_vec();
        wanted.sort();
        wanted.dedup();
        self.rotations().into_iter().any(|mut rotation| {
            rotation.sort();
            rotation == wanted
        })
    }
}
