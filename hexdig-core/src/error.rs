//! Error types for puzzle actions
//!
//! Every variant is recoverable: the action that produced it left the
//! session unchanged.

use crate::shape::ShapeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a treasure cannot be committed at a location
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementRejection {
    /// A covered cell falls outside the board
    OutOfBounds,
    /// A covered cell is a wall
    Wall,
    /// A covered cell already holds a committed treasure
    Overlap,
    /// The points are not a rotation of the shape's template
    ShapeMismatch,
}

impl std::fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            PlacementRejection::OutOfBounds => "covers a cell outside the board",
            PlacementRejection::Wall => "covers a wall",
            PlacementRejection::Overlap => "overlaps a placed treasure",
            PlacementRejection::ShapeMismatch => "points do not match the shape",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PuzzleError {
    #[error("Cannot place here: {0}")]
    InvalidPlacement(PlacementRejection),
    #[error("Unknown shape id {0}")]
    UnknownShape(ShapeId),
    #[error("Unknown coordinate ({row}, {col})")]
    UnknownCoordinate { row: i32, col: i32 },
    #[error("No placed treasure at index {0}")]
    UnknownPlacement(usize),
    #[error("Shape {0} is already placed")]
    ShapeCommitted(ShapeId),
    #[error("Shape id {0} already exists")]
    DuplicateShape(ShapeId),
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    #[error("Unknown stage '{0}'")]
    UnknownStage(String),
    #[error("Cell ({row}, {col}) holds a placed treasure and cannot become a wall")]
    TreasureUnderWall { row: i32, col: i32 },
    #[error("Durability {hp} at ({row}, {col}) is outside 1..=3")]
    InvalidDurability { row: i32, col: i32, hp: u8 },
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
