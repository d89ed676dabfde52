//! HEXDIG Core - Hex treasure-dig puzzle engine
//!
//! This crate provides the puzzle logic:
//! - Hex geometry (odd-column grid <-> axial coordinates, 60 degree rotation)
//! - Treasure shape templates and their rotations
//! - Board state: durability, digging, fragile chain reactions
//! - Treasure catalog and committed placements
//! - Placement-enumeration solver that ranks cells worth digging
//! - Stage catalog and the session object that drives everything

pub mod hex;
pub mod shape;
pub mod board;
pub mod registry;
pub mod solver;
pub mod stage;
pub mod session;
pub mod error;

// Re-exports for convenient access
pub use hex::{BoardSize, GridPos, Hex, DIRECTIONS, ROWS, COLS};
pub use shape::{rotate_points, Rotation, ShapeId, TreasureShape};
pub use board::{Board, Cell, DigEffect};
pub use registry::{PlacedTreasure, TreasureRegistry};
pub use solver::{CellScore, PlacementSolver, ScoreMap, ShapeCoverage, SolveStatus, SolverConfig};
pub use stage::{StageCatalog, StageData, DEFAULT_STAGE};
pub use session::{DigReport, PlacementPreview, Session, SessionSnapshot};
pub use error::{PlacementRejection, PuzzleError};
