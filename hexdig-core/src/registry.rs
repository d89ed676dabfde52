//! Treasure catalog and committed placements

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{PlacementRejection, PuzzleError, Result};
use crate::hex::{GridPos, Hex};
use crate::shape::{ShapeId, TreasureShape, MAX_SHAPE_REACH};

/// A treasure committed to a fixed board location
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTreasure {
    pub shape_id: ShapeId,
    /// Offsets after rotation
    pub points: Vec<Hex>,
    pub anchor: GridPos,
}

impl PlacedTreasure {
    /// Absolute cells covered
    pub fn cells(&self) -> Vec<GridPos> {
        self.points.iter().filter_map(|&p| self.anchor.offset(p)).collect()
    }
}

/// Absolute grid cells for rotated offsets around an anchor, or `None` if
/// any offset leaves the coordinate range
pub fn placement_cells(points: &[Hex], anchor: GridPos) -> Option<Vec<GridPos>> {
    points.iter().map(|&p| anchor.offset(p)).collect()
}

/// Check that every cell could receive a committed treasure
pub fn check_placement(board: &Board, cells: &[GridPos]) -> std::result::Result<(), PlacementRejection> {
    for &pos in cells {
        if !board.size().contains(pos) {
            return Err(PlacementRejection::OutOfBounds);
        }
        if !board.can_commit_cell(pos) {
            return Err(if board.is_hidden(pos) {
                PlacementRejection::Overlap
            } else {
                PlacementRejection::Wall
            });
        }
    }
    Ok(())
}

/// Catalog of treasure templates plus committed placements
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreasureRegistry {
    shapes: Vec<TreasureShape>,
    placed: Vec<PlacedTreasure>,
}

impl TreasureRegistry {
    /// Registry over a catalog; later duplicates of an id are dropped
    pub fn new(shapes: impl IntoIterator<Item = TreasureShape>) -> Self {
        let mut registry = Self::default();
        for shape in shapes {
            if let Err(e) = registry.add_shape(shape) {
                tracing::warn!("Skipping catalog entry: {}", e);
            }
        }
        registry
    }

    // ========================================================================
    // CATALOG
    // ========================================================================

    pub fn shapes(&self) -> &[TreasureShape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&TreasureShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn is_committed(&self, id: ShapeId) -> bool {
        self.placed.iter().any(|p| p.shape_id == id)
    }

    /// Active shapes not yet placed, in catalog order
    pub fn available(&self) -> impl Iterator<Item = &TreasureShape> + '_ {
        self.shapes
            .iter()
            .filter(move |s| s.active && !self.is_committed(s.id))
    }

    /// Smallest id above every id in the catalog
    pub fn next_shape_id(&self) -> Result<ShapeId> {
        match self.shapes.iter().map(|s| s.id.0).max() {
            None => Ok(ShapeId(1)),
            Some(max) => max
                .checked_add(1)
                .map(ShapeId)
                .ok_or_else(|| PuzzleError::InvalidShape("no shape id left above the catalog".to_string())),
        }
    }

    pub fn add_shape(&mut self, shape: TreasureShape) -> Result<()> {
        if shape.is_empty() {
            return Err(PuzzleError::InvalidShape(format!("shape {} has no cells", shape.id)));
        }
        if shape.reach() > MAX_SHAPE_REACH {
            return Err(PuzzleError::InvalidShape(format!(
                "shape {} reaches farther than {} from its anchor",
                shape.id, MAX_SHAPE_REACH
            )));
        }
        if self.shape(shape.id).is_some() {
            return Err(PuzzleError::DuplicateShape(shape.id));
        }
        self.shapes.push(shape);
        Ok(())
    }

    /// Flip a shape's active flag, returning the new value
    pub fn toggle_active(&mut self, id: ShapeId) -> Result<bool> {
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(PuzzleError::UnknownShape(id))?;
        shape.active = !shape.active;
        Ok(shape.active)
    }

    /// Remove an unplaced template from the catalog
    pub fn delete_shape(&mut self, id: ShapeId) -> Result<TreasureShape> {
        let index = self
            .shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or(PuzzleError::UnknownShape(id))?;
        if self.is_committed(id) {
            return Err(PuzzleError::ShapeCommitted(id));
        }
        Ok(self.shapes.remove(index))
    }

    // ========================================================================
    // PLACEMENTS
    // ========================================================================

    pub fn placed(&self) -> &[PlacedTreasure] {
        &self.placed
    }

    /// Commit a rotated shape at `anchor`, marking its cells hidden.
    ///
    /// On failure neither the board nor the registry changes.
    pub fn commit(
        &mut self,
        board: &mut Board,
        shape_id: ShapeId,
        points: &[Hex],
        anchor: GridPos,
    ) -> Result<usize> {
        let shape = self.shape(shape_id).ok_or(PuzzleError::UnknownShape(shape_id))?;
        if self.is_committed(shape_id) {
            return Err(PuzzleError::ShapeCommitted(shape_id));
        }
        if !shape.matches_rotation(points) {
            return Err(PuzzleError::InvalidPlacement(PlacementRejection::ShapeMismatch));
        }

        let mut points = points.to_vec();
        let mut seen = Vec::with_capacity(points.len());
        points.retain(|p| {
            let fresh = !seen.contains(p);
            seen.push(*p);
            fresh
        });

        let cells = placement_cells(&points, anchor)
            .ok_or(PuzzleError::InvalidPlacement(PlacementRejection::OutOfBounds))?;
        check_placement(board, &cells).map_err(PuzzleError::InvalidPlacement)?;

        for &pos in &cells {
            board.set_hidden(pos, true);
        }
        self.placed.push(PlacedTreasure {
            shape_id,
            points,
            anchor,
        });
        tracing::debug!("Committed shape {} at {}", shape_id, anchor);
        Ok(self.placed.len() - 1)
    }

    /// Remove a placement and clear its hidden cells
    pub fn remove(&mut self, board: &mut Board, index: usize) -> Result<PlacedTreasure> {
        if index >= self.placed.len() {
            return Err(PuzzleError::UnknownPlacement(index));
        }
        let placed = self.placed.remove(index);
        for pos in placed.cells() {
            board.set_hidden(pos, false);
        }
        tracing::debug!("Removed shape {} from {}", placed.shape_id, placed.anchor);
        Ok(placed)
    }
}
