//! Puzzle session: the single owner of board, registry and scores
//!
//! Every action runs to completion, including the solver re-run, before it
//! returns. Callers read state through accessors and [`Session::snapshot`];
//! nothing outside this type mutates the board or registry.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};
use crate::error::Result;
use crate::hex::{BoardSize, GridPos, Hex};
use crate::registry::{check_placement, placement_cells, PlacedTreasure, TreasureRegistry};
use crate::shape::{ShapeId, TreasureShape};
use crate::solver::{PlacementSolver, ScoreMap, SolverConfig};
use crate::stage::StageData;

/// Result of one dig action
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DigReport {
    /// Cells whose value changed, with their new value
    pub changed: Vec<(GridPos, Cell)>,
    /// The dug cell holds a placed treasure
    pub treasure_found: bool,
    pub scores: ScoreMap,
}

/// Where a placement would land and whether it may be committed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementPreview {
    /// Covered cells that lie on the board
    pub cells: Vec<GridPos>,
    pub valid: bool,
}

/// Serializable view of the whole session for rendering
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub stage: &'a str,
    pub size: BoardSize,
    pub cells: Vec<Vec<Cell>>,
    pub hidden: Vec<Vec<bool>>,
    pub shapes: &'a [TreasureShape],
    pub available: Vec<ShapeId>,
    pub placed: &'a [PlacedTreasure],
    pub scores: &'a ScoreMap,
}

/// One puzzle session
#[derive(Clone, Debug)]
pub struct Session {
    stage_id: String,
    board: Board,
    registry: TreasureRegistry,
    solver: PlacementSolver,
    scores: ScoreMap,
}

impl Session {
    /// Start a session on `stage` with default solver settings
    pub fn new(stage: &StageData) -> Self {
        Self::with_config(stage, SolverConfig::default())
    }

    pub fn with_config(stage: &StageData, config: SolverConfig) -> Self {
        let board = stage.board();
        let scores = ScoreMap::cleared(board.size());
        let mut session = Self {
            stage_id: stage.id.clone(),
            board,
            registry: TreasureRegistry::new(stage.treasures.iter().cloned()),
            solver: PlacementSolver::new(config),
            scores,
        };
        session.resolve();
        session
    }

    /// Reset board, hidden overlay and catalog to `stage`
    pub fn init_board(&mut self, stage: &StageData) -> &ScoreMap {
        tracing::info!("Loading stage '{}'", stage.id);
        self.stage_id = stage.id.clone();
        self.board = stage.board();
        self.registry = TreasureRegistry::new(stage.treasures.iter().cloned());
        self.resolve()
    }

    fn resolve(&mut self) -> &ScoreMap {
        self.scores = self.solver.solve(&self.board, &self.registry);
        &self.scores
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn registry(&self) -> &TreasureRegistry {
        &self.registry
    }

    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            stage: &self.stage_id,
            size: self.board.size(),
            cells: self.board.rows(),
            hidden: self.board.hidden_rows(),
            shapes: self.registry.shapes(),
            available: self.registry.available().map(|s| s.id).collect(),
            placed: self.registry.placed(),
            scores: &self.scores,
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Hit a cell; digging walls or open cells changes nothing
    pub fn dig(&mut self, pos: GridPos) -> Result<DigReport> {
        let effect = self.board.dig(pos)?;
        let treasure_found = self.board.is_hidden(pos);
        if treasure_found {
            tracing::info!("Treasure found at {}", pos);
        }

        let changed = effect
            .changed
            .iter()
            .filter_map(|&p| self.board.cell(p).map(|cell| (p, cell)))
            .collect();
        let scores = self.resolve().clone();
        Ok(DigReport {
            changed,
            treasure_found,
            scores,
        })
    }

    /// Commit a rotated shape at `anchor`; returns the placement index
    pub fn place(&mut self, shape_id: ShapeId, points: &[Hex], anchor: GridPos) -> Result<usize> {
        let index = self
            .registry
            .commit(&mut self.board, shape_id, points, anchor)?;
        self.resolve();
        Ok(index)
    }

    /// Check a placement without committing it
    pub fn preview_placement(&self, points: &[Hex], anchor: GridPos) -> PlacementPreview {
        let Some(cells) = placement_cells(points, anchor) else {
            return PlacementPreview {
                cells: points
                    .iter()
                    .filter_map(|&p| anchor.offset(p))
                    .filter(|&pos| self.board.size().contains(pos))
                    .collect(),
                valid: false,
            };
        };
        let valid = check_placement(&self.board, &cells).is_ok();
        PlacementPreview {
            cells: cells
                .into_iter()
                .filter(|&pos| self.board.size().contains(pos))
                .collect(),
            valid,
        }
    }

    pub fn remove_placement(&mut self, index: usize) -> Result<PlacedTreasure> {
        let placed = self.registry.remove(&mut self.board, index)?;
        self.resolve();
        Ok(placed)
    }

    /// Editor override of a single cell
    pub fn set_edit_cell(&mut self, pos: GridPos, cell: Cell) -> Result<()> {
        self.board.set_cell(pos, cell)?;
        tracing::debug!("Edited {} -> {:?}", pos, cell);
        self.resolve();
        Ok(())
    }

    /// Add a shape authored in the editor; returns its new id
    pub fn add_shape(&mut self, points: &[Hex]) -> Result<ShapeId> {
        let id = self.registry.next_shape_id()?;
        self.registry.add_shape(TreasureShape::from_editor(id, points)?)?;
        self.resolve();
        Ok(id)
    }

    pub fn toggle_shape(&mut self, id: ShapeId) -> Result<bool> {
        let active = self.registry.toggle_active(id)?;
        self.resolve();
        Ok(active)
    }

    pub fn delete_shape(&mut self, id: ShapeId) -> Result<TreasureShape> {
        let shape = self.registry.delete_shape(id)?;
        self.resolve();
        Ok(shape)
    }
}
