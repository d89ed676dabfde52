//! Placement enumeration and dig scoring
//!
//! For every shape that is active and not yet placed, the solver tries each
//! legal anchor with all six rotations. A rotation survives only if every
//! cell it covers is on the board, still breakable and free of committed
//! treasures. Rotations and anchors that cover the same cells collapse into
//! one configuration per shape.
//!
//! Each minable cell is then scored by the number of distinct
//! configurations a single dig there would probe, divided by the hits it
//! takes to open it. A cell that opens in one hit also probes the
//! configurations of its fragile neighbors, since the chain reaction breaks
//! them in the same action. Those sets are merged (union), so a
//! configuration seen from several of the cells is counted once.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};
use crate::hex::{BoardSize, GridPos, Hex};
use crate::registry::TreasureRegistry;
use crate::shape::{ShapeId, TreasureShape};

/// Index into the solver's configuration table
type ConfigId = usize;

/// Solver configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolverConfig {
    /// How many cells get a rank badge
    pub top_n: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

impl SolverConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Outcome class of a solver run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// At least one cell has a positive score
    Scored,
    /// Every active shape is placed; no scores are shown
    NoRemainingShapes,
    /// Shapes remain but none fits anywhere
    NoCandidates,
}

/// Score details for one minable cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellScore {
    /// Distinct configurations covering this cell
    pub coverage: usize,
    /// Extra configurations reached through the chain reaction
    pub chain_bonus: usize,
    /// Hits needed to open the cell
    pub cost: f64,
    /// `(coverage + chain_bonus) / cost`
    pub score: f64,
    /// 1-based recommendation rank
    pub rank: Option<usize>,
}

/// Number of distinct configurations found for one shape
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCoverage {
    pub shape_id: ShapeId,
    pub configurations: usize,
}

/// Per-cell scores plus the ranked recommendation list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreMap {
    pub size: BoardSize,
    pub status: SolveStatus,
    /// Row-major, `None` where no score is shown
    cells: Vec<Option<CellScore>>,
    /// Scored cells, best first
    pub ranking: Vec<GridPos>,
    pub shape_coverage: Vec<ShapeCoverage>,
}

impl ScoreMap {
    /// Map with every score absent
    pub fn cleared(size: BoardSize) -> Self {
        Self {
            size,
            status: SolveStatus::NoRemainingShapes,
            cells: vec![None; size.cell_count()],
            ranking: Vec::new(),
            shape_coverage: Vec::new(),
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<&CellScore> {
        self.size.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    /// Score at `pos`, zero when absent
    pub fn score(&self, pos: GridPos) -> f64 {
        self.get(pos).map_or(0.0, |s| s.score)
    }

    /// Base coverage at `pos`, zero when absent
    pub fn coverage(&self, pos: GridPos) -> usize {
        self.get(pos).map_or(0, |s| s.coverage)
    }

    /// Scored cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &CellScore)> + '_ {
        self.size
            .positions()
            .zip(self.cells.iter())
            .filter_map(|(pos, score)| score.as_ref().map(|s| (pos, s)))
    }

    /// Ranked recommendations, best first
    pub fn top(&self) -> Vec<(GridPos, &CellScore)> {
        let mut ranked: Vec<_> = self.iter().filter(|(_, s)| s.rank.is_some()).collect();
        ranked.sort_by_key(|(_, s)| s.rank);
        ranked
    }

    /// Rows of scores for rendering, zero where absent
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.cells
            .chunks(self.size.cols.max(1))
            .map(|row| row.iter().map(|s| s.as_ref().map_or(0.0, |s| s.score)).collect())
            .collect()
    }
}

/// Distinct configurations and the cells they cover
#[derive(Debug, Default)]
struct ConfigurationTable {
    /// Configurations containing each cell, indexed row-major
    by_cell: Vec<FxHashSet<ConfigId>>,
    count: usize,
    per_shape: Vec<ShapeCoverage>,
}

/// Placement-enumeration solver
#[derive(Clone, Debug, Default)]
pub struct PlacementSolver {
    config: SolverConfig,
}

impl PlacementSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Full recompute of the score map
    pub fn solve(&self, board: &Board, registry: &TreasureRegistry) -> ScoreMap {
        let size = board.size();
        let remaining: Vec<&TreasureShape> = registry.available().collect();
        if remaining.is_empty() {
            tracing::debug!("No unplaced shapes; scores cleared");
            return ScoreMap::cleared(size);
        }

        let table = enumerate_configurations(board, &remaining);
        let mut cells: Vec<Option<CellScore>> = vec![None; size.cell_count()];
        let mut scored: Vec<(GridPos, f64)> = Vec::new();

        for (pos, cell) in board.cells() {
            let Some(cost) = cell.cost() else { continue };
            let Some(idx) = size.index(pos) else { continue };

            let own = &table.by_cell[idx];
            let reach = if cell.breaks_in_one_hit() {
                chain_reach(board, &table, pos, own)
            } else {
                own.len()
            };

            let score = reach as f64 / cost;
            if score > 0.0 {
                scored.push((pos, score));
                cells[idx] = Some(CellScore {
                    coverage: own.len(),
                    chain_bonus: reach - own.len(),
                    cost,
                    score,
                    rank: None,
                });
            }
        }

        // Stable: equal scores keep row-major order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (rank, (pos, _)) in scored.iter().take(self.config.top_n).enumerate() {
            let Some(idx) = size.index(*pos) else { continue };
            if let Some(entry) = cells[idx].as_mut() {
                entry.rank = Some(rank + 1);
            }
        }

        let status = if scored.is_empty() {
            SolveStatus::NoCandidates
        } else {
            SolveStatus::Scored
        };
        tracing::debug!(
            "Solved {} shape(s): {} configuration(s), {} scored cell(s)",
            remaining.len(),
            table.count,
            scored.len()
        );

        ScoreMap {
            size,
            status,
            cells,
            ranking: scored.into_iter().map(|(pos, _)| pos).collect(),
            shape_coverage: table.per_shape,
        }
    }
}

/// Configurations probed by opening `pos` and its fragile neighbors
fn chain_reach(
    board: &Board,
    table: &ConfigurationTable,
    pos: GridPos,
    own: &FxHashSet<ConfigId>,
) -> usize {
    let size = board.size();
    let mut union: FxHashSet<ConfigId> = own.clone();
    for neighbor in size.neighbors(pos) {
        if board.cell(neighbor) != Some(Cell::Fragile) {
            continue;
        }
        if let Some(i) = size.index(neighbor) {
            union.extend(table.by_cell[i].iter().copied());
        }
    }
    union.len()
}

/// Enumerate every legal, deduplicated configuration of the given shapes
fn enumerate_configurations(board: &Board, shapes: &[&TreasureShape]) -> ConfigurationTable {
    let size = board.size();
    let mut table = ConfigurationTable {
        by_cell: vec![FxHashSet::default(); size.cell_count()],
        ..Default::default()
    };

    for shape in shapes {
        let rotations = shape.rotations();
        // Canonical key: sorted covered cells (the shape is implied by the map)
        let mut seen: FxHashMap<Vec<GridPos>, ConfigId> = FxHashMap::default();

        for anchor in size.positions() {
            if board.cell(anchor) == Some(Cell::Wall) || board.is_hidden(anchor) {
                continue;
            }
            for rotation in &rotations {
                let Some(mut covered) = covered_cells(board, rotation, anchor) else {
                    continue;
                };
                covered.sort();
                covered.dedup();
                if seen.contains_key(&covered) {
                    continue;
                }

                let id = table.count;
                table.count += 1;
                for pos in &covered {
                    if let Some(i) = size.index(*pos) {
                        table.by_cell[i].insert(id);
                    }
                }
                seen.insert(covered, id);
            }
        }

        if seen.is_empty() {
            tracing::debug!("Shape {} has no legal configuration", shape.id);
        }
        table.per_shape.push(ShapeCoverage {
            shape_id: shape.id,
            configurations: seen.len(),
        });
    }
    table
}

/// Cells covered by one rotation at `anchor`, or `None` if any is illegal
fn covered_cells(board: &Board, rotation: &[Hex], anchor: GridPos) -> Option<Vec<GridPos>> {
    rotation
        .iter()
        .map(|&offset| {
            anchor
                .offset(offset)
                .filter(|&pos| board.can_host_shape_cell(pos))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const D1: Cell = Cell::Durable(1);
    const D2: Cell = Cell::Durable(2);
    const F: Cell = Cell::Fragile;

    fn single() -> TreasureShape {
        TreasureShape::new(ShapeId(1), [Hex::ORIGIN])
    }

    fn domino() -> TreasureShape {
        TreasureShape::new(ShapeId(2), [Hex::ORIGIN, Hex::new(1, 0)])
    }

    fn solve(board: &Board, shapes: Vec<TreasureShape>) -> ScoreMap {
        PlacementSolver::default().solve(board, &TreasureRegistry::new(shapes))
    }

    #[test]
    fn test_single_cell_shape_covers_every_cell_once() {
        let board = Board::filled(BoardSize::default(), D1);
        let scores = solve(&board, vec![single()]);

        assert_eq!(scores.status, SolveStatus::Scored);
        for pos in BoardSize::default().positions() {
            assert_eq!(scores.coverage(pos), 1, "coverage at {}", pos);
            assert_eq!(scores.score(pos), 1.0);
        }
        assert_eq!(scores.shape_coverage[0].configurations, 28);
    }

    #[test]
    fn test_opposite_rotations_deduplicate() {
        // Two adjacent cells: anchor (0,0) rotation 0 and anchor (0,1)
        // rotation 3 cover the same pair.
        let board = Board::filled(BoardSize::new(1, 2), D1);
        let scores = solve(&board, vec![domino()]);

        assert_eq!(scores.shape_coverage[0].configurations, 1);
        assert_eq!(scores.coverage(GridPos::new(0, 0)), 1);
        assert_eq!(scores.coverage(GridPos::new(0, 1)), 1);
    }

    #[test]
    fn test_symmetric_shape_rotations_deduplicate() {
        // A straight line of three maps onto itself after three rotations,
        // so every accepted (anchor, rotation) pair has exactly one twin.
        let board = Board::filled(BoardSize::default(), D1);
        let line = TreasureShape::new(ShapeId(3), [Hex::new(0, -1), Hex::ORIGIN, Hex::new(0, 1)]);

        let accepted = BoardSize::default()
            .positions()
            .flat_map(|anchor| line.rotations().map(|rot| covered_cells(&board, &rot, anchor)))
            .filter(Option::is_some)
            .count();

        let scores = solve(&board, vec![line]);
        let configurations = scores.shape_coverage[0].configurations;
        assert!(configurations > 0);
        assert_eq!(accepted, 2 * configurations);

        let total: usize = scores.iter().map(|(_, s)| s.coverage).sum();
        assert_eq!(total, 3 * configurations);
        assert!(scores.coverage(GridPos::new(1, 3)) >= 3);
    }

    #[test]
    fn test_same_cells_from_different_shapes_count_separately() {
        let board = Board::filled(BoardSize::new(1, 2), D1);
        let other = TreasureShape::new(ShapeId(9), [Hex::ORIGIN, Hex::new(1, 0)]);
        let scores = solve(&board, vec![domino(), other]);
        assert_eq!(scores.coverage(GridPos::new(0, 0)), 2);
    }

    #[test]
    fn test_cost_divides_score() {
        let mut board = Board::filled(BoardSize::default(), D1);
        board.set_cell(GridPos::new(2, 2), D2).unwrap();
        board.set_cell(GridPos::new(2, 4), Cell::Durable(3)).unwrap();
        let scores = solve(&board, vec![single()]);

        assert_eq!(scores.score(GridPos::new(2, 2)), 0.5);
        let hard = scores.get(GridPos::new(2, 4)).unwrap();
        assert_eq!(hard.cost, 3.0);
        assert!((hard.score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_and_wall_cells_excluded() {
        let mut board = Board::filled(BoardSize::default(), D1);
        board.set_cell(GridPos::new(0, 0), Cell::Wall).unwrap();
        board.set_cell(GridPos::new(1, 1), Cell::Open).unwrap();
        let scores = solve(&board, vec![domino()]);

        assert!(scores.get(GridPos::new(0, 0)).is_none());
        assert!(scores.get(GridPos::new(1, 1)).is_none());
        // (0,1) pairs with (0,2), (1,0) and (1,2); the wall and open cell are skipped
        assert_eq!(scores.coverage(GridPos::new(0, 1)), 3);
        assert!(!scores.ranking.contains(&GridPos::new(1, 1)));
    }

    #[test]
    fn test_chain_bonus_union() {
        // Row: D1 F D2 on a 1x3 board; single-cell shape
        let board = Board::from_layout(BoardSize::new(1, 3), &[vec![D1, F, D2]]);
        let scores = solve(&board, vec![single()]);

        let dug = scores.get(GridPos::new(0, 0)).unwrap();
        assert_eq!(dug.coverage, 1);
        assert_eq!(dug.chain_bonus, 1);
        assert_eq!(dug.score, 2.0);

        // Only fragile neighbors feed the bonus
        let fragile = scores.get(GridPos::new(0, 1)).unwrap();
        assert_eq!(fragile.chain_bonus, 0);
        assert_eq!(fragile.score, 1.0);

        // Durable 2 gets no chain bonus even next to a fragile
        let tough = scores.get(GridPos::new(0, 2)).unwrap();
        assert_eq!(tough.chain_bonus, 0);
        assert_eq!(tough.score, 0.5);
    }

    #[test]
    fn test_chain_bonus_does_not_double_count() {
        // Domino covering D1 + F is seen from both cells; union counts it once
        let board = Board::from_layout(BoardSize::new(1, 2), &[vec![D1, F]]);
        let scores = solve(&board, vec![domino()]);
        let dug = scores.get(GridPos::new(0, 0)).unwrap();
        assert_eq!(dug.coverage, 1);
        assert_eq!(dug.chain_bonus, 0);
        assert_eq!(dug.score, 1.0);
    }

    #[test]
    fn test_ranking_is_stable_and_top_three() {
        let mut board = Board::filled(BoardSize::default(), D2);
        board.set_cell(GridPos::new(3, 6), D1).unwrap();
        let scores = solve(&board, vec![single()]);

        // Best cell first, then row-major order among equal scores
        assert_eq!(
            &scores.ranking[..4],
            &[GridPos::new(3, 6), GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(0, 2)]
        );
        assert_eq!(scores.get(GridPos::new(3, 6)).unwrap().rank, Some(1));
        assert_eq!(scores.get(GridPos::new(0, 0)).unwrap().rank, Some(2));
        assert_eq!(scores.get(GridPos::new(0, 1)).unwrap().rank, Some(3));
        assert_eq!(scores.get(GridPos::new(0, 2)).unwrap().rank, None);
        assert_eq!(scores.get(GridPos::new(0, 2)).unwrap().score, 0.5);

        let top: Vec<GridPos> = scores.top().into_iter().map(|(pos, _)| pos).collect();
        assert_eq!(top, scores.ranking[..3].to_vec());

        // Identical input gives identical output
        assert_eq!(solve(&board, vec![single()]), scores);
    }

    #[test]
    fn test_hidden_cells_block_configurations() {
        let mut board = Board::filled(BoardSize::default(), D1);
        let mut registry = TreasureRegistry::new([single(), domino()]);
        registry
            .commit(&mut board, ShapeId(1), &[Hex::ORIGIN], GridPos::new(1, 3))
            .unwrap();
        let scores = PlacementSolver::default().solve(&board, &registry);

        assert_eq!(scores.shape_coverage.len(), 1);
        assert_eq!(scores.shape_coverage[0].shape_id, ShapeId(2));
        assert_eq!(scores.coverage(GridPos::new(1, 3)), 0);
        assert!(scores.coverage(GridPos::new(1, 2)) > 0);
    }

    #[test]
    fn test_no_remaining_shapes_clears() {
        let board = Board::filled(BoardSize::default(), D1);
        let mut registry = TreasureRegistry::new([single()]);
        registry.toggle_active(ShapeId(1)).unwrap();
        let scores = PlacementSolver::default().solve(&board, &registry);

        assert_eq!(scores, ScoreMap::cleared(BoardSize::default()));
        assert_eq!(scores.iter().count(), 0);
        assert!(scores.rows().iter().flatten().all(|&s| s == 0.0));
    }

    #[test]
    fn test_shape_without_room_is_not_an_error() {
        let board = Board::filled(BoardSize::new(1, 1), D1);
        let scores = solve(&board, vec![domino()]);
        assert_eq!(scores.status, SolveStatus::NoCandidates);
        assert_eq!(scores.shape_coverage[0].configurations, 0);
        assert!(scores.ranking.is_empty());
    }

    #[test]
    fn test_ranks_beyond_255() {
        let board = Board::filled(BoardSize::new(20, 20), D1);
        let registry = TreasureRegistry::new([single()]);
        let scores = PlacementSolver::new(SolverConfig::default().with_top_n(300)).solve(&board, &registry);

        let top = scores.top();
        assert_eq!(top.len(), 300);
        assert_eq!(top[255].1.rank, Some(256));
        assert_eq!(top[299].1.rank, Some(300));
        // Row-major ties: the 301st cell is (15, 0)
        assert_eq!(scores.get(GridPos::new(15, 0)).and_then(|s| s.rank), None);
        assert_eq!(scores.get(GridPos::new(14, 19)).and_then(|s| s.rank), Some(300));
    }
}
