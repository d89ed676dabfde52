//! Board state: cell durability plus the hidden treasure overlay

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::hex::{BoardSize, GridPos};

/// Highest durability a block can have
pub const MAX_DURABILITY: u8 = 3;

/// Value of one board cell.
///
/// Serialized with the numeric layout encoding used by stage files:
/// `-1` wall, `0` open, `0.5` fragile, `1..=3` durable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum Cell {
    Wall,
    Open,
    /// Hit points remaining (1..=3)
    Durable(u8),
    /// Breaks on any hit or chain propagation
    Fragile,
}

impl Cell {
    /// Durable block, or `None` when `hp` is out of range
    pub fn durable(hp: u8) -> Option<Cell> {
        (1..=MAX_DURABILITY).contains(&hp).then_some(Cell::Durable(hp))
    }

    /// Dig cost; `None` for cells that cannot be dug
    pub fn cost(self) -> Option<f64> {
        match self {
            Cell::Durable(hp) => Some(hp as f64),
            Cell::Fragile => Some(1.0),
            Cell::Wall | Cell::Open => None,
        }
    }

    /// False only for durable blocks outside `1..=MAX_DURABILITY`
    pub fn is_valid(self) -> bool {
        match self {
            Cell::Durable(hp) => Cell::durable(hp).is_some(),
            _ => true,
        }
    }

    /// Opening this cell with one hit starts a chain reaction
    pub fn breaks_in_one_hit(self) -> bool {
        matches!(self, Cell::Durable(1) | Cell::Fragile)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value == 0.5 {
            return Cell::Fragile;
        }
        if value == 0.0 {
            return Cell::Open;
        }
        if value.fract() == 0.0 && (1.0..=MAX_DURABILITY as f64).contains(&value) {
            return Cell::Durable(value as u8);
        }
        Cell::Wall
    }
}

impl From<Cell> for f64 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Wall => -1.0,
            Cell::Open => 0.0,
            Cell::Durable(hp) => hp as f64,
            Cell::Fragile => 0.5,
        }
    }
}

/// What a single dig changed
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DigEffect {
    /// Cells whose value changed, dug cell first, then chain order
    pub changed: Vec<GridPos>,
    /// Cells that became open during this dig
    pub opened: Vec<GridPos>,
}

/// Durability grid plus the hidden treasure overlay
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
    hidden: Vec<bool>,
}

impl Board {
    /// Board filled with walls
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Wall; size.cell_count()],
            hidden: vec![false; size.cell_count()],
        }
    }

    /// Board from a row-major layout; missing entries become walls
    pub fn from_layout(size: BoardSize, layout: &[Vec<Cell>]) -> Self {
        let mut board = Self::new(size);
        for pos in size.positions() {
            let cell = layout
                .get(pos.row as usize)
                .and_then(|row| row.get(pos.col as usize))
                .copied()
                .filter(|cell| cell.is_valid())
                .unwrap_or(Cell::Wall);
            board.write(pos, cell);
        }
        board
    }

    /// Board with every cell set to `cell` (walls if `cell` is invalid)
    pub fn filled(size: BoardSize, cell: Cell) -> Self {
        let cell = if cell.is_valid() { cell } else { Cell::Wall };
        Self {
            size,
            cells: vec![cell; size.cell_count()],
            hidden: vec![false; size.cell_count()],
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Cell at `pos`, `None` when out of bounds
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        self.size.index(pos).map(|i| self.cells[i])
    }

    /// True iff a committed treasure occupies `pos`
    pub fn is_hidden(&self, pos: GridPos) -> bool {
        self.size.index(pos).is_some_and(|i| self.hidden[i])
    }

    /// Iterate cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        self.size.positions().zip(self.cells.iter().copied())
    }

    /// Rows of cells, for rendering
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size.cols.max(1)).map(<[Cell]>::to_vec).collect()
    }

    /// Rows of the hidden overlay, for rendering
    pub fn hidden_rows(&self) -> Vec<Vec<bool>> {
        self.hidden.chunks(self.size.cols.max(1)).map(<[bool]>::to_vec).collect()
    }

    /// Cell may become part of a candidate configuration
    pub fn can_host_shape_cell(&self, pos: GridPos) -> bool {
        matches!(self.cell(pos), Some(Cell::Durable(_) | Cell::Fragile)) && !self.is_hidden(pos)
    }

    /// Cell may receive a committed treasure (open cells allowed)
    pub fn can_commit_cell(&self, pos: GridPos) -> bool {
        matches!(self.cell(pos), Some(cell) if cell != Cell::Wall) && !self.is_hidden(pos)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    fn checked_index(&self, pos: GridPos) -> Result<usize> {
        self.size.index(pos).ok_or(PuzzleError::UnknownCoordinate {
            row: pos.row,
            col: pos.col,
        })
    }

    fn write(&mut self, pos: GridPos, cell: Cell) {
        if let Some(i) = self.size.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Hit a cell once. Walls and open cells are left untouched.
    pub fn dig(&mut self, pos: GridPos) -> Result<DigEffect> {
        let idx = self.checked_index(pos)?;
        let mut effect = DigEffect::default();

        let next = match self.cells[idx] {
            Cell::Wall | Cell::Open => return Ok(effect),
            Cell::Fragile | Cell::Durable(0 | 1) => Cell::Open,
            Cell::Durable(hp) => Cell::Durable(hp - 1),
        };
        self.cells[idx] = next;
        effect.changed.push(pos);

        if next == Cell::Open {
            effect.opened.push(pos);
            let chained = self.chain_break(pos);
            effect.changed.extend_from_slice(&chained);
            effect.opened.extend(chained);
        }

        tracing::debug!(
            "dig {} -> {:?}, {} cell(s) opened",
            pos,
            next,
            effect.opened.len()
        );
        Ok(effect)
    }

    /// Open every fragile cell connected to `origin`, breadth first.
    ///
    /// Returns the newly opened cells in visitation order. Durable
    /// neighbors are never touched.
    pub fn chain_break(&mut self, origin: GridPos) -> Vec<GridPos> {
        let mut opened = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([origin]);
        visited.insert(origin);

        while let Some(current) = queue.pop_front() {
            let neighbors: Vec<GridPos> = self.size.neighbors(current).collect();
            for next in neighbors {
                if self.cell(next) != Some(Cell::Fragile) || !visited.insert(next) {
                    continue;
                }
                self.write(next, Cell::Open);
                opened.push(next);
                queue.push_back(next);
            }
        }
        opened
    }

    /// Editor override: set a cell directly, bypassing dig rules
    pub fn set_cell(&mut self, pos: GridPos, cell: Cell) -> Result<()> {
        let idx = self.checked_index(pos)?;
        if let Cell::Durable(hp) = cell {
            if !cell.is_valid() {
                return Err(PuzzleError::InvalidDurability {
                    row: pos.row,
                    col: pos.col,
                    hp,
                });
            }
        }
        if cell == Cell::Wall && self.hidden[idx] {
            return Err(PuzzleError::TreasureUnderWall {
                row: pos.row,
                col: pos.col,
            });
        }
        self.cells[idx] = cell;
        Ok(())
    }

    pub(crate) fn set_hidden(&mut self, pos: GridPos, value: bool) {
        if let Some(i) = self.size.index(pos) {
            self.hidden[i] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: Cell = Cell::Fragile;
    const W: Cell = Cell::Wall;
    const D1: Cell = Cell::Durable(1);
    const D2: Cell = Cell::Durable(2);

    fn open_positions(board: &Board) -> Vec<GridPos> {
        board
            .cells()
            .filter(|&(_, cell)| cell == Cell::Open)
            .map(|(pos, _)| pos)
            .collect()
    }

    #[test]
    fn test_layout_encoding() {
        assert_eq!(Cell::from(-1.0), Cell::Wall);
        assert_eq!(Cell::from(0.0), Cell::Open);
        assert_eq!(Cell::from(0.5), Cell::Fragile);
        assert_eq!(Cell::from(2.0), Cell::Durable(2));
        assert_eq!(Cell::from(4.0), Cell::Wall);
        assert_eq!(Cell::from(1.5), Cell::Wall);
        assert_eq!(f64::from(Cell::Fragile), 0.5);
        assert_eq!(serde_json::to_string(&Cell::Durable(3)).unwrap(), "3.0");
        assert_eq!(serde_json::from_str::<Cell>("0.5").unwrap(), Cell::Fragile);
    }

    #[test]
    fn test_from_layout_pads_with_walls() {
        let board = Board::from_layout(BoardSize::new(2, 3), &[vec![D1, D2]]);
        assert_eq!(board.cell(GridPos::new(0, 0)), Some(D1));
        assert_eq!(board.cell(GridPos::new(0, 1)), Some(D2));
        assert_eq!(board.cell(GridPos::new(0, 2)), Some(W));
        assert_eq!(board.cell(GridPos::new(1, 1)), Some(W));
        assert_eq!(board.cell(GridPos::new(2, 0)), None);
    }

    #[test]
    fn test_dig_decrements_durable() {
        let mut board = Board::filled(BoardSize::default(), D2);
        let pos = GridPos::new(1, 1);

        let effect = board.dig(pos).unwrap();
        assert_eq!(board.cell(pos), Some(D1));
        assert_eq!(effect.changed, vec![pos]);
        assert!(effect.opened.is_empty());

        let effect = board.dig(pos).unwrap();
        assert_eq!(board.cell(pos), Some(Cell::Open));
        assert_eq!(effect.opened, vec![pos]);
    }

    #[test]
    fn test_dig_wall_and_open_are_noops() {
        let mut board = Board::filled(BoardSize::default(), W);
        let pos = GridPos::new(0, 0);
        assert!(board.dig(pos).unwrap().changed.is_empty());
        assert_eq!(board.cell(pos), Some(W));

        board.set_cell(pos, Cell::Open).unwrap();
        for _ in 0..3 {
            assert!(board.dig(pos).unwrap().changed.is_empty());
        }
        assert_eq!(board.cell(pos), Some(Cell::Open));
    }

    #[test]
    fn test_dig_out_of_bounds() {
        let mut board = Board::filled(BoardSize::default(), D1);
        let err = board.dig(GridPos::new(9, 0)).unwrap_err();
        assert_eq!(err, PuzzleError::UnknownCoordinate { row: 9, col: 0 });
    }

    #[test]
    fn test_dig_opens_adjacent_fragiles() {
        // (1,3) is durable 1; (0,3) and (1,2) are fragile neighbors
        let mut board = Board::filled(BoardSize::default(), D2);
        board.set_cell(GridPos::new(1, 3), D1).unwrap();
        board.set_cell(GridPos::new(0, 3), F).unwrap();
        board.set_cell(GridPos::new(1, 2), F).unwrap();

        let effect = board.dig(GridPos::new(1, 3)).unwrap();
        let mut opened = effect.opened.clone();
        opened.sort();
        assert_eq!(
            opened,
            vec![GridPos::new(0, 3), GridPos::new(1, 2), GridPos::new(1, 3)]
        );
        assert_eq!(open_positions(&board), opened);
    }

    #[test]
    fn test_chain_follows_fragile_runs_only() {
        // Row 0: F F F D2 F ; the run stops at the durable block
        let layout = vec![vec![F, F, F, D2, F]];
        let mut board = Board::from_layout(BoardSize::new(1, 5), &layout);

        board.dig(GridPos::new(0, 0)).unwrap();
        assert_eq!(
            open_positions(&board),
            vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(0, 2)]
        );
        assert_eq!(board.cell(GridPos::new(0, 3)), Some(D2));
        assert_eq!(board.cell(GridPos::new(0, 4)), Some(F));
    }

    #[test]
    fn test_chain_result_matches_connected_component() {
        // A fragile run that winds across rows; the opened set is the full
        // component reachable from the dug cell regardless of entry point.
        let layout = vec![
            vec![F, F, W, W, D1],
            vec![W, F, W, F, W],
            vec![W, F, F, F, W],
            vec![W, W, W, W, F],
        ];
        let size = BoardSize::new(4, 5);
        let component: Vec<GridPos> = {
            let mut board = Board::from_layout(size, &layout);
            board.dig(GridPos::new(0, 0)).unwrap();
            open_positions(&board)
        };
        for start in [GridPos::new(2, 2), GridPos::new(1, 3), GridPos::new(0, 1)] {
            let mut board = Board::from_layout(size, &layout);
            board.dig(start).unwrap();
            assert_eq!(open_positions(&board), component, "start {}", start);
        }
        assert!(component.contains(&GridPos::new(1, 3)));
        assert!(!component.contains(&GridPos::new(0, 4)));
    }

    #[test]
    fn test_can_host_and_commit() {
        let mut board = Board::filled(BoardSize::default(), D1);
        let pos = GridPos::new(2, 2);
        assert!(board.can_host_shape_cell(pos));
        assert!(board.can_commit_cell(pos));

        board.set_cell(pos, Cell::Open).unwrap();
        assert!(!board.can_host_shape_cell(pos));
        assert!(board.can_commit_cell(pos));

        board.set_hidden(pos, true);
        assert!(!board.can_commit_cell(pos));

        board.set_cell(GridPos::new(0, 0), W).unwrap();
        assert!(!board.can_host_shape_cell(GridPos::new(0, 0)));
        assert!(!board.can_commit_cell(GridPos::new(0, 0)));
        assert!(!board.can_host_shape_cell(GridPos::new(-1, 0)));
    }

    #[test]
    fn test_wall_cannot_cover_treasure() {
        let mut board = Board::filled(BoardSize::default(), D1);
        let pos = GridPos::new(1, 1);
        board.set_hidden(pos, true);
        assert_eq!(
            board.set_cell(pos, W),
            Err(PuzzleError::TreasureUnderWall { row: 1, col: 1 })
        );
        assert!(board.set_cell(pos, D2).is_ok());
    }

    #[test]
    fn test_set_cell_rejects_bad_durability() {
        let mut board = Board::filled(BoardSize::default(), Cell::Durable(1));
        let pos = GridPos::new(1, 1);
        for hp in [0, MAX_DURABILITY + 1, u8::MAX] {
            assert_eq!(
                board.set_cell(pos, Cell::Durable(hp)),
                Err(PuzzleError::InvalidDurability { row: 1, col: 1, hp })
            );
        }
        assert_eq!(board.cell(pos), Some(Cell::Durable(1)));
        assert!(board.set_cell(pos, Cell::Durable(MAX_DURABILITY)).is_ok());
    }

    #[test]
    fn test_bad_durability_in_layout_becomes_wall() {
        let board = Board::from_layout(
            BoardSize::new(1, 3),
            &[vec![Cell::Durable(0), Cell::Durable(9), Cell::Durable(2)]],
        );
        assert_eq!(board.cell(GridPos::new(0, 0)), Some(Cell::Wall));
        assert_eq!(board.cell(GridPos::new(0, 1)), Some(Cell::Wall));
        assert_eq!(board.cell(GridPos::new(0, 2)), Some(Cell::Durable(2)));
        assert_eq!(
            Board::filled(BoardSize::new(1, 1), Cell::Durable(0)).cell(GridPos::new(0, 0)),
            Some(Cell::Wall)
        );
        assert!(Cell::durable(0).is_none());
        assert_eq!(Cell::durable(3), Some(Cell::Durable(3)));
    }
}
