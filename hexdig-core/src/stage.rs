//! Stage layouts and their treasure catalogs

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{Board, Cell};
use crate::error::{PuzzleError, Result};
use crate::hex::{BoardSize, Hex};
use crate::shape::{ShapeId, TreasureShape};

/// Identifier of the stage loaded when none is requested
pub const DEFAULT_STAGE: &str = "stage1";

/// Largest row or column count a stage file may declare
pub const MAX_STAGE_SIDE: usize = 256;

/// A validated stage: initial cells plus the available treasures
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageData {
    pub id: String,
    pub size: BoardSize,
    pub layout: Vec<Vec<Cell>>,
    pub treasures: Vec<TreasureShape>,
}

/// Stage file as written by hand; every field is checked before use
#[derive(Deserialize)]
struct RawStage {
    id: String,
    rows: Option<usize>,
    cols: Option<usize>,
    #[serde(default)]
    layout: Vec<Vec<Value>>,
    #[serde(default, alias = "availableTreasures")]
    treasures: Vec<Value>,
}

#[derive(Deserialize)]
struct RawShape {
    id: u64,
    points: Vec<Hex>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl StageData {
    /// Build a board for this stage
    pub fn board(&self) -> Board {
        Board::from_layout(self.size, &self.layout)
    }

    /// Parse a stage from JSON, defaulting bad cells to walls and
    /// skipping malformed treasures
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let raw: RawStage = serde_json::from_str(content)?;
        let defaults = BoardSize::default();
        let size = BoardSize::new(
            raw.rows.unwrap_or(defaults.rows),
            raw.cols.unwrap_or(defaults.cols),
        );
        anyhow::ensure!(
            size.rows <= MAX_STAGE_SIDE && size.cols <= MAX_STAGE_SIDE,
            "stage {} is {}x{}, larger than {}x{}",
            raw.id,
            size.rows,
            size.cols,
            MAX_STAGE_SIDE,
            MAX_STAGE_SIDE
        );
        // No two cells of the board are farther apart than this
        let span = (size.rows + size.cols) as u64;

        let layout = (0..size.rows)
            .map(|row| {
                (0..size.cols)
                    .map(|col| {
                        raw.layout
                            .get(row)
                            .and_then(|r| r.get(col))
                            .and_then(Value::as_f64)
                            .map(Cell::from)
                            .unwrap_or(Cell::Wall)
                    })
                    .collect()
            })
            .collect();

        let mut treasures: Vec<TreasureShape> = Vec::new();
        for value in raw.treasures {
            match serde_json::from_value::<RawShape>(value) {
                Ok(shape) if shape.points.is_empty() => {
                    tracing::warn!("Stage {}: skipping empty treasure {}", raw.id, shape.id);
                }
                Ok(shape) if treasures.iter().any(|t| t.id.0 == shape.id) => {
                    tracing::warn!("Stage {}: skipping duplicate treasure {}", raw.id, shape.id);
                }
                Ok(shape) => {
                    let mut treasure = TreasureShape::new(ShapeId(shape.id), shape.points);
                    if treasure.reach() > span {
                        tracing::warn!(
                            "Stage {}: skipping treasure {} that cannot fit the board",
                            raw.id,
                            shape.id
                        );
                        continue;
                    }
                    treasure.active = shape.active;
                    treasures.push(treasure);
                }
                Err(e) => tracing::warn!("Stage {}: skipping malformed treasure: {}", raw.id, e),
            }
        }

        Ok(Self {
            id: raw.id,
            size,
            layout,
            treasures,
        })
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading stage file {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("parsing stage file {}", path.display()))
    }

    /// The stage shipped with the game
    pub fn stage1() -> Self {
        const W: f64 = -1.0;
        let layout = [
            [W, 1.0, 1.0, 1.0, 1.0, 1.0, W],
            [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            [W, W, 1.0, W, 1.0, W, W],
        ];
        let shape = |id: u64, points: &[(i32, i32)]| {
            TreasureShape::new(ShapeId(id), points.iter().map(|&(q, r)| Hex::new(q, r)))
        };

        Self {
            id: DEFAULT_STAGE.to_string(),
            size: BoardSize::default(),
            layout: layout
                .iter()
                .map(|row| row.iter().map(|&v| Cell::from(v)).collect())
                .collect(),
            treasures: vec![
                shape(101, &[(0, 0)]),
                shape(102, &[(0, 0), (0, 1)]),
                shape(103, &[(0, 0), (0, -1), (0, 1)]),
                shape(104, &[(0, 0), (1, 0), (0, 1)]),
            ],
        }
    }
}

/// Named stages available to a session
#[derive(Clone, Debug)]
pub struct StageCatalog {
    stages: Vec<StageData>,
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StageCatalog {
    /// Catalog with the built-in stages only
    pub fn builtin() -> Self {
        Self {
            stages: vec![StageData::stage1()],
        }
    }

    /// Add or replace a stage by id
    pub fn insert(&mut self, stage: StageData) {
        match self.stages.iter_mut().find(|s| s.id == stage.id) {
            Some(existing) => *existing = stage,
            None => self.stages.push(stage),
        }
    }

    /// Add every `*.json` stage in `dir` on top of the built-ins
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut catalog = Self::builtin();
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("reading stage directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            match StageData::load(&path) {
                Ok(stage) => {
                    tracing::info!("Loaded stage '{}' from {}", stage.id, path.display());
                    catalog.insert(stage);
                }
                Err(e) => tracing::warn!("Skipping {}: {:#}", path.display(), e),
            }
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Result<&StageData> {
        self.stages
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| PuzzleError::UnknownStage(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.stages.iter().map(|s| s.id.as_str())
    }
}
