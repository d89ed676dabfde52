//! `hexdig solve`: score a stage, optionally after some digs, and print
//! where to dig next

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexdig_core::{
    Cell, GridPos, ScoreMap, Session, SolveStatus, SolverConfig, StageCatalog, StageData,
    DEFAULT_STAGE,
};

#[derive(Args)]
pub struct SolveArgs {
    /// Built-in stage id
    #[arg(long, default_value = DEFAULT_STAGE)]
    pub stage: String,

    /// Stage JSON file (overrides --stage)
    #[arg(long, value_name = "FILE")]
    pub stage_file: Option<PathBuf>,

    /// Cell to dig before scoring, as ROW,COL (repeatable, applied in order)
    #[arg(long = "dig", value_name = "ROW,COL", value_parser = parse_cell)]
    pub digs: Vec<GridPos>,

    /// Number of ranked recommendations
    #[arg(long, default_value = "3")]
    pub top: usize,

    /// Output the score map as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse "ROW,COL"
fn parse_cell(s: &str) -> std::result::Result<GridPos, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", s))?;
    let row = row.trim().parse().map_err(|e| format!("bad row '{}': {}", row, e))?;
    let col = col.trim().parse().map_err(|e| format!("bad column '{}': {}", col, e))?;
    Ok(GridPos::new(row, col))
}

pub fn run(args: SolveArgs) -> Result<()> {
    let stage = load_stage(&args)?;
    let mut session = Session::with_config(&stage, SolverConfig::default().with_top_n(args.top));

    apply_digs(&mut session, &args.digs)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.scores())?);
    } else {
        print!("{}", report(&session));
    }
    Ok(())
}

fn load_stage(args: &SolveArgs) -> Result<StageData> {
    match &args.stage_file {
        Some(path) => StageData::load(path),
        None => Ok(StageCatalog::builtin().get(&args.stage)?.clone()),
    }
}

fn apply_digs(session: &mut Session, digs: &[GridPos]) -> Result<()> {
    for &pos in digs {
        let outcome = session
            .dig(pos)
            .with_context(|| format!("digging {}", pos))?;
        tracing::info!(
            "Dug {}: {} cell(s) changed{}",
            pos,
            outcome.changed.len(),
            if outcome.treasure_found { ", treasure found" } else { "" }
        );
    }
    Ok(())
}

/// Text report: board, score grid and top picks
fn report(session: &Session) -> String {
    let scores = session.scores();
    let mut out = format!("Stage: {}\n\n", session.stage_id());
    out.push_str(&render_grid(session));
    out.push('\n');
    out.push_str(&render_top(scores));
    out
}

/// One line per row: cell glyph and score
fn render_grid(session: &Session) -> String {
    let board = session.board();
    let scores = session.scores();
    let mut out = String::new();

    for (row, cells) in board.rows().iter().enumerate() {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, &cell)| {
                let pos = GridPos::new(row as i32, col as i32);
                let glyph = match cell {
                    Cell::Wall => "#".to_string(),
                    Cell::Open => ".".to_string(),
                    Cell::Fragile => "w".to_string(),
                    Cell::Durable(hp) => hp.to_string(),
                };
                match scores.get(pos) {
                    Some(s) => format!("{}:{:>4.1}", glyph, s.score),
                    None => format!("{}:    ", glyph),
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn render_top(scores: &ScoreMap) -> String {
    match scores.status {
        SolveStatus::NoRemainingShapes => "All treasures are placed.\n".to_string(),
        SolveStatus::NoCandidates => "No possible treasure locations.\n".to_string(),
        SolveStatus::Scored => scores
            .top()
            .iter()
            .map(|(pos, s)| {
                format!(
                    "TOP {} {}  score {:.1} (coverage {}, chain +{}, cost {})\n",
                    s.rank.unwrap_or_default(),
                    pos,
                    s.score,
                    s.coverage,
                    s.chain_bonus,
                    s.cost
                )
            })
            .collect(),
    }
}
