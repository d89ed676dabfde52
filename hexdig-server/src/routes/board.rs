//! Board geometry and stage list endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use hexdig_core::{Hex, DIRECTIONS};

use crate::state::ServerState;

#[derive(Serialize)]
pub struct BoardInfo {
    pub rows: usize,
    pub cols: usize,
    /// Axial coordinate of each cell, row-major
    pub axial: Vec<Vec<[i32; 2]>>,
    pub directions: Vec<[i32; 2]>,
}

/// Get the current board's geometry
pub async fn get_board(State(state): State<Arc<ServerState>>) -> Json<BoardInfo> {
    let size = state.session().board().size();
    let axial = (0..size.rows)
        .map(|row| {
            size.positions()
                .skip(row * size.cols)
                .take(size.cols)
                .map(|pos| {
                    let Hex { q, r } = pos.to_axial();
                    [q, r]
                })
                .collect()
        })
        .collect();

    Json(BoardInfo {
        rows: size.rows,
        cols: size.cols,
        axial,
        directions: DIRECTIONS.iter().map(|d| [d.q, d.r]).collect(),
    })
}

/// List stage ids
pub async fn get_stages(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(state.catalog.ids().map(str::to_string).collect())
}
