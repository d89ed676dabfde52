//! Session API endpoints
//!
//! Each action runs the solver before responding, so the returned scores
//! always match the board.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use hexdig_core::{Cell, DigReport, GridPos, Hex, PlacementPreview, ShapeId};

use crate::error::ApiError;
use crate::state::ServerState;

/// Full session snapshot
pub async fn get_session(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let session = state.session();
    Json(json!(session.snapshot()))
}

#[derive(Deserialize)]
pub struct InitRequest {
    pub stage: Option<String>,
}

/// Load a stage, resetting the board and catalog
pub async fn init_board(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<InitRequest>,
) -> Result<Json<Value>, ApiError> {
    let stage_id = req.stage.unwrap_or_else(|| hexdig_core::DEFAULT_STAGE.to_string());
    let stage = state.catalog.get(&stage_id)?;

    let mut session = state.session_mut();
    session.init_board(stage);
    Ok(Json(json!(session.snapshot())))
}

#[derive(Deserialize)]
pub struct CellRequest {
    pub row: i32,
    pub col: i32,
}

/// Dig one cell
pub async fn dig(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CellRequest>,
) -> Result<Json<DigReport>, ApiError> {
    let report = state.session_mut().dig(GridPos::new(req.row, req.col))?;
    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct PlaceRequest {
    pub shape_id: ShapeId,
    pub points: Vec<Hex>,
    pub anchor_row: i32,
    pub anchor_col: i32,
}

/// Commit a rotated treasure
pub async fn place(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PlaceRequest>,
) -> Result<Json<Value>, ApiError> {
    let anchor = GridPos::new(req.anchor_row, req.anchor_col);
    let mut session = state.session_mut();
    let index = session.place(req.shape_id, &req.points, anchor)?;
    Ok(Json(json!({
        "success": true,
        "index": index,
        "scores": session.scores(),
    })))
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub points: Vec<Hex>,
    pub anchor_row: i32,
    pub anchor_col: i32,
}

/// Where a placement would land, without committing it
pub async fn preview(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PreviewRequest>,
) -> Json<PlacementPreview> {
    let anchor = GridPos::new(req.anchor_row, req.anchor_col);
    Json(state.session().preview_placement(&req.points, anchor))
}

#[derive(Deserialize)]
pub struct RemoveRequest {
    pub index: usize,
}

/// Remove a committed treasure
pub async fn remove_placement(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<RemoveRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session_mut();
    let removed = session.remove_placement(req.index)?;
    Ok(Json(json!({
        "success": true,
        "removed": removed,
        "scores": session.scores(),
    })))
}

#[derive(Deserialize)]
pub struct EditRequest {
    pub row: i32,
    pub col: i32,
    pub value: Cell,
}

/// Editor override of one cell
pub async fn edit_cell(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<EditRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session_mut();
    session.set_edit_cell(GridPos::new(req.row, req.col), req.value)?;
    Ok(Json(json!({
        "success": true,
        "scores": session.scores(),
    })))
}
