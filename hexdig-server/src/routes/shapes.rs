//! Shape catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use hexdig_core::{Hex, ShapeId};

use crate::error::ApiError;
use crate::state::ServerState;

/// Catalog with availability flags
pub async fn get_shapes(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let session = state.session();
    let registry = session.registry();
    let shapes: Vec<Value> = registry
        .shapes()
        .iter()
        .map(|shape| {
            json!({
                "id": shape.id,
                "points": shape.points,
                "active": shape.active,
                "placed": registry.is_committed(shape.id),
            })
        })
        .collect();
    Json(json!(shapes))
}

#[derive(Deserialize)]
pub struct AddShapeRequest {
    pub points: Vec<Hex>,
}

/// Add a shape from the editor
pub async fn add_shape(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<AddShapeRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session_mut();
    let id = session.add_shape(&req.points)?;
    Ok(Json(json!({
        "success": true,
        "id": id,
        "scores": session.scores(),
    })))
}

/// Flip a shape's active flag
pub async fn toggle_shape(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session_mut();
    let active = session.toggle_shape(ShapeId(id))?;
    Ok(Json(json!({
        "success": true,
        "active": active,
        "scores": session.scores(),
    })))
}

/// Delete an unplaced shape template
pub async fn delete_shape(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session_mut();
    session.delete_shape(ShapeId(id))?;
    Ok(Json(json!({
        "success": true,
        "scores": session.scores(),
    })))
}
