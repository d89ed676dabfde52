//! Mapping of puzzle errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hexdig_core::PuzzleError;

/// A rejected request: the session was left unchanged
#[derive(Debug)]
pub struct ApiError(pub PuzzleError);

impl From<PuzzleError> for ApiError {
    fn from(e: PuzzleError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            PuzzleError::UnknownShape(_)
            | PuzzleError::UnknownPlacement(_)
            | PuzzleError::UnknownStage(_) => StatusCode::NOT_FOUND,
            PuzzleError::ShapeCommitted(_)
            | PuzzleError::DuplicateShape(_)
            | PuzzleError::TreasureUnderWall { .. } => StatusCode::CONFLICT,
            PuzzleError::InvalidPlacement(_)
            | PuzzleError::UnknownCoordinate { .. }
            | PuzzleError::InvalidDurability { .. }
            | PuzzleError::InvalidShape(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!("Request rejected ({}): {}", status, self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
