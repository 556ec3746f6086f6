//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use formsense_protocols::error::PipelineError;

/// Pipeline error carried to the HTTP layer.
#[derive(Debug)]
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PipelineError::MappingNotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::ExtractionEmpty(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}
