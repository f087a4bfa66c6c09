use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::media::MediaError;
use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl ApiError {
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Media(_) => (StatusCode::BAD_REQUEST, "invalid_image"),
            ApiError::Pipeline(PipelineError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Pipeline(PipelineError::Extract(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "processing_error")
            }
            ApiError::Pipeline(PipelineError::Llm(err)) if err.is_upstream_failure() => {
                (StatusCode::BAD_GATEWAY, "upstream_failure")
            }
            ApiError::Pipeline(PipelineError::Llm(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "empty_response")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            error!("Request failed ({kind}): {self}");
        } else {
            warn!("Request rejected ({kind}): {self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}
