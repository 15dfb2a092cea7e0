use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use phash_service::PipelineError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to download image from the provided URL: {0}")]
    Fetch(String),

    #[error("Internal error while processing image: {0}")]
    Processing(String),

    #[error("{0}")]
    InvalidPayload(String),

    /// The request body could not be read; keeps the extractor's status.
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not Found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Fetch(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Rejected { status, .. } => *status,
            ServerError::Processing(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<PipelineError> for ServerError {
    fn from(err: PipelineError) -> Self {
        if err.is_fetch() {
            ServerError::Fetch(err.to_string())
        } else {
            ServerError::Processing(err.to_string())
        }
    }
}

impl From<BytesRejection> for ServerError {
    fn from(rejection: BytesRejection) -> Self {
        ServerError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::InvalidPayload(format!("Invalid request body: {err}"))
    }
}
