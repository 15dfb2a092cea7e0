use crate::error::{ServerError, ServerResult};
use crate::middleware::RequestId;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Request to hash a remote image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Image location. Not validated here; the download is the validator.
    pub url: String,
}

/// Response carrying the perceptual hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhashResponse {
    pub phash: String,
    pub url: String,
}

/// Download the image at `url` and return its perceptual hash.
///
/// # Errors
/// - 400 when the image cannot be downloaded (bad URL, network failure,
///   non-success remote status)
/// - 500 when the download is not a decodable image or the scratch file
///   cannot be written
/// - 422 when the body is not `{"url": "<string>"}`
/// - the body extractor's own status (e.g. 413) when the body cannot be read
///
/// The body is parsed as JSON whatever its `Content-Type`, so clients that
/// omit the header are still served.
///
/// # Example
/// ```json
/// // Request
/// { "url": "https://example.com/cat.png" }
///
/// // Response
/// { "phash": "c3e1b4f09a1c2d3e", "url": "https://example.com/cat.png" }
/// ```
pub async fn process_image(
    State(state): State<Arc<ServerState>>,
    request_id: Option<Extension<RequestId>>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Json<PhashResponse>> {
    let ImageUrl { url } = serde_json::from_slice(&body?)?;
    let request_id = request_id.map(|Extension(id)| id.0).unwrap_or_default();
    tracing::info!(url = %url, request_id = %request_id, "Hash requested");

    let start = Instant::now();
    let result = state.pipeline.process(&url).await;
    let elapsed = start.elapsed();

    let outcome = match &result {
        Ok(_) => "success",
        Err(err) => err.kind(),
    };
    if state.metrics.is_some() {
        metrics::counter!("phash_requests_total", "outcome" => outcome).increment(1);
        metrics::histogram!("phash_request_duration_seconds").record(elapsed.as_secs_f64());
    }

    match result {
        Ok(hashed) => {
            if state.metrics.is_some() {
                metrics::counter!("phash_downloaded_bytes_total").increment(hashed.bytes);
            }
            tracing::info!(
                url = %url,
                phash = %hashed.phash,
                bytes = hashed.bytes,
                duration_ms = %elapsed.as_millis(),
                request_id = %request_id,
                "Hash computed"
            );
            Ok(Json(PhashResponse {
                phash: hashed.phash,
                url,
            }))
        }
        Err(err) => {
            tracing::warn!(
                url = %url,
                error = %err,
                kind = err.kind(),
                request_id = %request_id,
                "Hash failed"
            );
            Err(ServerError::from(err))
        }
    }
}
