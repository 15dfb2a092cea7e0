//! API route handlers
//!
//! - `health`: service acknowledgement, liveness and metrics
//! - `process`: download an image and return its perceptual hash

pub mod health;
pub mod process;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
