//! Error types produced by the hashing pipeline.
//!
//! The pipeline distinguishes exactly two classes of failure:
//!
//! | Class | Variants | Caller action |
//! |-------|----------|---------------|
//! | Fetch | [`Fetch`](PipelineError::Fetch) | supply a different URL |
//! | Processing | [`Scratch`](PipelineError::Scratch), [`Decode`](PipelineError::Decode), [`Worker`](PipelineError::Worker), [`InvalidConfig`](PipelineError::InvalidConfig) | none; internal fault or bad content |
//!
//! Nothing is retried. Every variant keeps its underlying cause so the
//! description reaches the caller unchanged.
//!
//! ```rust
//! use phash_service::PipelineError;
//!
//! fn to_http_status(error: &PipelineError) -> u16 {
//!     if error.is_fetch() { 400 } else { 500 }
//! }
//! ```

use thiserror::Error;

/// Failure of one [`Pipeline::process`](crate::Pipeline::process) invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The URL could not be fetched: malformed URL, DNS or connection
    /// failure, timeout, non-success remote status, or a body stream that
    /// broke off mid-transfer.
    #[error("{0}")]
    Fetch(#[source] reqwest::Error),

    /// The scratch file could not be created or written.
    #[error("scratch file error: {0}")]
    Scratch(#[from] std::io::Error),

    /// The downloaded bytes are not a decodable image.
    #[error("{0}")]
    Decode(#[from] image::ImageError),

    /// The blocking decode task did not run to completion.
    #[error("decode task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    /// The pipeline was built with settings it cannot run with.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// True for failures attributable to the remote URL.
    pub fn is_fetch(&self) -> bool {
        matches!(self, PipelineError::Fetch(_))
    }

    /// Short, stable label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch_error",
            PipelineError::Scratch(_)
            | PipelineError::Decode(_)
            | PipelineError::Worker(_)
            | PipelineError::InvalidConfig(_) => "processing_error",
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::Fetch(err)
    }
}
