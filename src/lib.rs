//! Perceptual hashing of remote images.
//!
//! This crate downloads an image from a URL into a scoped scratch file,
//! decodes it, computes an 8×8 DCT perceptual hash and removes the scratch
//! file again. The HTTP surface lives in the `phash-server` crate; this crate
//! has no knowledge of status codes or JSON.
//!
//! ## Contract
//!
//! - One call to [`Pipeline::process`] owns exactly one [`ScratchFile`], and
//!   that file never outlives the call (or the dropped future).
//! - Steps run strictly in order: fetch, buffer, decode, hash, cleanup.
//! - Nothing is retried and nothing is cached.
//!
//! Invariant: for the same image bytes and the same [`HashConfig`], the hash
//! string is identical.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use phash_service::{Pipeline, PipelineConfig};
//!
//! # async fn run() -> Result<(), phash_service::PipelineError> {
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let outcome = pipeline.process("https://example.com/cat.png").await?;
//! assert_eq!(outcome.phash.len(), 16);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fetch;
pub mod hash;
pub mod pipeline;
pub mod scratch;

pub use crate::error::PipelineError;
pub use crate::fetch::{CHUNK_SIZE, download, request, stream_to};
pub use crate::hash::{DEFAULT_HASH_SIZE, HashConfig, PerceptualHasher};
pub use crate::pipeline::{HashOutcome, Pipeline, PipelineConfig};
pub use crate::scratch::ScratchFile;
