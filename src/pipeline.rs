//! The fetch → buffer → decode → hash → cleanup pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::fetch::{request, stream_to};
use crate::hash::{HashConfig, PerceptualHasher};
use crate::scratch::ScratchFile;

/// Configuration for [`Pipeline`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory for scratch files. `None` uses the system temp directory.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    #[serde(default)]
    pub hash: HashConfig,
    /// Total timeout for one download. `None` waits indefinitely.
    #[serde(default)]
    pub fetch_timeout: Option<Duration>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            hash: HashConfig::default(),
            fetch_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("phash-service/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Result of one successful [`Pipeline::process`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashOutcome {
    /// Hex-encoded perceptual hash.
    pub phash: String,
    /// Number of body bytes downloaded.
    pub bytes: u64,
}

/// Downloads remote images and hashes them.
///
/// Holds no per-request state: clone it freely and call
/// [`process`](Self::process) concurrently.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: reqwest::Client,
    hasher: Arc<PerceptualHasher>,
    scratch_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        if config.hash.hash_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "hash_size must be at least 1".to_string(),
            ));
        }
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(
            client,
            PerceptualHasher::new(config.hash),
            config.scratch_dir,
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        hasher: PerceptualHasher,
        scratch_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            client,
            hasher: Arc::new(hasher),
            scratch_dir,
        }
    }

    pub fn hasher(&self) -> &PerceptualHasher {
        &self.hasher
    }

    /// Download `url` into a scratch file, decode it and return its hash.
    ///
    /// The scratch file is created once the remote has answered with a
    /// success status, before any body bytes are written, so remote failures
    /// are always reported as [`PipelineError::Fetch`]. It is removed before
    /// this returns, whatever the outcome. If the returned future is dropped
    /// early, the file is removed when the guard holding it is dropped.
    pub async fn process(&self, url: &str) -> Result<HashOutcome, PipelineError> {
        let response = request(&self.client, url).await?;
        let scratch = ScratchFile::create(self.scratch_dir.as_deref())?;

        let bytes = match fill(&scratch, response).await {
            Ok(bytes) => bytes,
            Err(err) => {
                scratch.release();
                return Err(err);
            }
        };

        // Decoding is CPU bound; keep it off the async workers. The guard
        // travels with the task so a panic there still removes the file.
        let hasher = Arc::clone(&self.hasher);
        let (scratch, hashed) = tokio::task::spawn_blocking(move || {
            let hashed = hasher.hash_file(scratch.path());
            (scratch, hashed)
        })
        .await?;
        scratch.release();

        let phash = hashed?;
        tracing::debug!(url, phash = %phash, bytes, "perceptual hash computed");
        Ok(HashOutcome { phash, bytes })
    }
}

async fn fill(scratch: &ScratchFile, response: reqwest::Response) -> Result<u64, PipelineError> {
    let writer = scratch.writer()?;
    stream_to(response, writer).await
}
