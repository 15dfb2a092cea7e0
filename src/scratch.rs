//! Scoped scratch storage for downloaded image bytes.
//!
//! A [`ScratchFile`] is created before the first byte arrives and lives for
//! exactly one request. It is removed on every exit path:
//!
//! - explicitly through [`ScratchFile::release`], which logs the outcome;
//! - implicitly when the value is dropped, which covers early returns,
//!   panics and cancelled request futures.
//!
//! Removal failures are logged and never surfaced to the caller.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

const SCRATCH_PREFIX: &str = "phash-";

/// Uniquely named temporary file owned by one request.
#[derive(Debug)]
pub struct ScratchFile {
    inner: NamedTempFile,
}

impl ScratchFile {
    /// Create a new empty scratch file in `dir`, or in the system temp
    /// directory when `dir` is `None`.
    pub fn create(dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let inner = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        tracing::debug!(path = %inner.path().display(), "scratch file created");
        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Async handle to the same file, for streaming writes.
    pub fn writer(&self) -> io::Result<tokio::fs::File> {
        let file = self.inner.as_file().try_clone()?;
        Ok(tokio::fs::File::from_std(file))
    }

    /// Remove the file now. Failures are logged at `warn` and swallowed.
    pub fn release(self) {
        let path: PathBuf = self.inner.path().to_path_buf();
        match self.inner.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "scratch file removed"),
            Err(err) => tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to remove scratch file"
            ),
        }
    }
}
