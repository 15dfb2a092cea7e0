//! Perceptual hashing of decoded images.
//!
//! The hash is the classic DCT pHash: the image is resized with a Lanczos3
//! filter and converted to grayscale, a 2-D DCT is taken, and the
//! low-frequency `hash_size × hash_size` block is thresholded against its
//! median. The bits are rendered as lowercase hex, so the default 8×8 grid
//! yields a 16-character string.
//!
//! Invariant: for the same image content and the same [`HashConfig`], the
//! output string is identical. No randomness, no dependence on threading.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use image::{DynamicImage, ImageReader};
use image_hasher::{FilterType, HashAlg, Hasher, HasherConfig};
use serde::{Deserialize, Serialize};

/// Default side of the hash grid; 8 gives a 64-bit hash.
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// Configuration for [`PerceptualHasher`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashConfig {
    /// Side of the square bit grid. The hash carries `hash_size²` bits.
    pub hash_size: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
        }
    }
}

impl HashConfig {
    /// Length in characters of the hex string produced with this config.
    pub fn hex_len(&self) -> usize {
        let bits = (self.hash_size * self.hash_size) as usize;
        bits.div_ceil(8) * 2
    }
}

/// DCT-based perceptual hasher. Cheap to share behind an `Arc`.
pub struct PerceptualHasher {
    config: HashConfig,
    hasher: Hasher,
}

impl std::fmt::Debug for PerceptualHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerceptualHasher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new(HashConfig::default())
    }
}

impl PerceptualHasher {
    pub fn new(config: HashConfig) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(config.hash_size, config.hash_size)
            .hash_alg(HashAlg::Median)
            .resize_filter(FilterType::Lanczos3)
            .preproc_dct()
            .to_hasher();
        Self { config, hasher }
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Hash an already decoded image.
    pub fn hash_image(&self, image: &DynamicImage) -> String {
        let hash = self.hasher.hash_image(image);
        hex::encode(hash.as_bytes())
    }

    /// Decode `bytes` (format sniffed from content) and hash the result.
    pub fn hash_bytes(&self, bytes: &[u8]) -> Result<String, image::ImageError> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        Ok(self.hash_image(&image))
    }

    /// Decode the file at `path` (format sniffed from content, not from the
    /// extension) and hash the result.
    pub fn hash_file(&self, path: &Path) -> Result<String, image::ImageError> {
        let reader = BufReader::new(File::open(path)?);
        let image = ImageReader::new(reader).with_guessed_format()?.decode()?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "image decoded"
        );
        Ok(self.hash_image(&image))
    }
}
