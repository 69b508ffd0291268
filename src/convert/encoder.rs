//! Image encoders for the supported output formats.
//!
//! Two paths with very different shapes:
//!
//! - **WEBP** is encoded in-process from the decoded pixels. Purely
//!   in-memory, no side effects.
//! - **AVIF** has no in-process encoder; it shells out to an external
//!   `avifenc` binary through a PNG intermediate staged in a per-call
//!   temporary directory. The directory is removed on every exit path,
//!   including encoder failure and timeout.
//!
//! The AVIF path sits behind the [`AvifEncoder`] trait so the process
//! dependency can be faked in tests.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::ConvertError;

/// WEBP quality used for all conversions.
pub const WEBP_QUALITY: f32 = 95.0;

/// WEBP compression method (0-6, 6 = slowest / best compression).
pub const WEBP_METHOD: i32 = 6;

/// Default lower quantizer bound passed to `avifenc --min`.
pub const DEFAULT_AVIF_MIN_QUANTIZER: u8 = 40;

/// Default upper quantizer bound passed to `avifenc --max`.
pub const DEFAULT_AVIF_MAX_QUANTIZER: u8 = 60;

/// Default deadline for one external encoder invocation.
pub const DEFAULT_ENCODE_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// WEBP Encoder
// =============================================================================

/// In-process WEBP encoder.
///
/// Encodes at quality 95 with the highest-effort compression method,
/// trading CPU time for smaller output.
#[derive(Debug, Clone)]
pub struct WebpEncoder {
    quality: f32,
}

impl WebpEncoder {
    /// Create an encoder at the standard quality.
    pub fn new() -> Self {
        Self {
            quality: WEBP_QUALITY,
        }
    }

    /// Create an encoder at a specific quality (0-100).
    pub fn with_quality(quality: f32) -> Self {
        Self { quality }
    }

    /// Encode RGBA pixels to WEBP bytes.
    pub fn encode(&self, image: &RgbaImage) -> Result<Bytes, ConvertError> {
        let encoder = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height());

        let mut config = webp::WebPConfig::new().map_err(|_| ConvertError::Encode {
            message: "failed to initialize WebP encoder config".to_string(),
        })?;
        config.quality = self.quality;
        config.method = WEBP_METHOD;

        let encoded = encoder
            .encode_advanced(&config)
            .map_err(|e| ConvertError::Encode {
                message: format!("{:?}", e),
            })?;

        Ok(Bytes::copy_from_slice(&encoded))
    }
}

impl Default for WebpEncoder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// AVIF Encoder
// =============================================================================

/// Capability seam for AVIF encoding.
///
/// The production implementation is [`AvifencEncoder`], which shells out
/// to an external binary; tests substitute in-memory fakes.
#[async_trait]
pub trait AvifEncoder: Send + Sync {
    /// Encode RGBA pixels to AVIF bytes.
    async fn encode(&self, image: &RgbaImage) -> Result<Bytes, ConvertError>;
}

/// AVIF encoder backed by an external `avifenc` process.
///
/// Each call stages the image as a lossless PNG inside a uniquely-named
/// temporary directory, runs
/// `avifenc --min <q> --max <q> <input> <output>`, and reads the result
/// back. Temporary files never outlive the call: the directory is removed
/// when the scope ends, on success and on every error path.
pub struct AvifencEncoder {
    binary: PathBuf,
    min_quantizer: u8,
    max_quantizer: u8,
    timeout: Duration,
    temp_root: PathBuf,
}

impl AvifencEncoder {
    /// Create an encoder invoking `avifenc` from `PATH` with default
    /// quantizer bounds and deadline.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("avifenc"),
            min_quantizer: DEFAULT_AVIF_MIN_QUANTIZER,
            max_quantizer: DEFAULT_AVIF_MAX_QUANTIZER,
            timeout: DEFAULT_ENCODE_TIMEOUT,
            temp_root: std::env::temp_dir(),
        }
    }

    /// Use a specific encoder binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the quantizer bounds passed as `--min` / `--max`.
    ///
    /// Lower values raise quality and file size. The defaults (40/60)
    /// favor smaller files over maximum fidelity.
    pub fn with_quantizers(mut self, min: u8, max: u8) -> Self {
        self.min_quantizer = min;
        self.max_quantizer = max;
        self
    }

    /// Set the deadline for one encoder invocation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stage temporary files under a specific directory instead of the
    /// system temp directory.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }
}

impl Default for AvifencEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AvifEncoder for AvifencEncoder {
    async fn encode(&self, image: &RgbaImage) -> Result<Bytes, ConvertError> {
        // Removed on drop, covering every return below.
        let workdir = tempfile::Builder::new()
            .prefix("batchpress-")
            .tempdir_in(&self.temp_root)?;
        let input_path = workdir.path().join("input.png");
        let output_path = workdir.path().join("output.avif");

        // Lossless intermediate for the external encoder.
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| ConvertError::Encode {
                message: format!("PNG intermediate: {}", e),
            })?;
        tokio::fs::write(&input_path, &png).await?;

        debug!(
            binary = %self.binary.display(),
            min = self.min_quantizer,
            max = self.max_quantizer,
            "Invoking external AVIF encoder"
        );

        let result = timeout(
            self.timeout,
            Command::new(&self.binary)
                .arg("--min")
                .arg(self.min_quantizer.to_string())
                .arg("--max")
                .arg(self.max_quantizer.to_string())
                .arg(&input_path)
                .arg(&output_path)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ConvertError::Io(e)),
            Err(_) => {
                return Err(ConvertError::EncoderTimeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(ConvertError::EncoderExit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let encoded = tokio::fs::read(&output_path).await?;
        Ok(Bytes::from(encoded))
    }
}

// =============================================================================
// Tests
// =============================================================================
