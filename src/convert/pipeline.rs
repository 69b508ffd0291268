//! Per-file conversion pipeline.
//!
//! One uploaded image goes through four steps: decode, normalize to RGBA,
//! derive the output name, encode. Failures come back as typed
//! [`ConvertError`]s carrying the decoder or encoder message; nothing here
//! touches the other files in a batch.
//!
//! # Design Decisions
//!
//! - **Unconditional RGBA**: every decoded image is converted to 8-bit
//!   RGBA before encoding, even for formats without native alpha, so both
//!   encoder paths see one pixel layout.
//! - **Extension stripping**: the output base name is the input filename
//!   with its final extension removed; only the target format's extension
//!   is added back.

use std::io::Cursor;

use bytes::Bytes;
use image::ImageReader;

use crate::error::ConvertError;

use super::encoder::{AvifEncoder, WebpEncoder};
use super::format::TargetFormat;

// =============================================================================
// Data Types
// =============================================================================

/// One uploaded file as received from the HTTP boundary.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Original filename from the multipart part
    pub filename: String,

    /// Raw uploaded bytes
    pub data: Bytes,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// One successfully converted file.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    /// Archive entry name, `<base>.<format>`
    pub output_name: String,

    /// Encoded output bytes
    pub data: Bytes,
}

// =============================================================================
// Converter
// =============================================================================

/// Converts single images to the requested target format.
///
/// WEBP encoding runs in-process; AVIF goes through the injected
/// [`AvifEncoder`] implementation.
pub struct Converter<A: AvifEncoder> {
    webp: WebpEncoder,
    avif: A,
}

impl<A: AvifEncoder> Converter<A> {
    /// Create a converter from the two encoder paths.
    pub fn new(webp: WebpEncoder, avif: A) -> Self {
        Self { webp, avif }
    }

    /// Convert one image.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::Decode`] if the bytes are not a recognized image
    /// - [`ConvertError::Encode`], [`ConvertError::EncoderExit`],
    ///   [`ConvertError::EncoderTimeout`] or [`ConvertError::Io`] from the
    ///   encoder path
    pub async fn convert_one(
        &self,
        filename: &str,
        data: &[u8],
        format: TargetFormat,
    ) -> Result<ConvertedImage, ConvertError> {
        let decoded = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ConvertError::Decode {
                message: e.to_string(),
            })?
            .decode()
            .map_err(|e| ConvertError::Decode {
                message: e.to_string(),
            })?;

        let rgba = decoded.to_rgba8();
        let base = strip_extension(filename);

        let encoded = match format {
            TargetFormat::Webp => self.webp.encode(&rgba)?,
            TargetFormat::Avif => self.avif.encode(&rgba).await?,
        };

        Ok(ConvertedImage {
            output_name: format!("{}.{}", base, format.extension()),
            data: encoded,
        })
    }
}

/// Strip the final extension from a filename.
///
/// A leading dot with no other extension is kept (`.config` stays
/// `.config`); a name without a dot is returned unchanged.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => filename,
    }
}

// =============================================================================
// Tests
// =============================================================================
