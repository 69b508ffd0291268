//! Batch orchestration.
//!
//! Drives the per-file pipeline over an uploaded file set and collects the
//! results into one ZIP archive.
//!
//! # Failure Policy
//!
//! The batch is all-or-nothing. Files are processed sequentially in
//! submission order; the first failure aborts the batch, discards any
//! already-converted outputs, and surfaces a single error naming the
//! offending file. A caller sees either a complete archive or one error,
//! never a partial result.

use bytes::Bytes;
use tracing::{debug, info};

use crate::archive::ZipBuilder;
use crate::error::BatchError;

use super::encoder::AvifEncoder;
use super::format::TargetFormat;
use super::pipeline::{Converter, UploadedImage};

/// Runs conversion batches.
///
/// One instance is shared across requests; each call owns its archive and
/// temp-file scope, so concurrent batches never interact.
pub struct BatchConverter<A: AvifEncoder> {
    converter: Converter<A>,
}

impl<A: AvifEncoder> BatchConverter<A> {
    pub fn new(converter: Converter<A>) -> Self {
        Self { converter }
    }

    /// Convert every image to `format` and return the finalized ZIP bytes.
    ///
    /// Archive entry order matches submission order.
    ///
    /// # Errors
    ///
    /// [`BatchError::FileFailed`] on the first file that fails to decode
    /// or encode; [`BatchError::Archive`] if the ZIP stream itself cannot
    /// be written.
    pub async fn process_batch(
        &self,
        images: &[UploadedImage],
        format: TargetFormat,
    ) -> Result<Bytes, BatchError> {
        info!(files = images.len(), format = %format, "Processing conversion batch");

        let mut archive = ZipBuilder::new();

        for image in images {
            let converted = self
                .converter
                .convert_one(&image.filename, &image.data, format)
                .await
                .map_err(|source| BatchError::FileFailed {
                    filename: image.filename.clone(),
                    source,
                })?;

            debug!(
                input = %image.filename,
                output = %converted.output_name,
                bytes = converted.data.len(),
                "Converted file"
            );

            archive.add_entry(&converted.output_name, &converted.data)?;
        }

        let bytes = archive.finish()?;
        info!(files = images.len(), bytes = bytes.len(), "Batch archive finalized");
        Ok(bytes)
    }
}

// =============================================================================
// Tests
// =============================================================================
