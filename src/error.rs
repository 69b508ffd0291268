use thiserror::Error;

/// Errors from converting a single image.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input bytes were not a recognized image format
    #[error("Decode failed: {message}")]
    Decode { message: String },

    /// The in-process encoder rejected the image
    #[error("Encode failed: {message}")]
    Encode { message: String },

    /// The external encoder exited with a non-zero status
    #[error("Encoder failed ({status}): {stderr}")]
    EncoderExit { status: String, stderr: String },

    /// The external encoder exceeded the configured deadline
    #[error("Encoder timed out after {seconds}s")]
    EncoderTimeout { seconds: u64 },

    /// I/O error while staging files for the external encoder
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from building the in-memory ZIP archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Error from the ZIP writer
    #[error("ZIP write error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while writing entry data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from processing a batch of uploads.
///
/// A batch either produces a complete archive or exactly one of these;
/// partial results are never surfaced.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A single file failed to convert, aborting the whole batch
    #[error("Failed processing {filename}: {source}")]
    FileFailed {
        filename: String,
        source: ConvertError,
    },

    /// The archive itself could not be written
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
