//! Target output formats.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Output format requested for a conversion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// Lossy WEBP, encoded in-process
    Webp,

    /// AVIF, encoded via an external `avifenc` process
    Avif,
}

impl TargetFormat {
    /// File extension appended to converted output names.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Webp => "webp",
            TargetFormat::Avif => "avif",
        }
    }

    /// Wire value accepted in the request's `format` field.
    pub fn as_str(&self) -> &'static str {
        self.extension()
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when the `format` field is not a supported value.
#[derive(Debug, Clone, Error)]
#[error("Unsupported format: {0}")]
pub struct UnsupportedFormat(pub String);

impl FromStr for TargetFormat {
    type Err = UnsupportedFormat;

    /// Parse the wire value. Matching is exact: `webp` and `avif` only,
    /// lowercase, no aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webp" => Ok(TargetFormat::Webp),
            "avif" => Ok(TargetFormat::Avif),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}
