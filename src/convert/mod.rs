//! Image conversion layer.
//!
//! Everything between the HTTP boundary and the ZIP archive lives here:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             HTTP Handlers               │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            BatchConverter               │
//! │   sequential per-file loop, one ZIP     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Converter                  │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ WebpEncoder  │  │  AvifEncoder    │  │
//! │  │ (in-process) │  │  (subprocess)   │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TargetFormat`]: the two supported output formats and wire parsing
//! - [`WebpEncoder`]: in-process lossy WEBP at quality 95
//! - [`AvifEncoder`] / [`AvifencEncoder`]: external-process AVIF seam and
//!   its production implementation
//! - [`Converter`]: decode → RGBA → encode for one file
//! - [`BatchConverter`]: sequential all-or-nothing batch loop

mod batch;
mod encoder;
mod format;
mod pipeline;

pub use batch::BatchConverter;
pub use encoder::{
    AvifEncoder, AvifencEncoder, WebpEncoder, DEFAULT_AVIF_MAX_QUANTIZER,
    DEFAULT_AVIF_MIN_QUANTIZER, DEFAULT_ENCODE_TIMEOUT, WEBP_METHOD, WEBP_QUALITY,
};
pub use format::{TargetFormat, UnsupportedFormat};
pub use pipeline::{strip_extension, ConvertedImage, Converter, UploadedImage};
