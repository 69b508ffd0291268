//! # Batchpress
//!
//! A batch image conversion server.
//!
//! This library provides the core functionality for converting uploaded
//! image batches to WEBP or AVIF and returning them as a single ZIP
//! archive over HTTP.
//!
//! ## Features
//!
//! - **Batch conversion**: Upload any number of images in one multipart
//!   request, receive one ZIP archive back
//! - **WEBP**: Encoded in-process at quality 95 with the highest-effort
//!   compression method
//! - **AVIF**: Encoded via an external `avifenc` process behind a
//!   trait seam, with guaranteed temp-file cleanup and a deadline
//! - **All-or-nothing batches**: A caller gets either a complete archive
//!   or a single error naming the file that failed
//! - **Bearer-token authentication**: Constant-time comparison against a
//!   single shared secret
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`convert`] - Target formats, encoder paths, per-file pipeline and
//!   batch orchestration
//! - [`archive`] - In-memory ZIP builder
//! - [`server`] - Axum-based HTTP server, auth and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Conversion, archive and batch error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use batchpress::{
//!     AvifencEncoder, BatchConverter, Converter, RouterConfig, WebpEncoder, create_router,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let avif = AvifencEncoder::new();
//!     let converter = Converter::new(WebpEncoder::new(), avif);
//!     let batch = BatchConverter::new(converter);
//!
//!     let router = create_router(batch, RouterConfig::new("my-shared-secret"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod archive;
pub mod config;
pub mod convert;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use archive::ZipBuilder;
pub use config::Config;
pub use convert::{
    strip_extension, AvifEncoder, AvifencEncoder, BatchConverter, ConvertedImage, Converter,
    TargetFormat, UnsupportedFormat, UploadedImage, WebpEncoder,
};
pub use error::{ArchiveError, BatchError, ConvertError};
pub use server::{
    auth_middleware, create_router, AppState, AuthError, BearerAuth, ErrorResponse,
    LivenessResponse, RouterConfig,
};
