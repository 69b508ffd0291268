//! HTTP request handlers for the batch conversion API.
//!
//! # Endpoints
//!
//! - `POST /convert-batch` - Convert uploaded images, respond with a ZIP
//! - `GET /` - Liveness check

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::convert::{AvifEncoder, BatchConverter, TargetFormat, UploadedImage};
use crate::error::BatchError;

/// Filename advertised in the Content-Disposition of successful responses.
pub const ARCHIVE_FILENAME: &str = "converted_images.zip";

/// Multipart field name carrying uploaded files.
const FILES_FIELD: &str = "files";

/// Multipart field name carrying the target format.
const FORMAT_FIELD: &str = "format";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the batch converter.
///
/// Passed to handlers via Axum's State extractor.
pub struct AppState<A: AvifEncoder> {
    /// The batch converter driving per-file conversions
    pub batch: Arc<BatchConverter<A>>,
}

impl<A: AvifEncoder> AppState<A> {
    /// Create a new application state around the given converter.
    pub fn new(batch: BatchConverter<A>) -> Self {
        Self {
            batch: Arc::new(batch),
        }
    }
}

impl<A: AvifEncoder> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            batch: Arc::clone(&self.batch),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error body, `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Liveness check response.
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub message: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Errors surfaced by the conversion endpoint.
#[derive(Debug)]
pub enum ApiError {
    /// The `format` field was missing or not a supported value
    UnsupportedFormat,

    /// No file parts were present in the request
    NoFiles,

    /// The multipart body could not be read
    Multipart(String),

    /// A batch-processing failure
    Batch(BatchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::UnsupportedFormat => {
                (StatusCode::BAD_REQUEST, "Unsupported format".to_string())
            }
            ApiError::NoFiles => (StatusCode::BAD_REQUEST, "No files uploaded".to_string()),
            ApiError::Multipart(message) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid multipart form data: {}", message),
            ),
            ApiError::Batch(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "Batch conversion failed: {}", message);
        } else {
            warn!(status = status.as_u16(), "Rejected request: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        ApiError::Batch(err)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle batch conversion requests.
///
/// # Endpoint
///
/// `POST /convert-batch`
///
/// Multipart form with one or more `files` parts and a `format` field
/// (`webp` or `avif`). Unknown fields are ignored.
///
/// # Response
///
/// - `200 OK`: ZIP stream with `Content-Type: application/zip` and
///   `Content-Disposition: attachment; filename=converted_images.zip`
/// - `400 Bad Request`: `{"error": "Unsupported format"}` for a missing
///   or unknown `format`; also returned for unreadable multipart bodies
///   and empty uploads
/// - `500 Internal Server Error`:
///   `{"error": "Failed processing <filename>: <message>"}` naming the
///   first file that failed; no partial archive is returned
pub async fn convert_batch_handler<A: AvifEncoder>(
    State(state): State<AppState<A>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut images: Vec<UploadedImage> = Vec::new();
    let mut format_value: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            FILES_FIELD => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Multipart(e.to_string()))?;
                images.push(UploadedImage::new(filename, data));
            }
            FORMAT_FIELD => {
                format_value = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Multipart(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    // Validate the format before any file is touched.
    let format: TargetFormat = format_value
        .ok_or(ApiError::UnsupportedFormat)?
        .parse()
        .map_err(|_| ApiError::UnsupportedFormat)?;

    if images.is_empty() {
        return Err(ApiError::NoFiles);
    }

    let archive = state.batch.process_batch(&images, format).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", ARCHIVE_FILENAME),
        )
        .body(axum::body::Body::from(archive))
        .unwrap();

    Ok(response)
}

/// Handle liveness checks.
///
/// # Endpoint
///
/// `GET /`
///
/// Always responds `200 OK` with `{"message": "API is running"}`.
pub async fn root_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "API is running".to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
