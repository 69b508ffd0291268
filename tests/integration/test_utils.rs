//! Test utilities for integration tests.
//!
//! Provides a mock AVIF encoder, generated image fixtures, a multipart
//! body builder and small helpers for inspecting ZIP responses.

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use bytes::Bytes;
use image::{Rgba, RgbaImage};

use batchpress::convert::{AvifEncoder, BatchConverter, Converter, WebpEncoder};
use batchpress::error::ConvertError;
use batchpress::server::{create_router, RouterConfig};

pub const TEST_TOKEN: &str = "test-shared-secret-token";

/// Bytes the mock encoder hands back for every AVIF conversion.
pub const MOCK_AVIF_BYTES: &[u8] = b"mock-avif-output";

// =============================================================================
// Mock AVIF Encoder with Call Tracking
// =============================================================================

/// An AVIF encoder stand-in that counts invocations.
///
/// Useful for verifying that failed or rejected requests never reach the
/// encoder seam.
pub struct MockAvifEncoder {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockAvifEncoder {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// Make every encode call fail like a crashed external process.
    pub fn failing() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl AvifEncoder for MockAvifEncoder {
    async fn encode(&self, _image: &RgbaImage) -> Result<Bytes, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ConvertError::EncoderExit {
                status: "exit status: 1".to_string(),
                stderr: "mock encoder failure".to_string(),
            });
        }
        Ok(Bytes::from_static(MOCK_AVIF_BYTES))
    }
}

// =============================================================================
// Router Construction
// =============================================================================

/// Build a router around a mock AVIF encoder, returning the encoder's
/// call counter alongside it.
pub fn test_router() -> (Router, Arc<AtomicUsize>) {
    router_with_encoder(MockAvifEncoder::new())
}

/// Build a router whose AVIF seam always fails.
pub fn failing_avif_router() -> (Router, Arc<AtomicUsize>) {
    router_with_encoder(MockAvifEncoder::failing())
}

fn router_with_encoder(avif: MockAvifEncoder) -> (Router, Arc<AtomicUsize>) {
    let calls = avif.call_counter();
    let converter = Converter::new(WebpEncoder::new(), avif);
    let batch = BatchConverter::new(converter);
    let config = RouterConfig::new(TEST_TOKEN).with_tracing(false);
    (create_router(batch, config), calls)
}

// =============================================================================
// Image Fixtures
// =============================================================================

/// A small valid PNG with an alpha channel.
pub fn create_test_png() -> Vec<u8> {
    let image = RgbaImage::from_fn(16, 16, |x, y| {
        Rgba([(x * 16) as u8, (y * 16) as u8, 200, 255])
    });
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// A small valid JPEG (no alpha in the source format).
pub fn create_test_jpeg() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(16, 16, image::Rgb([90, 120, 60]));
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// Bytes that no image decoder recognizes.
pub fn create_invalid_image() -> Vec<u8> {
    vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]
}

// =============================================================================
// Multipart Body Builder
// =============================================================================

pub const BOUNDARY: &str = "batchpress-test-boundary-7d93b07a";

/// Builds `multipart/form-data` bodies for conversion requests.
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// Append one file part under the `files` field.
    pub fn add_file(mut self, filename: &str, data: &[u8]) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a plain text field.
    pub fn add_text(mut self, name: &str, value: &str) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }
}

/// Build a `POST /convert-batch` request carrying the given multipart body.
pub fn convert_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/convert-batch")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body)).unwrap()
}

// =============================================================================
// ZIP Inspection Helpers
// =============================================================================

/// Entry names in central-directory order.
pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Content of the entry an extractor would produce for `name`.
pub fn zip_entry_content(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut content = Vec::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_end(&mut content)
        .unwrap();
    content
}
