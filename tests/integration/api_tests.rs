//! API integration tests.
//!
//! Covers the liveness endpoint, successful WEBP/AVIF batches, the
//! response headers, format validation and the body contracts.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::test_utils::{
    convert_request, create_test_jpeg, create_test_png, test_router, zip_entry_content,
    zip_entry_names, MultipartBuilder, MOCK_AVIF_BYTES, TEST_TOKEN,
};

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn test_root_reports_api_running() {
    let (router, _) = test_router();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "API is running");
}

// =============================================================================
// Successful Batches
// =============================================================================

#[tokio::test]
async fn test_webp_batch_returns_zip_with_all_entries() {
    let (router, _) = test_router();

    let body = MultipartBuilder::new()
        .add_file("photo.jpg", &create_test_jpeg())
        .add_file("scan.png", &create_test_png())
        .add_text("format", "webp")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/zip"
    );
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=converted_images.zip"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(zip_entry_names(&body), vec!["photo.webp", "scan.webp"]);

    // Entries are real WEBP streams.
    let entry = zip_entry_content(&body, "photo.webp");
    assert_eq!(&entry[0..4], b"RIFF");
    assert_eq!(&entry[8..12], b"WEBP");
}

#[tokio::test]
async fn test_avif_batch_goes_through_the_encoder_seam() {
    let (router, calls) = test_router();

    let body = MultipartBuilder::new()
        .add_file("one.png", &create_test_png())
        .add_file("two.png", &create_test_png())
        .add_text("format", "avif")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(zip_entry_names(&body), vec!["one.avif", "two.avif"]);
    assert_eq!(zip_entry_content(&body, "one.avif"), MOCK_AVIF_BYTES);
}

#[tokio::test]
async fn test_entries_follow_submission_order() {
    let (router, _) = test_router();

    let body = MultipartBuilder::new()
        .add_file("zebra.png", &create_test_png())
        .add_file("apple.png", &create_test_png())
        .add_file("mango.png", &create_test_png())
        .add_text("format", "webp")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        zip_entry_names(&body),
        vec!["zebra.webp", "apple.webp", "mango.webp"]
    );
}

#[tokio::test]
async fn test_extension_is_stripped_not_appended() {
    let (router, _) = test_router();

    let body = MultipartBuilder::new()
        .add_file("archive.tar.gz.png", &create_test_png())
        .add_file("noextension", &create_test_png())
        .add_text("format", "webp")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        zip_entry_names(&body),
        vec!["archive.tar.gz.webp", "noextension.webp"]
    );
}

#[tokio::test]
async fn test_colliding_output_names_extract_to_last_write() {
    let (router, _) = test_router();

    let first = create_test_jpeg();
    let second = create_test_png();
    let body = MultipartBuilder::new()
        .add_file("a.jpg", &first)
        .add_file("a.png", &second)
        .add_text("format", "avif")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();

    // Both uploads become "a.avif"; extraction keeps the later entry.
    assert_eq!(zip_entry_names(&body), vec!["a.avif", "a.avif"]);
    assert_eq!(zip_entry_content(&body, "a.avif"), MOCK_AVIF_BYTES);
}

// =============================================================================
// Format Validation
// =============================================================================

#[tokio::test]
async fn test_unknown_format_is_rejected_before_processing() {
    let (router, calls) = test_router();

    let body = MultipartBuilder::new()
        .add_file("photo.png", &create_test_png())
        .add_text("format", "gif")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Unsupported format");

    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_format_matching_is_case_sensitive() {
    let (router, _) = test_router();

    let body = MultipartBuilder::new()
        .add_file("photo.png", &create_test_png())
        .add_text("format", "WEBP")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_format_field_is_rejected() {
    let (router, _) = test_router();

    let body = MultipartBuilder::new()
        .add_file("photo.png", &create_test_png())
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Unsupported format");
}

#[tokio::test]
async fn test_batch_without_files_is_rejected() {
    let (router, _) = test_router();

    let body = MultipartBuilder::new().add_text("format", "webp").finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Upload Limits
// =============================================================================

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    use batchpress::convert::{BatchConverter, Converter, WebpEncoder};
    use batchpress::server::{create_router, RouterConfig};

    use super::test_utils::MockAvifEncoder;

    let converter = Converter::new(WebpEncoder::new(), MockAvifEncoder::new());
    let batch = BatchConverter::new(converter);
    let config = RouterConfig::new(TEST_TOKEN)
        .with_max_upload_bytes(1024)
        .with_tracing(false);
    let router = create_router(batch, config);

    let body = MultipartBuilder::new()
        .add_file("big.bin", &vec![0u8; 64 * 1024])
        .add_text("format", "webp")
        .finish();

    let response = router
        .oneshot(convert_request(Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
