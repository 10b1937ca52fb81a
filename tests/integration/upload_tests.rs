//! Upload and stored-file retrieval integration tests.
//!
//! Tests verify:
//! - Upload then fetch returns the same bytes with a fitting content type
//! - Stored names are unique and time-prefixed
//! - Missing or empty files yield 400 "No file uploaded"
//! - Size limits and unknown files

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use geoserve::RouterConfig;

use super::test_utils::{body_bytes, body_json, get, upload_request, Part, TestApp};

const GEOJSON: &[u8] =
    br#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[0,0]},"properties":{}}]}"#;

async fn upload(app: &TestApp, parts: &[Part<'_>]) -> (StatusCode, serde_json::Value) {
    let response = app
        .router
        .clone()
        .oneshot(upload_request(parts))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

// =============================================================================
// Successful Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_and_fetch_geojson() {
    let app = TestApp::new().await;
    let (status, body) = upload(&app, &[Part::file("file", "points.geojson", GEOJSON)]).await;

    assert_eq!(status, StatusCode::OK);
    let file_path = body["filePath"].as_str().unwrap().to_string();
    assert!(file_path.starts_with("/uploads/"));
    assert!(file_path.ends_with("-points.geojson"));

    // Stored name is "<millis>-<original>"
    let stored_name = file_path.trim_start_matches("/uploads/");
    let (stamp, rest) = stored_name.split_once('-').unwrap();
    assert!(stamp.parse::<u64>().is_ok());
    assert_eq!(rest, "points.geojson");

    // File landed in the upload dir
    let on_disk = std::fs::read(app.upload_dir.path().join(stored_name)).unwrap();
    assert_eq!(on_disk, GEOJSON);

    // And is served back
    let response = app.router.clone().oneshot(get(&file_path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/geo+json"
    );
    assert_eq!(body_bytes(response).await, GEOJSON);
}

#[tokio::test]
async fn test_upload_kml_and_tiff_content_types() {
    let app = TestApp::new().await;

    for (name, expected) in [
        ("route.kml", "application/vnd.google-earth.kml+xml"),
        ("dem.tif", "image/tiff"),
        ("notes.txt", "application/octet-stream"),
    ] {
        let (status, body) = upload(&app, &[Part::file("file", name, b"payload")]).await;
        assert_eq!(status, StatusCode::OK);

        let path = body["filePath"].as_str().unwrap();
        let response = app.router.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            expected
        );
    }
}

#[tokio::test]
async fn test_same_file_twice_gets_distinct_paths() {
    let app = TestApp::new().await;

    let (_, first) = upload(&app, &[Part::file("file", "a.kml", b"first")]).await;
    let (_, second) = upload(&app, &[Part::file("file", "a.kml", b"second")]).await;

    let first = first["filePath"].as_str().unwrap().to_string();
    let second = second["filePath"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    let response = app.router.clone().oneshot(get(&first)).await.unwrap();
    assert_eq!(body_bytes(response).await, b"first");
    let response = app.router.clone().oneshot(get(&second)).await.unwrap();
    assert_eq!(body_bytes(response).await, b"second");
}

#[tokio::test]
async fn test_other_fields_ignored() {
    let app = TestApp::new().await;
    let (status, body) = upload(
        &app,
        &[
            Part::text("description", b"survey points"),
            Part::file("attachment", "other.kml", b"ignored"),
            Part::file("file", "wanted.kml", b"<kml/>"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["filePath"].as_str().unwrap().ends_with("-wanted.kml"));
}

#[tokio::test]
async fn test_traversal_in_file_name_is_neutralised() {
    let app = TestApp::new().await;
    let (status, body) = upload(&app, &[Part::file("file", "../../evil.geojson", b"{}")]).await;

    assert_eq!(status, StatusCode::OK);
    let path = body["filePath"].as_str().unwrap();
    assert!(path.ends_with("-evil.geojson"));
    assert!(!path.contains(".."));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_no_file_part() {
    let app = TestApp::new().await;
    let (status, body) = upload(&app, &[Part::text("description", b"nothing here")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "No file uploaded" }));
}

#[tokio::test]
async fn test_file_field_without_file_name() {
    let app = TestApp::new().await;
    let (status, body) = upload(&app, &[Part::text("file", b"just text")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_empty_file() {
    let app = TestApp::new().await;
    let (status, body) = upload(&app, &[Part::file("file", "empty.kml", b"")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");

    // Nothing was written
    let entries = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn test_not_multipart() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_too_large() {
    let config = RouterConfig::new()
        .with_tracing(false)
        .with_max_upload_size(1024);
    let app = TestApp::with_config(config, false).await;

    let big = vec![b'x'; 4096];
    let response = app
        .router
        .clone()
        .oneshot(upload_request(&[Part::file("file", "big.tif", &big)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_fetch_unknown_file() {
    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(get("/uploads/123-missing.kml"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("123-missing.kml"));
}

#[tokio::test]
async fn test_fetch_hidden_name_rejected() {
    let app = TestApp::new().await;
    std::fs::write(app.upload_dir.path().join(".secret"), b"x").unwrap();

    let response = app.router.clone().oneshot(get("/uploads/.secret")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
