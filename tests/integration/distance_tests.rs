//! Distance endpoint integration tests.
//!
//! Tests verify:
//! - Known distances through the full HTTP stack
//! - Symmetry and identity of the returned value
//! - Validation failures map to 400 with an `error` message

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::test_utils::{body_json, json_post, TestApp};

async fn post_coordinates(app: &TestApp, coordinates: Value) -> (StatusCode, Value) {
    let request = json_post("/map/distance", &json!({ "coordinates": coordinates }));
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

// =============================================================================
// Successful Requests
// =============================================================================

#[tokio::test]
async fn test_one_degree_at_equator() {
    let app = TestApp::new().await;
    let (status, body) = post_coordinates(
        &app,
        json!([{ "lat": 0, "lng": 0 }, { "lat": 0, "lng": 1 }]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let distance = body["distance"].as_f64().unwrap();
    assert!((distance - 111.19).abs() < 0.5, "got {}", distance);
}

#[tokio::test]
async fn test_london_to_new_york() {
    let app = TestApp::new().await;
    let (status, body) = post_coordinates(
        &app,
        json!([
            { "lat": 51.5007, "lng": -0.1246 },
            { "lat": 40.6892, "lng": -74.0445 }
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let distance = body["distance"].as_f64().unwrap();
    assert!((distance - 5574.0).abs() < 10.0, "got {}", distance);
}

#[tokio::test]
async fn test_response_shape() {
    let app = TestApp::new().await;
    let (_, body) = post_coordinates(
        &app,
        json!([{ "lat": 10, "lng": 10 }, { "lat": 20, "lng": 20 }]),
    )
    .await;

    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object.contains_key("distance"));
}

#[tokio::test]
async fn test_symmetric_over_http() {
    let app = TestApp::new().await;
    let a = json!({ "lat": -33.8688, "lng": 151.2093 });
    let b = json!({ "lat": 35.6762, "lng": 139.6503 });

    let (_, ab) = post_coordinates(&app, json!([a.clone(), b.clone()])).await;
    let (_, ba) = post_coordinates(&app, json!([b, a])).await;

    assert_eq!(ab["distance"], ba["distance"]);
}

#[tokio::test]
async fn test_identical_points_are_zero() {
    let app = TestApp::new().await;
    let p = json!({ "lat": 48.8584, "lng": 2.2945 });
    let (status, body) = post_coordinates(&app, json!([p.clone(), p])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["distance"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn test_no_auth_needed_even_with_accounts_enabled() {
    let app = TestApp::new().await;
    let (status, _) = post_coordinates(
        &app,
        json!([{ "lat": 0, "lng": 0 }, { "lat": 1, "lng": 1 }]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Validation Failures
// =============================================================================

#[tokio::test]
async fn test_wrong_count_rejected() {
    let app = TestApp::new().await;
    let point = json!({ "lat": 0, "lng": 0 });

    for coordinates in [
        json!([]),
        json!([point.clone()]),
        json!([point.clone(), point.clone(), point.clone()]),
    ] {
        let (status, body) = post_coordinates(&app, coordinates).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Two coordinates are required." }));
    }
}

#[tokio::test]
async fn test_non_numeric_latitude_rejected() {
    let app = TestApp::new().await;
    let (status, body) = post_coordinates(
        &app,
        json!([{ "lat": "x", "lng": 0 }, { "lat": 0, "lng": 0 }]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Coordinate 0 must have a numeric 'lat' field."
    );
    assert!(body.get("distance").is_none());
}

#[tokio::test]
async fn test_missing_longitude_rejected() {
    let app = TestApp::new().await;
    let (status, body) =
        post_coordinates(&app, json!([{ "lat": 0, "lng": 0 }, { "lat": 0 }])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("'lng'"));
}

#[tokio::test]
async fn test_out_of_range_rejected() {
    let app = TestApp::new().await;

    let (status, body) = post_coordinates(
        &app,
        json!([{ "lat": 91, "lng": 0 }, { "lat": 0, "lng": 0 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("latitude"));

    let (status, body) = post_coordinates(
        &app,
        json!([{ "lat": 0, "lng": 0 }, { "lat": 0, "lng": 360 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("longitude"));
}

#[tokio::test]
async fn test_missing_coordinates_rejected() {
    let app = TestApp::new().await;
    let request = json_post("/map/distance", &json!({ "points": [] }));
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "A 'coordinates' array is required.");
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/map/distance")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Request body must be valid JSON"));
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/map/distance")
        .body(Body::from(r#"{"coordinates":[]}"#))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_get_not_allowed() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/map/distance")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
