//! HTTP request handlers for the geoserve API.
//!
//! # Endpoints
//!
//! - `POST /map/distance` - Great-circle distance between two coordinates
//! - `POST /upload` - Store an uploaded geodata file
//! - `GET /uploads/{name}` - Fetch a stored file
//! - `POST /auth/register`, `POST /auth/login`, `GET /auth/me` - Accounts
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::account::AccountService;
use crate::error::{AccountError, StorageError, ValidationError};
use crate::geo::{validate_distance_request, Unit};
use crate::storage::{content_type_for, BlobStore};

use super::auth::BearerToken;

/// Multipart field the uploaded file is read from.
pub const UPLOAD_FIELD: &str = "file";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<B: BlobStore> {
    /// Where uploads are persisted
    pub blobs: Arc<B>,

    /// Account service; `None` leaves the `/auth` routes unmounted
    pub accounts: Option<AccountService>,
}

impl<B: BlobStore> AppState<B> {
    pub fn new(blobs: B) -> Self {
        Self {
            blobs: Arc::new(blobs),
            accounts: None,
        }
    }

    /// Enable the `/auth` routes backed by `accounts`.
    pub fn with_accounts(mut self, accounts: AccountService) -> Self {
        self.accounts = Some(accounts);
        self
    }
}

impl<B: BlobStore> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            blobs: Arc::clone(&self.blobs),
            accounts: self.accounts.clone(),
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// JSON error body for the distance and account endpoints.
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

/// JSON error body for the upload endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful distance calculation.
#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    /// Great-circle distance in kilometers
    pub distance: f64,
}

/// Successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Path the file can be fetched from, e.g. `/uploads/1718000000000-roads.kml`
    pub file_path: String,
}

/// Body of register and login requests.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Account identity returned by register and `/auth/me`.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,

    /// Expiry as Unix epoch seconds
    pub expires_at: u64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Wrapper for distance validation errors to implement IntoResponse.
#[derive(Debug)]
pub struct DistanceError(pub ValidationError);

impl From<ValidationError> for DistanceError {
    fn from(err: ValidationError) -> Self {
        DistanceError(err)
    }
}

impl IntoResponse for DistanceError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let message = self.0.to_string();

        warn!(status = status.as_u16(), "Rejected distance request: {}", message);

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Wrapper for upload and blob errors to implement IntoResponse.
#[derive(Debug)]
pub struct UploadError(pub StorageError);

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        UploadError(err)
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            StorageError::NoFileProvided | StorageError::MalformedUpload(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            StorageError::TooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.0.to_string()),
            StorageError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            // Keep filesystem details out of the response
            StorageError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access file storage".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), "Storage error: {}", self.0);
        } else if status == StatusCode::NOT_FOUND {
            debug!(status = status.as_u16(), "Resource not found: {}", message);
        } else {
            warn!(status = status.as_u16(), "Client error: {}", message);
        }

        (status, Json(MessageResponse { message })).into_response()
    }
}

/// Wrapper for account errors to implement IntoResponse.
#[derive(Debug)]
pub struct AuthError(pub AccountError);

impl From<AccountError> for AuthError {
    fn from(err: AccountError) -> Self {
        AuthError(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AccountError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AccountError::UsernameTaken(_) => StatusCode::CONFLICT,
            AccountError::InvalidCredentials
            | AccountError::MissingToken
            | AccountError::MalformedToken
            | AccountError::InvalidToken
            | AccountError::Expired { .. } => StatusCode::UNAUTHORIZED,
        };
        let message = self.0.to_string();

        // Signature mismatches are logged louder
        match &self.0 {
            AccountError::InvalidToken => {
                warn!(status = status.as_u16(), "Authentication failed: {}", message)
            }
            _ => debug!(status = status.as_u16(), "Account request rejected: {}", message),
        }

        let mut response = (status, Json(ErrorResponse::new(message))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Map a multipart stream failure onto a storage error.
fn multipart_error(err: MultipartError) -> StorageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StorageError::TooLarge
    } else {
        StorageError::MalformedUpload(err.body_text())
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle distance requests.
///
/// # Endpoint
///
/// `POST /map/distance`
///
/// # Request
///
/// ```json
/// { "coordinates": [ { "lat": 51.5007, "lng": -0.1246 }, { "lat": 40.6892, "lng": -74.0445 } ] }
/// ```
///
/// # Response
///
/// - `200 OK`: `{ "distance": 5574.84 }` (kilometers)
/// - `400 Bad Request`: `{ "error": "Two coordinates are required." }` or another
///   validation message
pub async fn distance_handler(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DistanceResponse>, DistanceError> {
    let Json(body) =
        payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;

    let request = validate_distance_request(&body)?;
    let distance = request.distance(Unit::Kilometers);

    debug!(
        from_lat = request.from.latitude(),
        from_lng = request.from.longitude(),
        to_lat = request.to.latitude(),
        to_lng = request.to.longitude(),
        distance,
        "Computed distance"
    );

    Ok(Json(DistanceResponse { distance }))
}

/// Handle file uploads.
///
/// # Endpoint
///
/// `POST /upload` (`multipart/form-data`, file in the `file` field)
///
/// # Response
///
/// - `200 OK`: `{ "filePath": "/uploads/<stored name>" }`
/// - `400 Bad Request`: `{ "message": "No file uploaded" }` when no non-empty
///   `file` part is present, or the body is not multipart at all
/// - `413 Payload Too Large`: body exceeds the configured limit
pub async fn upload_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Upload is not multipart: {}", rejection.body_text());
        StorageError::NoFileProvided
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // A part without a file name is a plain form value, not a file
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.is_empty() {
            return Err(StorageError::NoFileProvided.into());
        }

        let blob = state.blobs.store(data, &original_name).await?;
        return Ok(Json(UploadResponse {
            file_path: blob.storage_path,
        }));
    }

    Err(StorageError::NoFileProvided.into())
}

/// Handle stored file retrieval.
///
/// # Endpoint
///
/// `GET /uploads/{name}`
///
/// # Response
///
/// - `200 OK`: raw file bytes, `Content-Type` derived from the extension
/// - `404 Not Found`: no such file
pub async fn serve_upload_handler<B: BlobStore>(
    State(state): State<AppState<B>>,
    Path(name): Path<String>,
) -> Result<Response, UploadError> {
    let data = state.blobs.fetch(&name).await?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&name))], data).into_response())
}

/// Handle account registration.
///
/// # Endpoint
///
/// `POST /auth/register` with `{ "username": "...", "password": "..." }`
///
/// # Response
///
/// - `201 Created`: `{ "username": "..." }`
/// - `400 Bad Request`: invalid body or username
/// - `409 Conflict`: username taken
pub async fn register_handler(
    State(accounts): State<AccountService>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    let Json(credentials) =
        payload.map_err(|rejection| AccountError::InvalidInput(rejection.body_text()))?;

    accounts
        .register(&credentials.username, &credentials.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            username: credentials.username,
        }),
    ))
}

/// Handle login.
///
/// # Endpoint
///
/// `POST /auth/login` with `{ "username": "...", "password": "..." }`
///
/// # Response
///
/// - `200 OK`: `{ "token": "...", "expiresAt": 1735689600 }`
/// - `401 Unauthorized`: unknown user or wrong password
pub async fn login_handler(
    State(accounts): State<AccountService>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Json(credentials) =
        payload.map_err(|rejection| AccountError::InvalidInput(rejection.body_text()))?;

    let issued = accounts
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// Handle identity lookup for a bearer token.
///
/// # Endpoint
///
/// `GET /auth/me` with `Authorization: Bearer <token>`
///
/// # Response
///
/// - `200 OK`: `{ "username": "..." }`
/// - `401 Unauthorized`: missing, malformed, forged or expired token
pub async fn me_handler(
    State(accounts): State<AccountService>,
    BearerToken(token): BearerToken,
) -> Result<Json<UserResponse>, AuthError> {
    let username = accounts.authenticate(&token)?;
    Ok(Json(UserResponse { username }))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
