//! Router configuration for geoserve.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing and upload size limits.
//!
//! # Route Structure
//!
//! ```text
//! /health              - Health check
//! /map/distance        - Distance between two coordinates (POST)
//! /upload              - File upload (POST, multipart)
//! /uploads/{name}      - Stored file retrieval
//! /auth/register       - Account registration (POST, when accounts enabled)
//! /auth/login          - Token issuance (POST, when accounts enabled)
//! /auth/me             - Token check (when accounts enabled)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use geoserve::server::{create_router, AppState, RouterConfig};
//! use geoserve::storage::DiskBlobStore;
//!
//! let blobs = DiskBlobStore::open("uploads").await?;
//! let state = AppState::new(blobs);
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(state, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::handlers::{
    distance_handler, health_handler, login_handler, me_handler, register_handler,
    serve_upload_handler, upload_handler, AppState,
};
use crate::account::AccountService;
use crate::storage::BlobStore;

/// Default maximum upload body size (50 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum accepted upload body size in bytes
    pub max_upload_size: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Uploads are limited to 50 MiB
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the maximum upload body size in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// The `/auth` routes are only mounted when `state` carries an
/// [`AccountService`].
pub fn create_router<B>(state: AppState<B>, config: RouterConfig) -> Router
where
    B: BlobStore + 'static,
{
    let accounts = state.accounts.clone();

    let mut router: Router = Router::new()
        .route("/health", get(health_handler))
        .route("/map/distance", post(distance_handler))
        .route(
            "/upload",
            post(upload_handler::<B>).layer(DefaultBodyLimit::max(config.max_upload_size)),
        )
        .route("/uploads/{name}", get(serve_upload_handler::<B>))
        .with_state(state);

    if let Some(accounts) = accounts {
        router = router.nest("/auth", build_auth_router(accounts));
    }

    let router = router.layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the account routes.
fn build_auth_router(accounts: AccountService) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .with_state(accounts)
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => cors.allow_origin(parse_origins(origins)),
    }
}

/// Parse configured origins into header values, skipping unparseable entries.
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin.escape_debug(), "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
