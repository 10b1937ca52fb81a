//! HTTP server layer for geoserve.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │   POST /map/distance   POST /upload   GET /uploads/{name}       │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │  (bearer)   │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{parse_bearer, BearerToken};
pub use handlers::{
    distance_handler, health_handler, login_handler, me_handler, register_handler,
    serve_upload_handler, upload_handler, AppState, AuthError, CredentialsRequest,
    DistanceError, DistanceResponse, ErrorResponse, HealthResponse, MessageResponse,
    TokenResponse, UploadError, UploadResponse, UserResponse, UPLOAD_FIELD,
};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_UPLOAD_SIZE};
