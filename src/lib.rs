//! # geoserve
//!
//! A small map backend served over HTTP.
//!
//! ## Features
//!
//! - **Distance**: great-circle (haversine) distance between two validated coordinates
//! - **Uploads**: GeoJSON, KML and TIFF files stored under collision-resistant names
//! - **Accounts**: registration, login and HMAC-SHA256 bearer tokens
//!
//! ## Architecture
//!
//! - [`geo`] - Points, validation and the distance calculator
//! - [`storage`] - Blob store trait and on-disk implementation
//! - [`account`] - Account store trait, in-memory store and token signing
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use geoserve::{create_router, AppState, DiskBlobStore, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let blobs = DiskBlobStore::open("uploads").await.unwrap();
//!     let router = create_router(AppState::new(blobs), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod account;
pub mod config;
pub mod error;
pub mod geo;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use account::{
    Account, AccountService, AccountStore, InMemoryAccountStore, IssuedToken, TokenSigner,
};
pub use config::Config;
pub use error::{AccountError, CoordinateError, StorageError, ValidationError};
pub use geo::{
    haversine_distance, validate_coordinates, validate_distance_request, DistanceRequest,
    GeoPoint, Unit, EARTH_RADIUS_KM, EARTH_RADIUS_MI,
};
pub use server::{create_router, AppState, RouterConfig};
pub use storage::{content_type_for, BlobStore, DiskBlobStore, StoredBlob};
