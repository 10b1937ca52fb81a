//! Blob storage for uploaded geodata files.
//!
//! Uploaded files (GeoJSON, KML, GeoTIFF, ...) are treated as opaque bytes.
//! A [`BlobStore`] persists them under a collision-resistant name and hands
//! them back by that name.
//!
//! # Usage
//!
//! ```ignore
//! use geoserve::storage::{BlobStore, DiskBlobStore};
//!
//! let store = DiskBlobStore::open("uploads").await?;
//!
//! let blob = store.store(bytes, "parcels.geojson").await?;
//! assert!(blob.storage_path.starts_with("/uploads/"));
//!
//! let data = store.fetch(&blob.stored_name).await?;
//! ```

mod disk;
mod naming;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::error::StorageError;

pub use disk::DiskBlobStore;
pub use naming::{sanitize_file_name, StoredNameGenerator};

/// URL prefix under which stored blobs are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Record of a persisted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlob {
    /// File name as supplied by the client
    pub original_name: String,

    /// Unique name the blob is stored under
    pub stored_name: String,

    /// Public path the blob can be fetched from
    pub storage_path: String,
}

impl StoredBlob {
    pub fn new(original_name: impl Into<String>, stored_name: impl Into<String>) -> Self {
        let stored_name = stored_name.into();
        Self {
            original_name: original_name.into(),
            storage_path: format!("{}/{}", UPLOADS_PREFIX, stored_name),
            stored_name,
        }
    }
}

/// Persistence backend for uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` and return where it can be fetched from.
    ///
    /// Implementations must never overwrite an existing blob.
    async fn store(&self, data: Bytes, original_name: &str) -> Result<StoredBlob, StorageError>;

    /// Read back a blob by its stored name.
    async fn fetch(&self, stored_name: &str) -> Result<Bytes, StorageError>;
}

/// Content type to serve a stored blob with, derived from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "geojson" => "application/geo+json",
        "json" => "application/json",
        "kml" => "application/vnd.google-earth.kml+xml",
        "kmz" => "application/vnd.google-earth.kmz",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}
