//! Local-disk implementation of [`BlobStore`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::{BlobStore, StoredBlob, StoredNameGenerator};
use crate::error::StorageError;

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Stores blobs as flat files in a single directory.
///
/// # Example
///
/// ```ignore
/// use geoserve::storage::DiskBlobStore;
///
/// let store = DiskBlobStore::open("./uploads").await?;
/// let blob = store.store(bytes, "roads.kml").await?;
/// // blob.stored_name == "1718000000000-roads.kml"
/// ```
#[derive(Debug)]
pub struct DiskBlobStore {
    root: PathBuf,
    names: StoredNameGenerator,
}

impl DiskBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "Blob store ready");

        Ok(Self {
            root,
            names: StoredNameGenerator::new(),
        })
    }

    /// Directory blobs are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored name to a path inside the root, refusing anything that
    /// could escape it.
    fn resolve(&self, stored_name: &str) -> Option<PathBuf> {
        let valid = !stored_name.is_empty()
            && !stored_name.starts_with('.')
            && !stored_name.contains(['/', '\\', '\0']);

        valid.then(|| self.root.join(stored_name))
    }
}

/// Write `data` into a freshly created file, removing the file again if the
/// write fails so no partial blob is ever served.
async fn write_or_discard(
    mut file: tokio::fs::File,
    path: &Path,
    data: &[u8],
) -> Result<(), StorageError> {
    let written = match file.write_all(data).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        drop(file);
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %remove_err, "Failed to remove partial upload");
        }
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn store(&self, data: Bytes, original_name: &str) -> Result<StoredBlob, StorageError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_name = self.names.next_name(original_name);
            let path = self.root.join(&stored_name);

            let file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                // Another process wrote the same name; take the next stamp
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(stored_name = %stored_name, "Stored name taken, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            write_or_discard(file, &path, &data).await?;

            info!(
                original_name = original_name,
                stored_name = %stored_name,
                bytes = data.len(),
                "Stored upload"
            );
            return Ok(StoredBlob::new(original_name, stored_name));
        }

        Err(StorageError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not allocate a unique stored name",
        )))
    }

    async fn fetch(&self, stored_name: &str) -> Result<Bytes, StorageError> {
        let path = self
            .resolve(stored_name)
            .ok_or_else(|| StorageError::NotFound(stored_name.to_string()))?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
