//! On-disk store for uploaded book files.
//!
//! A [`FileStore`] is constructed once at startup and handed to request
//! handlers through the application state. It owns the upload directory
//! and the acceptance rules: extension allow-list and size limit are
//! checked before any byte reaches the disk.

use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::catalog::{self, MAX_UPLOAD_BYTES};
use crate::error::CoreError;

/// Result of a successful upload: the generated storage name plus the
/// uploader-supplied original filename, both persisted on the book row.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Server-generated unique filename under the upload directory.
    pub filename: String,
    /// Filename as provided by the uploader, used for download naming.
    pub original_name: String,
}

/// File store rooted at a fixed upload directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    max_bytes: u64,
}

impl FileStore {
    /// Open a store at `root` with the production 50 MiB size limit,
    /// creating the directory if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        Self::with_max_bytes(root, MAX_UPLOAD_BYTES)
    }

    /// Open a store with an explicit size limit (tests use small limits).
    pub fn with_max_bytes(root: impl Into<PathBuf>, max_bytes: u64) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, max_bytes })
    }

    /// The upload directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The size limit this store enforces.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validate and persist one uploaded file.
    ///
    /// Rejections (bad extension, oversize) happen before any write. On
    /// success the bytes live under [`Self::root`] with a storage name of
    /// the form `{unix-millis}-{random}{ext}`, which never collides with
    /// an earlier upload in practice.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<StoredFile, CoreError> {
        let ext = catalog::validate_extension(original_name)?;
        catalog::validate_size(data.len() as u64, self.max_bytes)?;

        let filename = generate_storage_name(&ext);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| CoreError::Internal(format!("failed to write {}: {e}", path.display())))?;

        Ok(StoredFile {
            filename,
            original_name: original_name.to_string(),
        })
    }

    /// Map a storage name back to its path under the upload directory.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Best-effort removal of a stored file. Used to clean up when the
    /// database insert following a write fails.
    pub async fn remove(&self, filename: &str) {
        let path = self.resolve(filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file");
        }
    }
}

/// Generate a storage name: millisecond timestamp, a random integer in
/// `0..1_000_000_000`, and the (already lowercased) original extension.
fn generate_storage_name(ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("{millis}-{suffix}.{ext}")
}
