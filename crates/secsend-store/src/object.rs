//! A single stored object: lazily-loaded metadata plus the handful of
//! operations the relay drives it through. One [`ObjectHandle`] per request;
//! nothing here is cached across requests or shared between tasks.

use tokio::fs::{self, File, OpenOptions};
use tokio::sync::RwLock;

use secsend_crypto::FileId;
use secsend_protocol::EncryptedFileMetadata;

use crate::error::{Result, StoreError};
use crate::lock::LockGuard;
use crate::paths::ObjectPaths;
use crate::ttl;

/// A handle to one object's files. Metadata is loaded from disk on first
/// access and cached for the handle's lifetime.
pub struct ObjectHandle {
    id: FileId,
    paths: ObjectPaths,
    metadata: RwLock<Option<EncryptedFileMetadata>>,
}

impl ObjectHandle {
    pub(crate) fn new(id: FileId, paths: ObjectPaths) -> Self {
        Self {
            id,
            paths,
            metadata: RwLock::new(None),
        }
    }

    pub(crate) fn preload(id: FileId, paths: ObjectPaths, metadata: EncryptedFileMetadata) -> Self {
        Self {
            id,
            paths,
            metadata: RwLock::new(Some(metadata)),
        }
    }

    async fn load_from_disk(&self) -> Result<EncryptedFileMetadata> {
        let bytes = fs::read(&self.paths.metadata).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::IdUnknown
            } else {
                StoreError::from(e)
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|_| StoreError::InvalidMetadata)
    }

    /// The stored metadata envelope, loading it from disk on first access
    pub async fn metadata(&self) -> Result<EncryptedFileMetadata> {
        if let Some(cached) = self.metadata.read().await.as_ref() {
            return Ok(cached.clone());
        }
        let loaded = self.load_from_disk().await?;
        *self.metadata.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    /// Size of the content file in bytes, 0 if it doesn't exist yet
    pub async fn size(&self) -> u64 {
        fs::metadata(&self.paths.content).await.map(|m| m.len()).unwrap_or(0)
    }

    /// Load metadata; if it's complete, has a non-zero TTL, and that TTL
    /// has passed, delete both files and report [`StoreError::IdUnknown`].
    pub async fn check_validity(&self) -> Result<()> {
        let metadata = self.metadata().await?;
        if metadata.timeout_s != 0 && metadata.complete && ttl::ts_has_expired(metadata.timeout_ts) {
            self.delete().await?;
            return Err(StoreError::IdUnknown);
        }
        Ok(())
    }

    /// Acquire the scoped write lock for this object
    pub async fn lock_write(&self) -> Result<LockGuard> {
        LockGuard::acquire(&self.paths.lock).await
    }

    /// Open the content file for appending, creating it if this is the
    /// first push to a freshly-created pending object
    pub async fn stream_append(&self) -> Result<File> {
        Ok(OpenOptions::new().append(true).create(true).open(&self.paths.content).await?)
    }

    /// Open the content file for reading
    pub async fn stream_read(&self) -> Result<File> {
        Ok(File::open(&self.paths.content).await?)
    }

    /// Path to the content file, for servers that want to stream it
    /// directly (e.g. to support HTTP Range requests)
    pub fn content_path(&self) -> &std::path::Path {
        &self.paths.content
    }

    /// Flip `complete` to `true` and start the TTL clock. No-op if already
    /// complete. Writes a temp file beside the metadata path and renames it
    /// atomically over the original, so readers never see a half-written
    /// metadata file.
    pub async fn set_as_complete(&self) -> Result<()> {
        let mut updated = self.metadata().await?;
        if updated.complete {
            return Ok(());
        }
        updated.complete = true;
        updated.timeout_ts = ttl::timeout_ts(updated.timeout_s);

        let tmp_path = self.paths.metadata.with_extension("metadata.tmp");
        fs::write(&tmp_path, serde_json::to_vec(&updated).expect("metadata always serializes")).await?;
        fs::rename(&tmp_path, &self.paths.metadata).await?;

        *self.metadata.write().await = Some(updated);
        Ok(())
    }

    /// Unlink the metadata file then the content file. `NotFound` on the
    /// metadata file surfaces as [`StoreError::IdUnknown`]; the content
    /// file may legitimately not exist yet (a pending object with no
    /// pushed bytes) and its absence is not an error.
    pub async fn delete(&self) -> Result<()> {
        fs::remove_file(&self.paths.metadata).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::IdUnknown
            } else {
                StoreError::from(e)
            }
        })?;
        let _ = fs::remove_file(&self.paths.content).await;
        Ok(())
    }

    /// The file-id this handle was opened for
    pub fn id(&self) -> FileId {
        self.id
    }
}
