//! Entry point into the object store: creating new objects and opening
//! existing ones by file-id.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use secsend_crypto::FileId;
use secsend_protocol::EncryptedFileMetadata;

use crate::error::{Result, StoreError};
use crate::object::ObjectHandle;
use crate::paths::ObjectPaths;

/// The content-addressed object store rooted at one directory on disk
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Use `root` as the storage root. Does not require it to exist yet —
    /// [`ObjectStore::create`] makes parent directories as needed.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a brand-new pending object. Fails with [`StoreError::IdExists`]
    /// if the metadata file already exists at this id's path — the caller
    /// (the relay's `upload/new` handler) is expected to retry with a fresh
    /// id a bounded number of times.
    pub async fn create(&self, id: FileId, metadata: &EncryptedFileMetadata) -> Result<ObjectHandle> {
        let paths = ObjectPaths::new(&self.root, &id);
        fs::create_dir_all(paths.dir()).await?;

        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&paths.metadata).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Err(StoreError::IdExists),
            Err(e) => return Err(e.into()),
        };
        let json = serde_json::to_vec(metadata).expect("metadata always serializes");
        file.write_all(&json).await?;

        Ok(ObjectHandle::preload(id, paths, metadata.clone()))
    }

    /// Open a handle to an existing (or not-yet-existing) object. No I/O
    /// happens until the handle's metadata is first accessed.
    pub fn open(&self, id: FileId) -> ObjectHandle {
        let paths = ObjectPaths::new(&self.root, &id);
        ObjectHandle::new(id, paths)
    }
}
