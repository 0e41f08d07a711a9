//! Write-exclusion via filesystem rendezvous: acquiring the lock is an
//! atomic, exclusive file create; releasing it is an unlink. No in-memory
//! registry is involved, which is what lets this survive a process restart.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};

use crate::error::{Result, StoreError};

/// An acquired write lock on one object. Dropping it without calling
/// [`LockGuard::release`] still unlinks the sidecar file, best-effort, via
/// a detached blocking removal — but callers on the happy path should
/// prefer the explicit, fallible release.
pub struct LockGuard {
    path: PathBuf,
    released: bool,
}

impl LockGuard {
    /// Attempt to acquire the lock at `path`.
    ///
    /// `AlreadyExists` surfaces as [`StoreError::FileLocked`]; `NotFound`
    /// (the object's directory doesn't exist) surfaces as
    /// [`StoreError::IdUnknown`] — matching the original rendezvous: a
    /// missing parent directory means there was never an object here.
    pub async fn acquire(path: &Path) -> Result<Self> {
        match OpenOptions::new().write(true).create_new(true).open(path).await {
            Ok(_file) => Ok(Self {
                path: path.to_path_buf(),
                released: false,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(StoreError::FileLocked),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::IdUnknown),
            Err(e) => Err(e.into()),
        }
    }

    /// Release the lock, surfacing any filesystem error instead of
    /// swallowing it as the `Drop` fallback does.
    pub async fn release(mut self) -> Result<()> {
        fs::remove_file(&self.path).await?;
        self.released = true;
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn second_acquire_sees_file_locked() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("obj.metadata.lock");

        let first = LockGuard::acquire(&lock_path).await.unwrap();
        let second = LockGuard::acquire(&lock_path).await;
        assert!(matches!(second, Err(StoreError::FileLocked)));

        first.release().await.unwrap();
        assert!(LockGuard::acquire(&lock_path).await.is_ok());
    }

    #[tokio::test]
    async fn missing_parent_dir_is_id_unknown() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("missing_subdir").join("obj.metadata.lock");
        let err = LockGuard::acquire(&lock_path).await.unwrap_err();
        assert!(matches!(err, StoreError::IdUnknown));
    }

    #[tokio::test]
    async fn drop_without_release_still_unlinks() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("obj.metadata.lock");
        {
            let _guard = LockGuard::acquire(&lock_path).await.unwrap();
            assert!(lock_path.exists());
        }
        assert!(!lock_path.exists());
    }
}
