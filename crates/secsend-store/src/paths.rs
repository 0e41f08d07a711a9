//! Content-addressed directory layout.
//!
//! `root / p0 / p1 / … / p7 / <hex20>.{metadata,content,metadata.lock}`,
//! where `p_i` is the lowercase hex of byte `i` of the file-id's 10-byte
//! body. Eight one-byte fan-out levels keep any single directory at at
//! most 256 entries even for very large corpora.

use std::path::{Path, PathBuf};

use secsend_crypto::FileId;

/// Number of leading id bytes that become directory levels
const FANOUT_LEVELS: usize = 8;

/// The directory a given file-id's object lives under, relative to the
/// store root
pub fn id_to_dir(id: &FileId) -> PathBuf {
    let body = id.0;
    let mut dir = PathBuf::new();
    for byte in &body[..FANOUT_LEVELS] {
        dir.push(format!("{:02x}", byte));
    }
    dir
}

/// The three filesystem paths associated with one object
#[derive(Debug, Clone)]
pub struct ObjectPaths {
    /// `<hex20>.metadata`
    pub metadata: PathBuf,
    /// `<hex20>.content`
    pub content: PathBuf,
    /// `<hex20>.metadata.lock`, present only while a writer holds the lock
    pub lock: PathBuf,
}

impl ObjectPaths {
    /// Resolve the paths for `id` under `root`
    pub fn new(root: &Path, id: &FileId) -> Self {
        let dir = root.join(id_to_dir(id));
        let hex = id.to_hex();
        Self {
            metadata: dir.join(format!("{hex}.metadata")),
            content: dir.join(format!("{hex}.content")),
            lock: dir.join(format!("{hex}.metadata.lock")),
        }
    }

    /// The directory containing all three paths
    pub fn dir(&self) -> &Path {
        self.metadata.parent().expect("metadata path always has a parent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secsend_crypto::RootId;

    #[test]
    fn dir_has_eight_fanout_levels() {
        let id = RootId::generate().file_id();
        let dir = id_to_dir(&id);
        assert_eq!(dir.components().count(), FANOUT_LEVELS);
    }

    #[test]
    fn paths_share_one_directory() {
        let id = RootId::generate().file_id();
        let paths = ObjectPaths::new(Path::new("/srv/secsend"), &id);
        assert_eq!(paths.metadata.parent(), paths.content.parent());
        assert_eq!(paths.lock, paths.metadata.with_extension("metadata.lock"));
    }

    #[test]
    fn is_deterministic() {
        let id = RootId::generate().file_id();
        let a = ObjectPaths::new(Path::new("/root"), &id);
        let b = ObjectPaths::new(Path::new("/root"), &id);
        assert_eq!(a.metadata, b.metadata);
    }
}
