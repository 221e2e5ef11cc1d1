//! # Photo Blob Storage
//!
//! Stores photo bytes on disk under a configured directory. Stored filenames
//! are system-generated (UUID hex plus the original extension) so they never
//! collide and never contain client-controlled path components. The
//! user-supplied filename is recorded separately for display only.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Generated filename, unique across the store.
    pub filename: String,
    /// Number of bytes written.
    pub size: i64,
}

/// On-disk blob store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a freshly generated filename with the given
    /// extension. Creates the root directory on first use.
    pub async fn save(&self, bytes: &[u8], extension: &str) -> io::Result<StoredBlob> {
        tokio::fs::create_dir_all(&self.root).await?;
        let filename = format!("{}.{extension}", Uuid::new_v4().simple());
        tokio::fs::write(self.root.join(&filename), bytes).await?;
        Ok(StoredBlob {
            filename,
            size: bytes.len() as i64,
        })
    }

    /// Delete a stored file. Best-effort: a missing file is not an error,
    /// since the record may outlive a manually cleaned directory.
    pub async fn delete(&self, filename: &str) -> io::Result<()> {
        let Some(path) = self.resolve(filename) else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Read a stored file. Returns `Ok(None)` when the filename is malformed
    /// or the file does not exist.
    pub async fn read(&self, filename: &str) -> io::Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(filename) else {
            return Ok(None);
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve a stored filename to its path, rejecting anything that could
    /// escape the root (separators, parent references, empty names).
    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        Some(self.root.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, BlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn save_and_read_roundtrip() {
        let (_dir, store) = store();
        let stored = store.save(b"fake image bytes", "png").await.unwrap();
        assert!(stored.filename.ends_with(".png"));
        assert_eq!(stored.size, 16);

        let bytes = store.read(&stored.filename).await.unwrap().unwrap();
        assert_eq!(bytes, b"fake image bytes");
    }

    #[tokio::test]
    async fn generated_filenames_do_not_collide() {
        let (_dir, store) = store();
        let a = store.save(b"a", "jpg").await.unwrap();
        let b = store.save(b"b", "jpg").await.unwrap();
        assert_ne!(a.filename, b.filename);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = store();
        let stored = store.save(b"bytes", "gif").await.unwrap();
        store.delete(&stored.filename).await.unwrap();
        // Second delete of the same file succeeds.
        store.delete(&stored.filename).await.unwrap();
        assert!(store.read(&stored.filename).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_rejects_traversal_attempts() {
        let (_dir, store) = store();
        assert!(store.read("../secret.png").await.unwrap().is_none());
        assert!(store.read("a/b.png").await.unwrap().is_none());
        assert!(store.read("a\\b.png").await.unwrap().is_none());
        assert!(store.read("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_missing_file_is_none() {
        let (_dir, store) = store();
        assert!(store.read("missing.png").await.unwrap().is_none());
    }
}
