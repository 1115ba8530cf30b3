//! Filesystem adapter for the `DocumentStore` port.
//!
//! Files land flat in one upload directory opened through `cap_std`, so a
//! caller-supplied name can never escape the root.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::TraceId;
use crate::domain::ports::{DocumentStore, DocumentStoreError};

/// Stores uploaded documents beneath a single directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
    dir: Arc<Dir>,
}

impl FsDocumentStore {
    /// Create the upload directory if needed and open it.
    ///
    /// # Errors
    /// Returns [`DocumentStoreError::Unavailable`] when the directory cannot
    /// be created or opened.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DocumentStoreError> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority()).map_err(|err| {
            DocumentStoreError::unavailable(format!("{}: {err}", root.display()))
        })?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).map_err(|err| {
            DocumentStoreError::unavailable(format!("{}: {err}", root.display()))
        })?;
        Ok(Self {
            root,
            dir: Arc::new(dir),
        })
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, DocumentStoreError> {
        let dir = Arc::clone(&self.dir);
        let name = file_name.to_owned();
        let contents = bytes.to_vec();
        TraceId::spawn_blocking(move || {
            dir.write(&name, contents)
                .map_err(|err| DocumentStoreError::write(name, err.to_string()))
        })
        .await
        .map_err(|err| DocumentStoreError::unavailable(err.to_string()))??;

        let path = self.root.join(file_name);
        debug!(path = %path.display(), size = bytes.len(), "document stored");
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the filesystem document store.
    use super::*;

    #[tokio::test]
    async fn store_writes_bytes_and_returns_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("uploads");
        let store = FsDocumentStore::open(&root).expect("open store");

        let path = store
            .store("APP2025000001_passport_photo_me.jpg", b"jpeg bytes")
            .await
            .expect("stored");

        assert_eq!(
            path,
            root.join("APP2025000001_passport_photo_me.jpg")
                .to_string_lossy()
        );
        let written = std::fs::read(&path).expect("read back");
        assert_eq!(written, b"jpeg bytes");
    }

    #[tokio::test]
    async fn store_refuses_names_that_leave_the_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FsDocumentStore::open(temp.path().join("uploads")).expect("open store");

        let error = store
            .store("../escape.pdf", b"nope")
            .await
            .expect_err("escape refused");

        assert!(matches!(error, DocumentStoreError::Write { .. }));
        assert!(!temp.path().join("escape.pdf").exists());
    }

    #[test]
    fn open_reports_unusable_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, b"x").expect("write blocker");

        let error = FsDocumentStore::open(&blocker).expect_err("not a directory");
        assert!(matches!(error, DocumentStoreError::Unavailable { .. }));
    }
}
