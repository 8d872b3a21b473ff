//! Filesystem-backed byte store.
//!
//! # Responsibilities
//! - Resolve request paths inside the configured root directory
//! - Stream writes of a declared length without over-reading the source
//! - Map "file absent" to typed results rather than raw I/O errors
//!
//! # Design Decisions
//! - Paths containing parent-directory or absolute components are
//!   rejected; the store never touches anything outside its root
//! - Writes create intermediate directories, so nested paths work

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The request path would escape the storage root.
    #[error("invalid storage path {0:?}")]
    InvalidPath(String),

    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A byte store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store, creating the root directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// The root directory this store operates under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Whether a path currently holds content.
    pub async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(full) => fs::try_exists(&full).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Read the full content at `path`, or `None` if absent.
    pub async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let full = self.resolve(path)?;
        match fs::read(&full).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stream exactly `length` bytes from `reader` into `path`.
    ///
    /// Reads fewer bytes only if the source reaches end-of-stream first;
    /// never reads past the declared length. Returns the bytes written.
    pub async fn write<R: AsyncRead + Unpin>(
        &self,
        path: &str,
        reader: &mut R,
        length: u64,
    ) -> Result<u64, StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&full).await?;
        let mut limited = reader.take(length);
        let written = tokio::io::copy(&mut limited, &mut file).await?;
        file.flush().await?;

        Ok(written)
    }

    /// Delete the content at `path`. Returns whether it existed.
    pub async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        match fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
