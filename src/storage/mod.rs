//! Storage adapter trait for abstracting backend access.
//!
//! This module provides the `StorageAdapter` trait which abstracts storage
//! operations, enabling different backends (local filesystem, in-memory for
//! testing, object stores).

use std::io::Read;

/// Error type for storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Path not found
    NotFound(String),
    /// Permission denied
    PermissionDenied(String),
    /// Path already exists
    AlreadyExists(String),
    /// Operation not supported by this storage backend
    NotSupported,
    /// Generic I/O error
    IoError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Path not found: {}", path),
            Self::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            Self::AlreadyExists(path) => write!(f, "Already exists: {}", path),
            Self::NotSupported => write!(f, "Operation not supported"),
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

/// Trait for storage backend operations.
///
/// Implementations provide access to different backends:
/// - `LocalStorage`: Real local file system
/// - `InMemoryStorage`: In-memory backend for testing
///
/// All path parameters are `/`-separated keys relative to the backend root.
/// The backend handles translating these to actual storage locations.
pub trait StorageAdapter {
    // ========================================
    // Required: All backends must implement
    // ========================================

    /// Checks if a path is a directory. Missing paths are not directories.
    fn is_directory(&self, path: &str) -> bool;

    /// Lists the direct children of a directory.
    ///
    /// Returns `(subdirectory_names, file_names)`, each sorted by name.
    fn list_directory(&self, path: &str) -> Result<(Vec<String>, Vec<String>), StorageError>;

    /// Checks if a path exists.
    fn exists(&self, path: &str) -> bool;

    /// Size of the object at `path` in bytes. Errors if missing.
    fn size(&self, path: &str) -> Result<u64, StorageError>;

    /// Modification time of the object at `path` as Unix seconds.
    /// Errors if missing.
    fn modified_time(&self, path: &str) -> Result<u64, StorageError>;

    /// Opens the object at `path` for reading.
    fn open_read(&self, path: &str) -> Result<Box<dyn Read>, StorageError>;

    /// Builds the public URL for a path.
    fn public_url(&self, path: &str) -> String;

    // ========================================
    // Optional: Default to NotSupported
    // ========================================

    /// Creates (or overwrites) a file with the given content.
    fn create_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let _ = (path, content);
        Err(StorageError::NotSupported)
    }

    /// Deletes a file or empty directory.
    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let _ = path;
        Err(StorageError::NotSupported)
    }

    /// Deletes a file, or a directory and everything under it.
    fn delete_recursive(&self, path: &str) -> Result<(), StorageError> {
        let _ = path;
        Err(StorageError::NotSupported)
    }
}

/// Shared backends: a site can own an `Arc` to a storage adapter that other
/// code (or another site) also holds.
impl<T: StorageAdapter + ?Sized> StorageAdapter for std::sync::Arc<T> {
    fn is_directory(&self, path: &str) -> bool {
        (**self).is_directory(path)
    }

    fn list_directory(&self, path: &str) -> Result<(Vec<String>, Vec<String>), StorageError> {
        (**self).list_directory(path)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn size(&self, path: &str) -> Result<u64, StorageError> {
        (**self).size(path)
    }

    fn modified_time(&self, path: &str) -> Result<u64, StorageError> {
        (**self).modified_time(path)
    }

    fn open_read(&self, path: &str) -> Result<Box<dyn Read>, StorageError> {
        (**self).open_read(path)
    }

    fn public_url(&self, path: &str) -> String {
        (**self).public_url(path)
    }

    fn create_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        (**self).create_file(path, content)
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        (**self).delete(path)
    }

    fn delete_recursive(&self, path: &str) -> Result<(), StorageError> {
        (**self).delete_recursive(path)
    }
}

// Implementations
mod in_memory;
mod local;

pub use in_memory::InMemoryStorage;
pub use local::LocalStorage;
