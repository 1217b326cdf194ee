//! Local file system storage adapter.

use super::{StorageAdapter, StorageError};
use crate::paths;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

/// A storage backend rooted at a local directory.
///
/// Storage keys resolve against the root, so the same keys work whether the
/// root is `/srv/media` on a server or a scratch directory in a test.
pub struct LocalStorage {
    root: PathBuf,
    media_url: String,
}

impl LocalStorage {
    /// Creates a new local backend rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            media_url: String::new(),
        }
    }

    /// Sets the public URL prefix used by `public_url()`.
    pub fn with_media_url(mut self, prefix: impl Into<String>) -> Self {
        self.media_url = prefix.into();
        self
    }

    /// Resolves a storage key to an absolute path under the root.
    ///
    /// Empty keys and "." resolve to the root itself; a leading "/" is
    /// treated as relative to the root.
    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() || path == "." {
            self.root.clone()
        } else {
            self.root.join(path.trim_start_matches('/'))
        }
    }
}

impl StorageAdapter for LocalStorage {
    fn is_directory(&self, path: &str) -> bool {
        fs::metadata(self.resolve(path)).map(|m| m.is_dir()).unwrap_or(false)
    }

    fn list_directory(&self, path: &str) -> Result<(Vec<String>, Vec<String>), StorageError> {
        let abs = self.resolve(path);
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in fs::read_dir(&abs)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            // Follow symlinks so a link to a directory lists as a directory;
            // broken symlinks fall back to the file bucket
            let is_dir = fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false);
            if is_dir {
                dirs.push(name);
            } else {
                files.push(name);
            }
        }
        dirs.sort();
        files.sort();
        Ok((dirs, files))
    }

    fn exists(&self, path: &str) -> bool {
        // Use symlink_metadata instead of exists() to detect broken symlinks
        // Path::exists() follows symlinks and returns false for broken ones
        fs::symlink_metadata(self.resolve(path)).is_ok()
    }

    fn size(&self, path: &str) -> Result<u64, StorageError> {
        Ok(fs::metadata(self.resolve(path))?.len())
    }

    fn modified_time(&self, path: &str) -> Result<u64, StorageError> {
        let modified = fs::metadata(self.resolve(path))?.modified()?;
        modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn open_read(&self, path: &str) -> Result<Box<dyn Read>, StorageError> {
        let file = fs::File::open(self.resolve(path))?;
        Ok(Box::new(file))
    }

    fn public_url(&self, path: &str) -> String {
        paths::join(&self.media_url, path)
    }

    fn create_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let abs = self.resolve(path);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&abs, content)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let abs = self.resolve(path);
        let metadata = fs::symlink_metadata(&abs)?;
        if metadata.is_dir() {
            fs::remove_dir(&abs)?;
        } else {
            fs::remove_file(&abs)?;
        }
        Ok(())
    }

    fn delete_recursive(&self, path: &str) -> Result<(), StorageError> {
        let abs = self.resolve(path);
        let metadata = fs::symlink_metadata(&abs)?;
        if metadata.is_dir() {
            fs::remove_dir_all(&abs)?;
        } else {
            fs::remove_file(&abs)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl LocalStorage {
    pub(super) fn resolve_for_test(&self, path: &str) -> PathBuf {
        self.resolve(path)
    }

    pub(super) fn root(&self) -> &std::path::Path {
        &self.root
    }
}
