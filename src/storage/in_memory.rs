//! In-memory storage adapter for testing.

use super::{StorageAdapter, StorageError};
use crate::paths;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Modification times start here so they look like plausible Unix seconds.
const CLOCK_BASE: u64 = 1_700_000_000;

#[derive(Debug, Clone)]
enum Node {
    Directory,
    File { content: Vec<u8>, modified_at: u64 },
}

/// A storage backend held entirely in memory.
///
/// Used by tests to exercise listing and version logic without touching the
/// real file system, and as a reference implementation of the full
/// `StorageAdapter` capability set. Parent directories are registered
/// automatically when files or directories are added beneath them.
pub struct InMemoryStorage {
    media_url: String,
    nodes: RwLock<BTreeMap<String, Node>>,
    clock: AtomicU64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            media_url: String::new(),
            nodes: RwLock::new(BTreeMap::new()),
            clock: AtomicU64::new(CLOCK_BASE),
        }
    }

    /// Sets the public URL prefix used by `public_url()`.
    pub fn with_media_url(mut self, prefix: impl Into<String>) -> Self {
        self.media_url = prefix.into();
        self
    }

    /// Registers a directory (and its ancestors).
    pub fn add_directory(&self, path: &str) {
        let path = normalize(path);
        if path.is_empty() {
            return;
        }
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        register_parents(&mut nodes, &path);
        nodes.insert(path, Node::Directory);
    }

    /// Adds a file (and its ancestor directories) with the given content.
    pub fn add_file(&self, path: &str, content: &[u8]) {
        let path = normalize(path);
        let modified_at = self.tick();
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        register_parents(&mut nodes, &path);
        nodes.insert(
            path,
            Node::File {
                content: content.to_vec(),
                modified_at,
            },
        );
    }

    /// Overrides the modification time of an existing file.
    pub fn touch(&self, path: &str, modified_at: u64) {
        let path = normalize(path);
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        if let Some(Node::File { modified_at: m, .. }) = nodes.get_mut(&path) {
            *m = modified_at;
        }
    }

    /// Monotonic fake clock: every mutation gets a strictly later timestamp.
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Trims separators so "uploads/", "/uploads" and "uploads" address the same node.
fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn register_parents(nodes: &mut BTreeMap<String, Node>, path: &str) {
    let mut parent = paths::parent(path);
    while !parent.is_empty() {
        nodes.entry(parent.to_string()).or_insert(Node::Directory);
        parent = paths::parent(parent);
    }
}

impl StorageAdapter for InMemoryStorage {
    fn is_directory(&self, path: &str) -> bool {
        let path = normalize(path);
        if path.is_empty() {
            return true; // the root
        }
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        matches!(nodes.get(&path), Some(Node::Directory))
    }

    fn list_directory(&self, path: &str) -> Result<(Vec<String>, Vec<String>), StorageError> {
        let path = normalize(path);
        if !self.is_directory(&path) {
            return Err(StorageError::NotFound(path));
        }
        let prefix = if path.is_empty() { String::new() } else { format!("{}/", path) };
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for (key, node) in nodes.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            if rest.is_empty() || rest.contains('/') {
                continue; // the directory itself, or a deeper descendant
            }
            match node {
                Node::Directory => dirs.push(rest.to_string()),
                Node::File { .. } => files.push(rest.to_string()),
            }
        }
        // BTreeMap iteration is already name-ordered
        Ok((dirs, files))
    }

    fn exists(&self, path: &str) -> bool {
        let path = normalize(path);
        if path.is_empty() {
            return true;
        }
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        nodes.contains_key(&path)
    }

    fn size(&self, path: &str) -> Result<u64, StorageError> {
        let path = normalize(path);
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        match nodes.get(&path) {
            Some(Node::File { content, .. }) => Ok(content.len() as u64),
            Some(Node::Directory) => Err(StorageError::IoError(format!("{} is a directory", path))),
            None => Err(StorageError::NotFound(path)),
        }
    }

    fn modified_time(&self, path: &str) -> Result<u64, StorageError> {
        let path = normalize(path);
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        match nodes.get(&path) {
            Some(Node::File { modified_at, .. }) => Ok(*modified_at),
            Some(Node::Directory) => Err(StorageError::IoError(format!("{} is a directory", path))),
            None => Err(StorageError::NotFound(path)),
        }
    }

    fn open_read(&self, path: &str) -> Result<Box<dyn Read>, StorageError> {
        let path = normalize(path);
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        match nodes.get(&path) {
            Some(Node::File { content, .. }) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(Node::Directory) => Err(StorageError::IoError(format!("{} is a directory", path))),
            None => Err(StorageError::NotFound(path)),
        }
    }

    fn public_url(&self, path: &str) -> String {
        paths::join(&self.media_url, &normalize(path))
    }

    fn create_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        self.add_file(path, content);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let path = normalize(path);
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        match nodes.get(&path) {
            Some(Node::Directory) => {
                let prefix = format!("{}/", path);
                if nodes.keys().any(|k| k.starts_with(&prefix)) {
                    return Err(StorageError::IoError(format!("{} is not empty", path)));
                }
                nodes.remove(&path);
                Ok(())
            }
            Some(Node::File { .. }) => {
                nodes.remove(&path);
                Ok(())
            }
            None => Err(StorageError::NotFound(path)),
        }
    }

    fn delete_recursive(&self, path: &str) -> Result<(), StorageError> {
        let path = normalize(path);
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        if !nodes.contains_key(&path) {
            return Err(StorageError::NotFound(path));
        }
        let prefix = format!("{}/", path);
        nodes.retain(|k, _| k != &path && !k.starts_with(&prefix));
        Ok(())
    }
}
