//! A single file or directory: identity, classification, and lazily
//! computed metadata.

use crate::paths;
use crate::site::Site;
use crate::storage::StorageError;
use chrono::{DateTime, Utc};
use mime_guess::Mime;
use std::cell::OnceCell;
use std::io::{Cursor, Read};

mod kind;
mod versions;

pub use kind::FileKind;
pub use versions::{VersionDeleteReport, VersionTag, parse_version};

#[cfg(test)]
mod mod_test;

/// Landscape/portrait classification of an image.
///
/// Square images count as landscape.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// One file or directory under the managed root.
///
/// Identity fields (path, filename, extension, MIME type) are computed at
/// construction; the public URL prefix is stripped from the incoming path.
/// Derived attributes — directory status, kind, existence, size,
/// modification time, image dimensions — are computed on first access and
/// memoized for the lifetime of the instance. There is no invalidation:
/// construct a fresh `Entry` to observe updated storage state. Deleting the
/// underlying object does not reset the memoized flags.
///
/// Metadata accessors are total: a missing object, a stat failure, or a
/// corrupt image yields `None`, never an error.
#[derive(Clone)]
pub struct Entry<'a> {
    site: &'a Site,
    path: String,
    head: String,
    filename: String,
    filename_lower: String,
    filename_root: String,
    extension: String,
    mimetype: Option<Mime>,

    // Memoized attributes. OnceCell keeps the instance !Sync, which makes
    // the single-threaded memoization contract compiler-enforced.
    is_directory: OnceCell<bool>,
    kind: OnceCell<FileKind>,
    exists: OnceCell<bool>,
    size: OnceCell<Option<u64>>,
    modified_at: OnceCell<Option<u64>>,
    dimensions: OnceCell<Option<(u32, u32)>>,
}

impl<'a> Entry<'a> {
    /// Creates an entry for `path`, stripping the site's public URL prefix
    /// if present.
    pub fn new(path: impl Into<String>, site: &'a Site) -> Self {
        let path = paths::strip_prefix(&path.into(), site.media_url());
        let head = paths::parent(&path).to_string();
        let filename = paths::filename(&path).to_string();
        let (filename_root, extension) = paths::split_extension(&filename);
        let mimetype = mime_guess::from_path(&filename).first();
        Self {
            site,
            filename_lower: filename.to_lowercase(),
            filename_root: filename_root.to_string(),
            extension: extension.to_string(),
            head,
            filename,
            path,
            mimetype,
            is_directory: OnceCell::new(),
            kind: OnceCell::new(),
            exists: OnceCell::new(),
            size: OnceCell::new(),
            modified_at: OnceCell::new(),
            dimensions: OnceCell::new(),
        }
    }

    // ========================================
    // Identity
    // ========================================

    /// The stored path (public URL prefix already stripped).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parent directory of the path.
    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn filename_lower(&self) -> &str {
        &self.filename_lower
    }

    /// Filename without its extension.
    pub fn filename_root(&self) -> &str {
        &self.filename_root
    }

    /// Extension including the leading dot, or `""`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// MIME type guessed from the filename.
    pub fn mimetype(&self) -> Option<&Mime> {
        self.mimetype.as_ref()
    }

    pub(crate) fn site(&self) -> &'a Site {
        self.site
    }

    // ========================================
    // Paths and URLs
    // ========================================

    /// Public URL for this entry, built by the storage backend.
    pub fn url(&self) -> String {
        self.site.storage().public_url(&self.path)
    }

    /// Path relative to the site's managed base directory.
    pub fn path_relative_directory(&self) -> String {
        paths::strip_prefix(&self.path, self.site.directory())
    }

    /// Parent directory of `path_relative_directory()`.
    pub fn dir(&self) -> String {
        paths::parent(&self.path_relative_directory()).to_string()
    }

    // ========================================
    // Derived attributes (memoized)
    // ========================================

    pub fn is_directory(&self) -> bool {
        *self
            .is_directory
            .get_or_init(|| self.site.storage().is_directory(&self.path))
    }

    /// Coarse classification: `Folder` for directories, otherwise the
    /// configured extension mapping (falling back to `Other`).
    pub fn kind(&self) -> FileKind {
        *self.kind.get_or_init(|| {
            if self.is_directory() {
                FileKind::Folder
            } else {
                self.site.config().kind_for_extension(&self.extension)
            }
        })
    }

    pub fn exists(&self) -> bool {
        *self.exists.get_or_init(|| self.site.storage().exists(&self.path))
    }

    /// Size in bytes, or `None` if the object is missing or cannot be
    /// stat'ed.
    pub fn size(&self) -> Option<u64> {
        *self.size.get_or_init(|| {
            if !self.exists() {
                return None;
            }
            self.site.storage().size(&self.path).ok()
        })
    }

    /// Modification time as Unix seconds, or `None` if unavailable.
    pub fn modified_time(&self) -> Option<u64> {
        *self.modified_at.get_or_init(|| {
            if !self.exists() {
                return None;
            }
            self.site.storage().modified_time(&self.path).ok()
        })
    }

    /// `modified_time()` as a UTC datetime.
    pub fn modified_datetime(&self) -> Option<DateTime<Utc>> {
        self.modified_time().and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
    }

    /// Pixel dimensions `(width, height)` for image entries.
    ///
    /// Returns `None` for non-images, and for images that are missing,
    /// unreadable, or corrupt — dimension probing never fails loudly.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        *self.dimensions.get_or_init(|| {
            if self.kind() != FileKind::Image {
                return None;
            }
            let dims = self.probe_dimensions();
            if dims.is_none() {
                log::debug!("could not measure image dimensions for {}", self.path);
            }
            dims
        })
    }

    fn probe_dimensions(&self) -> Option<(u32, u32)> {
        let mut reader = self.site.storage().open_read(&self.path).ok()?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).ok()?;
        image::ImageReader::new(Cursor::new(buf))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }

    pub fn width(&self) -> Option<u32> {
        self.dimensions().map(|(w, _)| w)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions().map(|(_, h)| h)
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        let (width, height) = self.dimensions()?;
        if height == 0 {
            return None;
        }
        Some(f64::from(width) / f64::from(height))
    }

    pub fn orientation(&self) -> Option<Orientation> {
        let (width, height) = self.dimensions()?;
        if width >= height {
            Some(Orientation::Landscape)
        } else {
            Some(Orientation::Portrait)
        }
    }

    // ========================================
    // Folder attributes
    // ========================================

    /// True only for a directory whose direct listing has no files and no
    /// subdirectories. Not memoized.
    pub fn is_empty(&self) -> bool {
        if !self.is_directory() {
            return false;
        }
        match self.site.storage().list_directory(&self.path) {
            Ok((dirs, files)) => dirs.is_empty() && files.is_empty(),
            Err(_) => false,
        }
    }

    // ========================================
    // Deletion
    // ========================================

    /// Removes the underlying object: recursively for directories, singly
    /// otherwise. Failures propagate — this is the primary requested
    /// operation, not best-effort cleanup.
    ///
    /// The in-memory entry is not invalidated; memoized flags go stale by
    /// design.
    pub fn delete(&self) -> Result<(), StorageError> {
        if self.is_directory() {
            self.site.storage().delete_recursive(&self.path)
        } else {
            self.site.storage().delete(&self.path)
        }
    }
}

impl std::fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl std::fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry").field("path", &self.path).finish_non_exhaustive()
    }
}
