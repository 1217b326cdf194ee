//! Version naming convention and lifecycle.
//!
//! A version file is named `<root>_<suffix><ext>` next to its original (or
//! under the configured versions base directory). The suffix must match a
//! configured version name; everything else is an original. The relation is
//! derived from the filename — resolving an original never touches storage.

use super::{Entry, FileKind};
use crate::paths;
use crate::render::VersionRenderer;
use crate::site::{SiteConfig, VersionTier};
use crate::storage::StorageError;

/// Result of parsing a path against the version naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTag {
    /// The path does not carry a configured version suffix.
    Original,
    /// The path names a version of `original_path`.
    VersionOf { original_path: String, suffix: String },
}

/// Parses `path` against the version naming convention.
///
/// The last underscore-delimited segment of the filename root is compared
/// against the configured version names; on a match the original path is
/// rebuilt by dropping the suffix. Pure string manipulation — the original
/// is not checked for existence.
pub fn parse_version(path: &str, config: &SiteConfig) -> VersionTag {
    let filename = paths::filename(path);
    let (root, extension) = paths::split_extension(filename);
    if let Some(pos) = root.rfind('_') {
        let suffix = &root[pos + 1..];
        if config.is_version_suffix(suffix) {
            let original_name = format!("{}{}", &root[..pos], extension);
            return VersionTag::VersionOf {
                original_path: paths::join(paths::parent(path), &original_name),
                suffix: suffix.to_string(),
            };
        }
    }
    VersionTag::Original
}

/// Outcome of a bulk version delete. Cleanup is best-effort: per-item
/// failures are recorded here instead of aborting the remaining deletes.
#[derive(Debug, Default)]
pub struct VersionDeleteReport {
    /// Number of version files removed.
    pub deleted: usize,
    /// Paths that could not be removed, with the reason.
    pub failed: Vec<(String, StorageError)>,
}

impl<'a> Entry<'a> {
    /// Whether this entry's filename carries a configured version suffix.
    pub fn is_version(&self) -> bool {
        matches!(
            parse_version(&self.path, self.site().config()),
            VersionTag::VersionOf { .. }
        )
    }

    /// Resolves the original this entry is a version of, or the entry
    /// itself if it is not a version.
    ///
    /// Suffixes are stripped repeatedly, so the result is never itself a
    /// version (`a_large_thumbnail.jpg` resolves past `a_large.jpg` to
    /// `a.jpg`). Resolution is pure string manipulation and does not verify
    /// that the original exists.
    pub fn original(&self) -> Entry<'a> {
        let mut path = self.path.clone();
        loop {
            match parse_version(&path, self.site().config()) {
                VersionTag::VersionOf { original_path, .. } => path = original_path,
                VersionTag::Original => break,
            }
        }
        if path == self.path {
            self.clone()
        } else {
            Entry::new(path, self.site())
        }
    }

    /// Filename a version with `suffix` would have: `<root>_<suffix><ext>`.
    pub fn version_name(&self, suffix: &str) -> String {
        format!("{}_{}{}", self.filename_root, suffix, self.extension)
    }

    /// Directory that receives generated versions: the configured base
    /// directory if it exists in storage, else this entry's own parent.
    pub fn versions_basedir(&self) -> String {
        if let Some(basedir) = self.site().config().versions_basedir.as_deref()
            && self.site().storage().exists(basedir)
        {
            return basedir.to_string();
        }
        self.head.clone()
    }

    /// Target path for the version with `suffix`. Errors if the suffix is
    /// not configured.
    pub fn version_path(&self, suffix: &str) -> Result<String, StorageError> {
        if !self.site().config().is_version_suffix(suffix) {
            return Err(StorageError::NotFound(format!("no configured version '{}'", suffix)));
        }
        Ok(paths::join(&self.versions_basedir(), &self.version_name(suffix)))
    }

    /// Candidate version paths for this entry, covering the given tier.
    /// Only images have versions; everything else yields an empty list.
    pub fn version_paths(&self, tier: VersionTier) -> Vec<String> {
        if self.kind() != FileKind::Image {
            return Vec::new();
        }
        let basedir = self.versions_basedir();
        self.site()
            .config()
            .tier_suffixes(tier)
            .into_iter()
            .map(|suffix| paths::join(&basedir, &self.version_name(suffix)))
            .collect()
    }

    /// Ensures the version with `suffix` exists and is fresh, rendering it
    /// if necessary, and returns the version's entry.
    ///
    /// Staleness is decided strictly by modification-time comparison: a
    /// missing version is rendered, a version older than its original is
    /// re-rendered with `force`, and a fresh version is returned untouched.
    /// Rendering and stat failures propagate — generation is a primary
    /// operation, not best-effort.
    pub fn generate_version(
        &self,
        suffix: &str,
        renderer: &dyn VersionRenderer,
    ) -> Result<Entry<'a>, StorageError> {
        let spec = self
            .site()
            .config()
            .versions
            .get(suffix)
            .copied()
            .ok_or_else(|| StorageError::NotFound(format!("no configured version '{}'", suffix)))?;
        let target = paths::join(&self.versions_basedir(), &self.version_name(suffix));
        let storage = self.site().storage();

        if !storage.exists(&target) {
            log::debug!("generating version {} for {}", suffix, self.path);
            renderer.render(storage, &self.path, &spec, &target, false)?;
        } else if storage.modified_time(&self.path)? > storage.modified_time(&target)? {
            log::debug!("regenerating stale version {} for {}", suffix, self.path);
            renderer.render(storage, &self.path, &spec, &target, true)?;
        }

        Ok(Entry::new(target, self.site()))
    }

    /// Best-effort removal of this entry's version files for the given
    /// tier. Individual failures are recorded in the report (and logged)
    /// so one missing or locked version does not block the rest.
    pub fn delete_versions(&self, tier: VersionTier) -> VersionDeleteReport {
        let mut report = VersionDeleteReport::default();
        for path in self.version_paths(tier) {
            match self.site().storage().delete(&path) {
                Ok(()) => report.deleted += 1,
                Err(err) => {
                    log::warn!("could not delete version {}: {}", path, err);
                    report.failed.push((path, err));
                }
            }
        }
        report
    }
}
