//! Site context and configuration.
//!
//! A `Site` bundles everything a query needs: the storage backend, the
//! managed base directory, the public URL prefix, and the read-only
//! configuration. Every `Entry` and `Listing` takes an explicit `&Site` —
//! there is no global default site.

use crate::entry::FileKind;
use crate::storage::StorageAdapter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target geometry for one version suffix.
///
/// `height: None` means "scale to width, keep aspect ratio". `crop` scales
/// to fill the box exactly, trimming overflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionSpec {
    pub width: u32,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub crop: bool,
}

/// Which version set an operation addresses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VersionTier {
    /// Every configured version suffix.
    All,
    /// The admin subset used for admin-UI thumbnails.
    Admin,
}

/// Read-only configuration consumed by entries and listings.
///
/// Loading this from disk is the caller's concern; the serde derives exist
/// so an external loader can deserialize it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    /// Version suffix name → target geometry. Suffix names must not
    /// contain underscores, or version parsing cannot recognize them.
    pub versions: BTreeMap<String, VersionSpec>,
    /// Subset of version names used for admin-UI thumbnails.
    pub admin_versions: Vec<String>,
    /// Directory that collects generated versions. When unset (or missing
    /// in storage), versions land next to their original.
    pub versions_basedir: Option<String>,
    /// Extension → kind map; extensions include the leading dot.
    pub extensions: BTreeMap<FileKind, Vec<String>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut versions = BTreeMap::new();
        versions.insert("admin_thumbnail".to_string(), VersionSpec { width: 60, height: Some(60), crop: true });
        versions.insert("thumbnail".to_string(), VersionSpec { width: 60, height: Some(60), crop: true });
        versions.insert("small".to_string(), VersionSpec { width: 140, height: None, crop: false });
        versions.insert("medium".to_string(), VersionSpec { width: 300, height: None, crop: false });
        versions.insert("big".to_string(), VersionSpec { width: 460, height: None, crop: false });
        versions.insert("large".to_string(), VersionSpec { width: 680, height: None, crop: false });

        let mut extensions = BTreeMap::new();
        extensions.insert(
            FileKind::Image,
            vec![".jpg", ".jpeg", ".gif", ".png", ".tif", ".tiff", ".webp"],
        );
        extensions.insert(FileKind::Document, vec![".pdf", ".doc", ".rtf", ".txt", ".xls", ".csv", ".md"]);
        extensions.insert(FileKind::Video, vec![".mov", ".wmv", ".mpeg", ".mpg", ".avi", ".mp4", ".webm"]);
        extensions.insert(FileKind::Audio, vec![".mp3", ".wav", ".aiff", ".midi", ".m4a", ".flac", ".ogg"]);
        extensions.insert(
            FileKind::Code,
            vec![".rs", ".py", ".js", ".ts", ".html", ".css", ".json", ".toml", ".yaml", ".sh"],
        );
        extensions.insert(FileKind::Archive, vec![".zip", ".tar", ".gz", ".bz2", ".xz", ".7z", ".rar"]);
        let extensions = extensions
            .into_iter()
            .map(|(kind, exts)| (kind, exts.into_iter().map(String::from).collect()))
            .collect();

        Self {
            versions,
            admin_versions: vec!["admin_thumbnail".to_string(), "thumbnail".to_string()],
            versions_basedir: None,
            extensions,
        }
    }
}

impl SiteConfig {
    /// Classifies a filename extension (with leading dot, any case).
    /// Unmapped extensions classify as `Other`.
    pub fn kind_for_extension(&self, extension: &str) -> FileKind {
        let extension = extension.to_lowercase();
        for (kind, extensions) in &self.extensions {
            if extensions.iter().any(|e| e == &extension) {
                return *kind;
            }
        }
        FileKind::Other
    }

    /// Whether `suffix` names a configured version.
    pub fn is_version_suffix(&self, suffix: &str) -> bool {
        self.versions.contains_key(suffix)
    }

    /// The version suffix names addressed by `tier`, in deterministic order.
    pub fn tier_suffixes(&self, tier: VersionTier) -> Vec<&str> {
        match tier {
            VersionTier::All => self.versions.keys().map(String::as_str).collect(),
            VersionTier::Admin => self
                .admin_versions
                .iter()
                .map(String::as_str)
                .filter(|s| self.versions.contains_key(*s))
                .collect(),
        }
    }
}

/// Immutable-per-request context bundle: storage backend, managed base
/// directory, public URL prefix, and configuration.
pub struct Site {
    storage: Box<dyn StorageAdapter>,
    directory: String,
    media_url: String,
    config: SiteConfig,
}

impl Site {
    /// Creates a site with the default configuration.
    ///
    /// `directory` is the managed base directory (a storage key prefix,
    /// e.g. "uploads"); `media_url` is the public URL prefix stripped from
    /// incoming paths at entry construction (e.g. "/media").
    pub fn new(
        storage: impl StorageAdapter + 'static,
        directory: impl Into<String>,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            storage: Box::new(storage),
            directory: directory.into(),
            media_url: media_url.into(),
            config: SiteConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SiteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage(&self) -> &dyn StorageAdapter {
        self.storage.as_ref()
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_classifies_common_extensions() {
        let config = SiteConfig::default();
        assert_eq!(config.kind_for_extension(".jpg"), FileKind::Image);
        assert_eq!(config.kind_for_extension(".JPG"), FileKind::Image);
        assert_eq!(config.kind_for_extension(".pdf"), FileKind::Document);
        assert_eq!(config.kind_for_extension(".rs"), FileKind::Code);
        assert_eq!(config.kind_for_extension(".zip"), FileKind::Archive);
        assert_eq!(config.kind_for_extension(".xyz"), FileKind::Other);
        assert_eq!(config.kind_for_extension(""), FileKind::Other);
    }

    #[test]
    fn test_default_config_admin_tier_is_subset_of_versions() {
        let config = SiteConfig::default();
        let all = config.tier_suffixes(VersionTier::All);
        for suffix in config.tier_suffixes(VersionTier::Admin) {
            assert!(all.contains(&suffix), "admin suffix {} missing from versions", suffix);
        }
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let json = r#"{
            "versions": {"thumb": {"width": 80, "height": 80, "crop": true}},
            "adminVersions": ["thumb"],
            "versionsBasedir": "_versions"
        }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.versions["thumb"].width, 80);
        assert!(config.versions["thumb"].crop);
        assert_eq!(config.versions_basedir.as_deref(), Some("_versions"));
        // extensions falls back to the stock map
        assert_eq!(config.kind_for_extension(".png"), FileKind::Image);
    }
}
