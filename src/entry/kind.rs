//! Coarse file classification.

use serde::{Deserialize, Serialize};

/// Coarse classification of a file, derived from its extension (or from
/// directory status, which always wins).
///
/// The variant order doubles as the sort order for kind-sorted listings:
/// folders first, then media, documents, code, archives, and everything else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    Folder,
    Image,
    Document,
    Video,
    Audio,
    Code,
    Archive,
    Other,
}

impl FileKind {
    /// All extension-mapped kinds, i.e. everything except `Folder` and the
    /// `Other` fallback. Used to build and validate extension maps.
    pub const MAPPED: [FileKind; 6] = [
        FileKind::Image,
        FileKind::Document,
        FileKind::Video,
        FileKind::Audio,
        FileKind::Code,
        FileKind::Archive,
    ];
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Folder => "Folder",
            Self::Image => "Image",
            Self::Document => "Document",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Code => "Code",
            Self::Archive => "Archive",
            Self::Other => "Other",
        };
        write!(f, "{}", name)
    }
}
