//! Sorting configuration and logic for entry collections.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::entry::Entry;

// ============================================================================
// Sorting configuration
// ============================================================================

/// Attribute to sort entries by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    Kind,
    Size,
    Modified,
}

/// Sort order (ascending or descending).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

// ============================================================================
// Sorting logic
// ============================================================================

/// Compares two names using natural (alphanumeric) sort, case-insensitive.
fn compare_names_natural(a: &Entry<'_>, b: &Entry<'_>) -> Ordering {
    alphanumeric_sort::compare_str(a.filename_lower(), b.filename_lower())
}

/// Stably sorts entries by the given key, ascending.
///
/// Unset attribute values (missing size or modification time) compare as
/// the minimal value, so they lead an ascending sort — and trail a
/// descending one once the caller reverses. Equal keys fall back to the
/// natural name comparison, and the sort never panics on missing metadata.
///
/// Descending order is the caller's concern: reverse the stably-sorted
/// sequence (see `Listing`).
pub fn sort_entries(entries: &mut [Entry<'_>], sort_by: SortKey) {
    entries.sort_by(|a, b| {
        let primary = match sort_by {
            SortKey::Name => compare_names_natural(a, b),
            SortKey::Kind => a.kind().cmp(&b.kind()),
            SortKey::Size => match (a.size(), b.size()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a_size), Some(b_size)) => a_size.cmp(&b_size),
            },
            SortKey::Modified => match (a.modified_time(), b.modified_time()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a_time), Some(b_time)) => a_time.cmp(&b_time),
            },
        };

        if primary == Ordering::Equal && sort_by != SortKey::Name {
            compare_names_natural(a, b)
        } else {
            primary
        }
    });
}
