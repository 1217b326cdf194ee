//! The `Listing` query: enumeration, filtering, walking, and counters.

use std::cell::OnceCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::entry::Entry;
use crate::listing::sorting::{SortKey, SortOrder, sort_entries};
use crate::paths;
use crate::site::Site;

/// Cooperative cancellation flag for recursive walks.
///
/// Clone the token, hand one clone to the walking call, and flip the other
/// from wherever the abort decision is made. A cancelled walk stops
/// descending and returns what it has accumulated so far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

type FilterFn<'a> = Box<dyn Fn(&Entry<'a>) -> bool + 'a>;

/// A query over a directory root, producing `Entry` collections.
///
/// Constructed per query and not shared across threads. The direct-children
/// base set and the four result counters are memoized on first computation
/// and never recomputed, even if underlying storage changes — construct a
/// fresh `Listing` to observe updates. Sorting and ordering are applied to
/// a fresh snapshot on every call, so the order of one call never leaks
/// into the next.
pub struct Listing<'a> {
    path: String,
    filter: Option<FilterFn<'a>>,
    sort_by: Option<SortKey>,
    sort_order: SortOrder,
    site: &'a Site,

    is_directory: OnceCell<bool>,
    base_entries: OnceCell<Vec<Entry<'a>>>,
    total_direct: OnceCell<usize>,
    total_walk: OnceCell<usize>,
    filtered_direct: OnceCell<usize>,
    filtered_walk: OnceCell<usize>,
}

impl<'a> Listing<'a> {
    /// Creates a listing rooted at `path` (a storage key, typically under
    /// the site's managed directory).
    pub fn new(path: impl Into<String>, site: &'a Site) -> Self {
        Self {
            path: path.into(),
            filter: None,
            sort_by: None,
            sort_order: SortOrder::default(),
            site,
            is_directory: OnceCell::new(),
            base_entries: OnceCell::new(),
            total_direct: OnceCell::new(),
            total_walk: OnceCell::new(),
            filtered_direct: OnceCell::new(),
            filtered_walk: OnceCell::new(),
        }
    }

    /// Sets the predicate applied by `filtered_direct()`/`filtered_walk()`.
    pub fn with_filter(mut self, filter: impl Fn(&Entry<'a>) -> bool + 'a) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the root path is a directory; memoized. When false, every
    /// listing operation short-circuits to empty.
    pub fn is_directory(&self) -> bool {
        *self
            .is_directory
            .get_or_init(|| self.site.storage().is_directory(&self.path))
    }

    /// Raw child names of the root, subdirectories then files, without
    /// `Entry` construction. Empty if the root is not a directory.
    pub fn raw_listing(&self) -> Vec<String> {
        if !self.is_directory() {
            return Vec::new();
        }
        match self.site.storage().list_directory(&self.path) {
            Ok((mut dirs, files)) => {
                dirs.extend(files);
                dirs
            }
            Err(err) => {
                log::warn!("could not list {}: {}", self.path, err);
                Vec::new()
            }
        }
    }

    /// Snapshots, sorts, and orders a collection according to this
    /// listing's sort parameters. Reversal happens on the snapshot, never
    /// on the memoized base set.
    fn ordered(&self, mut entries: Vec<Entry<'a>>) -> Vec<Entry<'a>> {
        if let Some(sort_by) = self.sort_by {
            sort_entries(&mut entries, sort_by);
        }
        if self.sort_order == SortOrder::Descending {
            entries.reverse();
        }
        entries
    }

    // ========================================
    // Producers
    // ========================================

    /// One level of children wrapped as entries, sorted per this listing's
    /// parameters. The unsorted base set is built once and memoized;
    /// every call returns a freshly ordered snapshot.
    pub fn direct_children(&self) -> Vec<Entry<'a>> {
        let base = self.base_entries.get_or_init(|| {
            self.raw_listing()
                .into_iter()
                .map(|name| Entry::new(paths::join(&self.path, &name), self.site))
                .collect()
        });
        let _ = self.total_direct.set(base.len());
        self.ordered(base.clone())
    }

    /// Full recursive tree as entries, sorted per this listing's
    /// parameters. See `walk_paths` for the traversal order.
    pub fn recursive_walk(&self) -> Vec<Entry<'a>> {
        self.recursive_walk_cancellable(&CancelToken::new())
    }

    /// `recursive_walk` with a cooperative cancellation token, checked once
    /// per directory visited.
    pub fn recursive_walk_cancellable(&self, cancel: &CancelToken) -> Vec<Entry<'a>> {
        let entries: Vec<Entry<'a>> = self
            .walk_paths(cancel)
            .into_iter()
            .map(|relative| Entry::new(paths::join(self.site.directory(), &relative), self.site))
            .collect();
        let _ = self.total_walk.set(entries.len());
        self.ordered(entries)
    }

    /// Depth-first walk of the tree, as paths relative to the site's
    /// managed directory. For each subdirectory the walk recurses first and
    /// appends the subdirectory's own path afterwards, then appends the
    /// current directory's files — so a directory's entry always follows
    /// all of its descendants. Unreadable subtrees are skipped with a
    /// warning.
    ///
    /// Danger: symbolic links can create cycles; the walk does not detect
    /// them. The cancel token is the escape hatch.
    pub fn walk_paths(&self, cancel: &CancelToken) -> Vec<String> {
        let mut result = Vec::new();
        if self.is_directory() {
            self.walk_into(&self.path, &mut result, cancel);
        }
        result
    }

    fn walk_into(&self, path: &str, result: &mut Vec<String>, cancel: &CancelToken) {
        if cancel.is_cancelled() {
            return;
        }
        let (dirs, files) = match self.site.storage().list_directory(path) {
            Ok(listing) => listing,
            Err(err) => {
                log::warn!("walk skipping unreadable {}: {}", path, err);
                return;
            }
        };
        for dir in &dirs {
            let subdir = paths::join(path, dir);
            self.walk_into(&subdir, result, cancel);
            result.push(paths::strip_prefix(&subdir, self.site.directory()));
        }
        for file in &files {
            result.push(paths::strip_prefix(&paths::join(path, file), self.site.directory()));
        }
    }

    /// Direct children, filtered by the configured predicate (all of them
    /// when no predicate is set).
    pub fn filtered_direct(&self) -> Vec<Entry<'a>> {
        let entries = self.apply_filter(self.direct_children());
        let _ = self.filtered_direct.set(entries.len());
        entries
    }

    /// Walk results, filtered by the configured predicate.
    pub fn filtered_walk(&self) -> Vec<Entry<'a>> {
        let entries = self.apply_filter(self.recursive_walk());
        let _ = self.filtered_walk.set(entries.len());
        entries
    }

    fn apply_filter(&self, entries: Vec<Entry<'a>>) -> Vec<Entry<'a>> {
        match &self.filter {
            Some(filter) => entries.into_iter().filter(|e| filter(e)).collect(),
            None => entries,
        }
    }

    // ========================================
    // Counters
    // ========================================
    // Each counter is populated the first time its producing operation
    // runs and is returned thereafter without recomputation, even if
    // underlying storage changes.

    /// Number of entries in the direct listing.
    pub fn total_direct(&self) -> usize {
        match self.total_direct.get() {
            Some(count) => *count,
            None => self.direct_children().len(),
        }
    }

    /// Number of entries in the recursive walk.
    pub fn total_walk(&self) -> usize {
        match self.total_walk.get() {
            Some(count) => *count,
            None => self.recursive_walk().len(),
        }
    }

    /// Number of entries in the filtered direct listing.
    pub fn filtered_direct_count(&self) -> usize {
        match self.filtered_direct.get() {
            Some(count) => *count,
            None => self.filtered_direct().len(),
        }
    }

    /// Number of entries in the filtered walk.
    pub fn filtered_walk_count(&self) -> usize {
        match self.filtered_walk.get() {
            Some(count) => *count,
            None => self.filtered_walk().len(),
        }
    }
}
