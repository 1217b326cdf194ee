// Use log::* macros instead of println!/eprintln! for proper log level control
#![deny(clippy::print_stdout, clippy::print_stderr)]
// Warn on redundant path prefixes (e.g., std::path::Path when Path is imported)
#![warn(unused_qualifications)]

//! # browsekit
//!
//! A storage-agnostic listing, metadata, and version layer for files and
//! directories under a managed root.
//!
//! The crate presents a uniform file/directory model over heterogeneous
//! storage backends (local disk, object store, in-memory) consumed through
//! the [`StorageAdapter`] trait. On top of that sit two query types:
//!
//! - [`Entry`] — one file or directory: lazily computed, memoized metadata
//!   (kind, size, timestamps, image dimensions) and the version-naming
//!   convention that links an original image to its resized renditions.
//! - [`Listing`] — a query over a directory root: direct children or a
//!   full recursive walk, with optional filtering and sorting.
//!
//! Both take an explicit [`Site`] context carrying the storage backend,
//! the managed base directory, the public URL prefix, and configuration.
//!
//! ```no_run
//! use browsekit::{Listing, LocalStorage, Site, SortKey, SortOrder};
//!
//! let site = Site::new(LocalStorage::new("/srv/media"), "uploads", "/media");
//! let listing = Listing::new("uploads", &site)
//!     .with_sort(SortKey::Modified)
//!     .with_order(SortOrder::Descending);
//! for entry in listing.direct_children() {
//!     println!("{} {:?} {:?}", entry.path(), entry.kind(), entry.size());
//! }
//! ```
//!
//! Metadata accessors never fail: missing objects, stat errors, and corrupt
//! images all surface as `None`. Memoized attributes are never invalidated;
//! construct a fresh `Entry`/`Listing` to observe updated storage state.
//! Instances are `!Sync` by construction — build them per request and keep
//! them on one thread.

pub mod entry;
pub mod listing;
pub mod paths;
pub mod render;
pub mod site;
pub mod storage;

pub use entry::{Entry, FileKind, Orientation, VersionDeleteReport, VersionTag, parse_version};
pub use listing::{CancelToken, Listing, SortKey, SortOrder};
pub use render::{ImageRenderer, VersionRenderer};
pub use site::{Site, SiteConfig, VersionSpec, VersionTier};
pub use storage::{InMemoryStorage, LocalStorage, StorageAdapter, StorageError};
