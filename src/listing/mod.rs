//! Directory listing module — enumeration, filtering, sorting, counters.

pub(crate) mod operations;
pub(crate) mod sorting;

pub use operations::{CancelToken, Listing};
pub use sorting::{SortKey, SortOrder, sort_entries};
