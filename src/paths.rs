//! String path helpers for storage keys.
//!
//! Storage paths are `/`-separated strings rather than `std::path::Path`
//! because they double as object-store keys; only the local-disk adapter
//! ever turns them into real filesystem paths.

/// Strips a prefix (such as a public URL or the managed base directory)
/// from the front of a path, along with any separator left behind.
///
/// Returns the path unchanged if it does not start with the prefix.
pub fn strip_prefix(path: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.trim_start_matches('/').to_string(),
        None => path.to_string(),
    }
}

/// Joins two path segments with a single separator.
///
/// Empty segments are ignored, so `join("", "a")` is `"a"` and
/// `join("a", "")` is `"a"`.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        return name.to_string();
    }
    if name.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}

/// Returns the parent of a path, or `""` for a bare filename.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Returns the final component of a path.
pub fn filename(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Splits a filename into (root, extension), where the extension includes
/// its leading dot. A leading dot alone (".gitignore") is not an extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}
