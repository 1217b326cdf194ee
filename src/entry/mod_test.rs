//! Tests for Entry identity and memoized metadata.
//!
//! These run against `InMemoryStorage` so they exercise the metadata
//! contract without touching the real file system.

use super::{Entry, FileKind, Orientation};
use crate::site::Site;
use crate::storage::{InMemoryStorage, StorageAdapter};
use image::ImageFormat;
use std::io::Cursor;
use std::sync::Arc;

/// Site over a shared in-memory backend; tests keep the `Arc` so they can
/// mutate storage after the site is built.
fn site_over(storage: &Arc<InMemoryStorage>) -> Site {
    Site::new(Arc::clone(storage), "uploads", "/media")
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn test_media_url_prefix_is_stripped_at_construction() {
    let storage = Arc::new(InMemoryStorage::new());
    let site = site_over(&storage);

    let entry = Entry::new("/media/uploads/photo.jpg", &site);
    assert_eq!(entry.path(), "uploads/photo.jpg");
    assert!(!entry.path().contains("/media"));

    // Paths without the prefix pass through unchanged
    let entry = Entry::new("uploads/photo.jpg", &site);
    assert_eq!(entry.path(), "uploads/photo.jpg");
}

#[test]
fn test_identity_fields_derive_from_path() {
    let storage = Arc::new(InMemoryStorage::new());
    let site = site_over(&storage);

    let entry = Entry::new("uploads/sub/Photo Of Me.JPG", &site);
    assert_eq!(entry.head(), "uploads/sub");
    assert_eq!(entry.filename(), "Photo Of Me.JPG");
    assert_eq!(entry.filename_lower(), "photo of me.jpg");
    assert_eq!(entry.filename_root(), "Photo Of Me");
    assert_eq!(entry.extension(), ".JPG");
    assert_eq!(entry.mimetype().map(|m| m.essence_str().to_string()).as_deref(), Some("image/jpeg"));
    assert_eq!(entry.to_string(), "uploads/sub/Photo Of Me.JPG");
}

#[test]
fn test_kind_is_folder_for_directories_and_mapped_for_files() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_directory("uploads/album");
    storage.add_file("uploads/album/photo.png", b"x");
    let site = site_over(&storage);

    assert_eq!(Entry::new("uploads/album", &site).kind(), FileKind::Folder);
    assert_eq!(Entry::new("uploads/album/photo.png", &site).kind(), FileKind::Image);
    assert_eq!(Entry::new("uploads/notes.txt", &site).kind(), FileKind::Document);
    assert_eq!(Entry::new("uploads/blob.xyz", &site).kind(), FileKind::Other);
    assert_eq!(Entry::new("uploads/noext", &site).kind(), FileKind::Other);
}

#[test]
fn test_size_and_modified_are_none_for_missing_objects() {
    let storage = Arc::new(InMemoryStorage::new());
    let site = site_over(&storage);

    let entry = Entry::new("uploads/nowhere.txt", &site);
    assert!(!entry.exists());
    assert_eq!(entry.size(), None);
    assert_eq!(entry.modified_time(), None);
    assert_eq!(entry.modified_datetime(), None);
}

#[test]
fn test_size_and_modified_delegate_to_storage() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_file("uploads/notes.txt", b"hello world");
    storage.touch("uploads/notes.txt", 1_700_000_123);
    let site = site_over(&storage);

    let entry = Entry::new("uploads/notes.txt", &site);
    assert!(entry.exists());
    assert_eq!(entry.size(), Some(11));
    assert_eq!(entry.modified_time(), Some(1_700_000_123));
    let datetime = entry.modified_datetime().unwrap();
    assert_eq!(datetime.timestamp(), 1_700_000_123);
}

#[test]
fn test_memoized_attributes_survive_storage_changes() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_file("uploads/notes.txt", b"hello");
    let site = site_over(&storage);

    let entry = Entry::new("uploads/notes.txt", &site);
    assert!(entry.exists());
    assert_eq!(entry.size(), Some(5));

    storage.delete("uploads/notes.txt").unwrap();

    // Stale by design: memoized flags are never invalidated
    assert!(entry.exists());
    assert_eq!(entry.size(), Some(5));

    // A fresh entry observes the new state
    let fresh = Entry::new("uploads/notes.txt", &site);
    assert!(!fresh.exists());
    assert_eq!(fresh.size(), None);
}

#[test]
fn test_dimensions_for_landscape_png() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_file("uploads/wide.png", &png_bytes(16, 8));
    let site = site_over(&storage);

    let entry = Entry::new("uploads/wide.png", &site);
    assert_eq!(entry.dimensions(), Some((16, 8)));
    assert_eq!(entry.width(), Some(16));
    assert_eq!(entry.height(), Some(8));
    assert_eq!(entry.aspect_ratio(), Some(2.0));
    assert_eq!(entry.orientation(), Some(Orientation::Landscape));
}

#[test]
fn test_dimensions_for_portrait_png() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_file("uploads/tall.png", &png_bytes(8, 16));
    let site = site_over(&storage);

    let entry = Entry::new("uploads/tall.png", &site);
    assert_eq!(entry.orientation(), Some(Orientation::Portrait));
}

#[test]
fn test_dimensions_unset_for_corrupt_image() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_file("uploads/broken.png", b"definitely not a png");
    let site = site_over(&storage);

    let entry = Entry::new("uploads/broken.png", &site);
    assert_eq!(entry.kind(), FileKind::Image);
    // Decode failure is swallowed; every dependent accessor tolerates it
    assert_eq!(entry.dimensions(), None);
    assert_eq!(entry.width(), None);
    assert_eq!(entry.height(), None);
    assert_eq!(entry.aspect_ratio(), None);
    assert_eq!(entry.orientation(), None);
}

#[test]
fn test_dimensions_unset_for_non_images() {
    let storage = Arc::new(InMemoryStorage::new());
    // Valid PNG bytes, but a .txt extension classifies as Document
    storage.add_file("uploads/sneaky.txt", &png_bytes(4, 4));
    let site = site_over(&storage);

    let entry = Entry::new("uploads/sneaky.txt", &site);
    assert_eq!(entry.dimensions(), None);
}

#[test]
fn test_dimensions_unset_for_missing_image() {
    let storage = Arc::new(InMemoryStorage::new());
    let site = site_over(&storage);

    let entry = Entry::new("uploads/ghost.png", &site);
    assert_eq!(entry.dimensions(), None);
}

#[test]
fn test_is_empty_only_for_childless_directories() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_directory("uploads/empty");
    storage.add_directory("uploads/with_dir/sub");
    storage.add_file("uploads/with_file/notes.txt", b"x");
    let site = site_over(&storage);

    assert!(Entry::new("uploads/empty", &site).is_empty());
    assert!(!Entry::new("uploads/with_dir", &site).is_empty());
    assert!(!Entry::new("uploads/with_file", &site).is_empty());
    assert!(!Entry::new("uploads/with_file/notes.txt", &site).is_empty());
}

#[test]
fn test_url_delegates_to_storage() {
    let storage = Arc::new(InMemoryStorage::new().with_media_url("/media"));
    storage.add_file("uploads/photo.jpg", b"x");
    let site = Site::new(Arc::clone(&storage), "uploads", "/media");

    let entry = Entry::new("uploads/photo.jpg", &site);
    assert_eq!(entry.url(), "/media/uploads/photo.jpg");
}

#[test]
fn test_path_relative_directory_strips_site_directory() {
    let storage = Arc::new(InMemoryStorage::new());
    let site = site_over(&storage);

    let entry = Entry::new("uploads/album/photo.jpg", &site);
    assert_eq!(entry.path_relative_directory(), "album/photo.jpg");
    assert_eq!(entry.dir(), "album");
}

#[test]
fn test_delete_removes_files_and_directories() {
    let storage = Arc::new(InMemoryStorage::new());
    storage.add_file("uploads/notes.txt", b"x");
    storage.add_file("uploads/album/a.jpg", b"x");
    storage.add_file("uploads/album/sub/b.jpg", b"x");
    let site = site_over(&storage);

    Entry::new("uploads/notes.txt", &site).delete().unwrap();
    assert!(!storage.exists("uploads/notes.txt"));

    // Directories are removed recursively
    Entry::new("uploads/album", &site).delete().unwrap();
    assert!(!storage.exists("uploads/album"));
    assert!(!storage.exists("uploads/album/sub/b.jpg"));
}

#[test]
fn test_delete_missing_object_propagates_error() {
    let storage = Arc::new(InMemoryStorage::new());
    let site = site_over(&storage);

    let result = Entry::new("uploads/nowhere.txt", &site).delete();
    assert!(result.is_err());
}
