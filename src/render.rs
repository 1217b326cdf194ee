//! Version rendering: the capability seam and a pure-Rust image resizer.

use crate::site::VersionSpec;
use crate::storage::{StorageAdapter, StorageError};
use image::ImageFormat;
use image::imageops::FilterType;
use std::io::{Cursor, Read};

/// Capability that produces a derived artifact at `target` from `source`.
///
/// `force` bypasses the renderer's own "already exists" short-circuit; the
/// caller (not the renderer) decides staleness.
pub trait VersionRenderer {
    fn render(
        &self,
        storage: &dyn StorageAdapter,
        source: &str,
        spec: &VersionSpec,
        target: &str,
        force: bool,
    ) -> Result<(), StorageError>;
}

/// Resizes images with the `image` crate (Lanczos3 resampling), reading the
/// source through the storage backend and writing the result back through
/// `create_file`. The output format follows the target extension, falling
/// back to PNG when the extension is unknown.
#[derive(Debug, Default)]
pub struct ImageRenderer;

impl VersionRenderer for ImageRenderer {
    fn render(
        &self,
        storage: &dyn StorageAdapter,
        source: &str,
        spec: &VersionSpec,
        target: &str,
        force: bool,
    ) -> Result<(), StorageError> {
        if !force && storage.exists(target) {
            return Ok(());
        }

        let mut buf = Vec::new();
        storage.open_read(source)?.read_to_end(&mut buf)?;
        let img = image::load_from_memory(&buf).map_err(|e| StorageError::IoError(e.to_string()))?;

        // height: None means "scale to width, keep aspect"
        let height = spec.height.unwrap_or(u32::MAX);
        let resized = if spec.crop && spec.height.is_some() {
            img.resize_to_fill(spec.width, height, FilterType::Lanczos3)
        } else {
            img.resize(spec.width, height, FilterType::Lanczos3)
        };

        let format = ImageFormat::from_path(target).unwrap_or(ImageFormat::Png);
        let mut out = Cursor::new(Vec::new());
        resized
            .write_to(&mut out, format)
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        storage.create_file(target, out.get_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn dimensions_of(storage: &InMemoryStorage, path: &str) -> (u32, u32) {
        let mut buf = Vec::new();
        storage.open_read(path).unwrap().read_to_end(&mut buf).unwrap();
        image::ImageReader::new(Cursor::new(buf))
            .with_guessed_format()
            .unwrap()
            .into_dimensions()
            .unwrap()
    }

    #[test]
    fn test_render_crops_to_exact_box() {
        let storage = InMemoryStorage::new();
        storage.add_file("uploads/photo.png", &png_bytes(16, 8));
        let spec = VersionSpec {
            width: 4,
            height: Some(4),
            crop: true,
        };

        ImageRenderer
            .render(&storage, "uploads/photo.png", &spec, "uploads/photo_thumb.png", false)
            .unwrap();

        assert_eq!(dimensions_of(&storage, "uploads/photo_thumb.png"), (4, 4));
    }

    #[test]
    fn test_render_without_height_keeps_aspect_ratio() {
        let storage = InMemoryStorage::new();
        storage.add_file("uploads/photo.png", &png_bytes(16, 8));
        let spec = VersionSpec {
            width: 8,
            height: None,
            crop: false,
        };

        ImageRenderer
            .render(&storage, "uploads/photo.png", &spec, "uploads/photo_small.png", false)
            .unwrap();

        assert_eq!(dimensions_of(&storage, "uploads/photo_small.png"), (8, 4));
    }

    #[test]
    fn test_render_skips_existing_target_unless_forced() {
        let storage = InMemoryStorage::new();
        storage.add_file("uploads/photo.png", &png_bytes(16, 8));
        storage.add_file("uploads/photo_thumb.png", b"sentinel");
        let spec = VersionSpec {
            width: 4,
            height: Some(4),
            crop: true,
        };

        ImageRenderer
            .render(&storage, "uploads/photo.png", &spec, "uploads/photo_thumb.png", false)
            .unwrap();
        assert_eq!(storage.size("uploads/photo_thumb.png").unwrap(), 8); // untouched

        ImageRenderer
            .render(&storage, "uploads/photo.png", &spec, "uploads/photo_thumb.png", true)
            .unwrap();
        assert_eq!(dimensions_of(&storage, "uploads/photo_thumb.png"), (4, 4));
    }

    #[test]
    fn test_render_corrupt_source_is_an_error() {
        let storage = InMemoryStorage::new();
        storage.add_file("uploads/broken.png", b"not a png");
        let spec = VersionSpec {
            width: 4,
            height: Some(4),
            crop: true,
        };

        let result = ImageRenderer.render(&storage, "uploads/broken.png", &spec, "uploads/broken_thumb.png", false);
        assert!(result.is_err());
        assert!(!storage.exists("uploads/broken_thumb.png"));
    }
}
