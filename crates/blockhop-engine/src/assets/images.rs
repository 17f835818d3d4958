use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use super::AssetError;

/// Handle to a decoded image held by an [`ImageCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

/// Decoded images, cached per resolved path.
///
/// Relative paths are resolved against the asset root. Only PNG is accepted.
pub struct ImageCache {
    root: PathBuf,
    by_path: HashMap<PathBuf, ImageHandle>,
    pixels: Vec<RgbaImage>,
}

impl ImageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            by_path: HashMap::new(),
            pixels: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    /// Load and decode `path`, or return the cached handle.
    pub fn load(&mut self, path: &str) -> Result<ImageHandle, AssetError> {
        let full = self.resolve(path);
        if let Some(handle) = self.by_path.get(&full) {
            return Ok(*handle);
        }

        match ImageFormat::from_path(&full) {
            Ok(ImageFormat::Png) => {}
            _ => return Err(AssetError::UnsupportedFormat { path: full }),
        }

        let bytes = std::fs::read(&full).map_err(|source| AssetError::Io {
            path: full.clone(),
            source,
        })?;
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .map_err(|source| AssetError::Image {
                path: full.clone(),
                source,
            })?
            .to_rgba8();

        let handle = ImageHandle {
            id: self.pixels.len() as u32,
            width: decoded.width(),
            height: decoded.height(),
        };
        log::debug!("Loaded image {} ({}x{})", full.display(), handle.width, handle.height);
        self.pixels.push(decoded);
        self.by_path.insert(full, handle);
        Ok(handle)
    }

    /// Decoded RGBA pixels for a handle from this cache.
    pub fn pixels(&self, handle: &ImageHandle) -> Option<&RgbaImage> {
        self.pixels.get(handle.id as usize)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        let img = RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn loads_png_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "red.png", 3, 2);
        let mut cache = ImageCache::new(dir.path());
        let handle = cache.load("red.png").unwrap();
        assert_eq!((handle.width, handle.height), (3, 2));
        let pixels = cache.pixels(&handle).unwrap();
        assert_eq!(pixels.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn same_path_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 1, 1);
        let mut cache = ImageCache::new(dir.path());
        let first = cache.load("a.png").unwrap();
        let second = cache.load("a.png").unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ImageCache::new(dir.path());
        let err = cache.load("nope.png").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("nope.png"));
    }

    #[test]
    fn corrupt_png_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        let mut cache = ImageCache::new(dir.path());
        assert!(matches!(
            cache.load("bad.png"),
            Err(AssetError::Image { .. })
        ));
    }

    #[test]
    fn other_extensions_are_rejected() {
        let mut cache = ImageCache::new(".");
        assert!(matches!(
            cache.load("art.bmp"),
            Err(AssetError::UnsupportedFormat { .. })
        ));
        assert!(cache.is_empty());
    }
}
