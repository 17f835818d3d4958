pub mod audio;
pub mod images;

use std::path::PathBuf;

use thiserror::Error;

pub use audio::{AudioBackend, ClipId, SilentAudio};
#[cfg(feature = "audio")]
pub use audio::RodioAudio;
pub use images::{ImageCache, ImageHandle};

/// Failure to load an external resource. Always names the file.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported image format: {} (expected .png)", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("cannot decode audio {}: {message}", path.display())]
    Audio { path: PathBuf, message: String },
}

/// Image and audio collaborators resolved against one asset root.
pub struct Assets {
    pub images: ImageCache,
    pub audio: Box<dyn AudioBackend>,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>, audio: Box<dyn AudioBackend>) -> Self {
        Self {
            images: ImageCache::new(root),
            audio,
        }
    }

    /// Assets with no output device; see [`SilentAudio`].
    pub fn silent(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Box::new(SilentAudio::new()))
    }

    pub fn load_image(&mut self, path: &str) -> Result<ImageHandle, AssetError> {
        self.images.load(path)
    }

    pub fn load_audio(&mut self, path: &str) -> Result<ClipId, AssetError> {
        let full = self.images.resolve(path);
        self.audio.decode(&full)
    }

    pub fn play(&mut self, clip: ClipId, volume: f32) {
        self.audio.play(clip, volume);
    }
}
