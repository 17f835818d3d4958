use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::AssetError;

/// Handle to a decoded clip held by an [`AudioBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub u32);

/// The audio collaborator: decode once, play many times.
pub trait AudioBackend {
    /// Decode the file at `path` (already resolved). Decoding the same path
    /// twice may return the same clip.
    fn decode(&mut self, path: &Path) -> Result<ClipId, AssetError>;

    /// Start playing `clip` from the beginning at `volume` (0.0-1.0).
    fn play(&mut self, clip: ClipId, volume: f32);

    /// Every `play` call so far, oldest first. Backends that do not record
    /// return an empty slice.
    fn history(&self) -> &[(ClipId, f32)] {
        &[]
    }
}

/// Backend without an output device.
///
/// `decode` still checks that the file exists and is readable, so level
/// loading reports missing audio the same way with or without sound.
#[derive(Debug, Default)]
pub struct SilentAudio {
    clips: HashMap<PathBuf, ClipId>,
    played: Vec<(ClipId, f32)>,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for SilentAudio {
    fn decode(&mut self, path: &Path) -> Result<ClipId, AssetError> {
        if let Some(id) = self.clips.get(path) {
            return Ok(*id);
        }
        std::fs::metadata(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let id = ClipId(self.clips.len() as u32);
        self.clips.insert(path.to_path_buf(), id);
        Ok(id)
    }

    fn play(&mut self, clip: ClipId, volume: f32) {
        self.played.push((clip, volume));
    }

    fn history(&self) -> &[(ClipId, f32)] {
        &self.played
    }
}

#[cfg(feature = "audio")]
pub use device::RodioAudio;

#[cfg(feature = "audio")]
mod device {
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    use super::{AssetError, AudioBackend, ClipId};

    /// Plays through the default output device with `rodio`.
    ///
    /// Clips are kept as encoded bytes and decoded per play, so several
    /// copies of a sound can overlap.
    pub struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        clips: Vec<(PathBuf, Arc<[u8]>)>,
    }

    impl RodioAudio {
        /// Open the default output device.
        pub fn new() -> Result<Self, AssetError> {
            let (stream, handle) = OutputStream::try_default().map_err(|e| AssetError::Audio {
                path: PathBuf::new(),
                message: e.to_string(),
            })?;
            Ok(Self {
                _stream: stream,
                handle,
                clips: Vec::new(),
            })
        }
    }

    impl AudioBackend for RodioAudio {
        fn decode(&mut self, path: &Path) -> Result<ClipId, AssetError> {
            if let Some(i) = self.clips.iter().position(|(p, _)| p == path) {
                return Ok(ClipId(i as u32));
            }
            let bytes: Arc<[u8]> = std::fs::read(path)
                .map_err(|source| AssetError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
                .into();
            // Reject undecodable files now rather than at the first play.
            Decoder::new(Cursor::new(bytes.clone())).map_err(|e| AssetError::Audio {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            self.clips.push((path.to_path_buf(), bytes));
            Ok(ClipId(self.clips.len() as u32 - 1))
        }

        fn play(&mut self, clip: ClipId, volume: f32) {
            let Some((path, bytes)) = self.clips.get(clip.0 as usize) else {
                return;
            };
            let Ok(source) = Decoder::new(Cursor::new(bytes.clone())) else {
                log::warn!("Could not decode {}", path.display());
                return;
            };
            let Ok(sink) = Sink::try_new(&self.handle) else {
                log::warn!("No audio sink available");
                return;
            };
            sink.set_volume(volume);
            sink.append(source);
            sink.detach();
        }
    }
}
