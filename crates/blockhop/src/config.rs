use std::path::{Path, PathBuf};

use blockhop_engine::Assets;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ConfigSource};

/// Settings for the editor and play mode.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Written every `autosave_interval` seconds while editing and read at startup.
    pub autosave_path: PathBuf,
    /// Target of the quick save / quick load shortcuts.
    pub quick_save_path: PathBuf,
    /// Seconds between autosaves.
    pub autosave_interval: f64,
    /// Directory that image and audio paths in levels are relative to.
    pub asset_root: PathBuf,
    /// Initial screen size in pixels.
    pub screen_width: f64,
    pub screen_height: f64,
    /// Visible half-height of the editor camera; the half-width follows the aspect ratio.
    pub camera_half_height: f64,
    pub play_camera_half_width: f64,
    pub play_camera_half_height: f64,
    pub gravity: [f32; 2],
    /// Fixed timestep in seconds.
    pub fixed_dt: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autosave_path: PathBuf::from("autosave.lvl"),
            quick_save_path: PathBuf::from("created.lvl"),
            autosave_interval: 10.0,
            asset_root: PathBuf::from("."),
            screen_width: 720.0,
            screen_height: 480.0,
            camera_half_height: 8.0,
            play_camera_half_width: 12.0,
            play_camera_half_height: 8.0,
            gravity: [0.0, -10.0],
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let fail = |source: ConfigSource| AppError::Config {
            path: path.to_path_buf(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(|e| fail(e.into()))?;
        Self::from_json(&text).map_err(|e| fail(e.into()))
    }

    /// Assets rooted at `asset_root`. With the `audio` feature this plays
    /// through the default output device when one opens, else it runs silent.
    pub fn assets(&self) -> Assets {
        #[cfg(feature = "audio")]
        match blockhop_engine::RodioAudio::new() {
            Ok(audio) => return Assets::new(self.asset_root.clone(), Box::new(audio)),
            Err(err) => log::warn!("No audio output, running silent: {}", err),
        }
        Assets::silent(self.asset_root.clone())
    }
}
