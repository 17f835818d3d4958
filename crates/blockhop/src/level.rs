//! The editable level description and its file format.
//!
//! Levels are stored as indented JSON. Geometry lives entirely in [`Mx`]
//! transforms that map the unit square centered at the origin onto the
//! object's world rectangle; there are no separate size or position fields.
//! Image and audio handles are runtime attachments filled in by
//! [`Level::resolve`] and never written to disk.

use std::collections::BTreeMap;
use std::path::Path;

use blockhop_engine::{AssetError, Assets, AudioBackend, ClipId, ImageHandle, Mx};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point { x: v.x, y: v.y }
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

/// One platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub transform: Mx,
}

impl Block {
    pub fn new(transform: Mx) -> Self {
        Self { transform }
    }
}

/// A decorative image placed in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Art {
    pub transform: Mx,
    pub path: String,
    #[serde(skip)]
    pub image: Option<ImageHandle>,
}

/// An image drawn without a level transform (background, player overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtRef {
    pub path: String,
    #[serde(skip)]
    pub image: Option<ImageHandle>,
}

impl ArtRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRef {
    pub path: String,
    /// 0.0-1.0; full volume when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    #[serde(skip)]
    pub clip: Option<ClipId>,
}

impl AudioRef {
    pub fn new(path: impl Into<String>, volume: Option<f32>) -> Self {
        Self {
            path: path.into(),
            volume,
            clip: None,
        }
    }

    /// Play once if the clip was resolved.
    pub fn play(&self, audio: &mut dyn AudioBackend) {
        if let Some(clip) = self.clip {
            audio.play(clip, self.volume.unwrap_or(1.0).clamp(0.0, 1.0));
        }
    }
}

/// Named game-event hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioRef>,
}

impl Trigger {
    pub fn activate(&self, audio: &mut dyn AudioBackend) {
        if let Some(sound) = &self.audio {
            sound.play(audio);
        }
    }
}

/// Everything needed to rebuild a scene from scratch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub spawn: Point,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub art: Vec<Art>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ArtRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_audio: Option<AudioRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<ArtRef>,
    #[serde(default)]
    pub triggers: BTreeMap<String, Trigger>,
}

impl Level {
    /// Level used when nothing can be loaded: a single wide ground platform.
    pub fn starter() -> Self {
        Level {
            blocks: vec![Block::new(Mx::from_rect(DVec2::ZERO, DVec2::new(100.0, 0.5)))],
            ..Level::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        serde_json::to_string_pretty(self).map_err(|source| LevelError::Encode { source })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| LevelError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Saved level to {}", path.display());
        Ok(())
    }

    /// Read, decode and resolve a level. The caller's current level is only
    /// replaced once this returns `Ok`, so a failed load never leaves a
    /// half-decoded level behind.
    pub fn load(path: impl AsRef<Path>, assets: &mut Assets) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut level = Self::from_json(&text).map_err(|source| LevelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        level.resolve(assets)?;
        log::info!(
            "Loaded level {} ({} blocks, {} art)",
            path.display(),
            level.blocks.len(),
            level.art.len()
        );
        Ok(level)
    }

    /// Load every referenced image and audio clip.
    pub fn resolve(&mut self, assets: &mut Assets) -> Result<(), LevelError> {
        for art in &mut self.art {
            art.image = Some(load_image(assets, &art.path)?);
        }
        for art in self.background.iter_mut().chain(self.player.iter_mut()) {
            art.image = Some(load_image(assets, &art.path)?);
        }
        let sounds = self
            .background_audio
            .iter_mut()
            .chain(self.triggers.values_mut().filter_map(|t| t.audio.as_mut()));
        for sound in sounds {
            sound.clip = Some(load_audio(assets, &sound.path)?);
        }
        Ok(())
    }
}

fn resource_error(path: &str) -> impl FnOnce(AssetError) -> LevelError + '_ {
    move |source| LevelError::Resource {
        path: path.to_string(),
        source,
    }
}

pub(crate) fn load_image(assets: &mut Assets, path: &str) -> Result<ImageHandle, LevelError> {
    assets.load_image(path).map_err(resource_error(path))
}

pub(crate) fn load_audio(assets: &mut Assets, path: &str) -> Result<ClipId, LevelError> {
    assets.load_audio(path).map_err(resource_error(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_to_none() {
        let level = Level::from_json(r#"{ "spawn": { "x": 1.5, "y": -2.0 } }"#).unwrap();
        assert_eq!(level.spawn, Point { x: 1.5, y: -2.0 });
        assert!(level.blocks.is_empty());
        assert!(level.art.is_empty());
        assert!(level.background.is_none());
        assert!(level.background_audio.is_none());
        assert!(level.player.is_none());
        assert!(level.triggers.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let level = Level::from_json(r#"{ "spawn": { "x": 0, "y": 0 }, "gravity": 3 }"#).unwrap();
        assert!(level.blocks.is_empty());
    }

    #[test]
    fn file_shape() {
        let mut level = Level::starter();
        level.art.push(Art {
            transform: Mx::IDENTITY,
            path: "grass.png".into(),
            image: None,
        });
        level.triggers.insert(
            "jump".into(),
            Trigger {
                audio: Some(AudioRef::new("jump.wav", Some(0.5))),
            },
        );
        let value: serde_json::Value = serde_json::from_str(&level.to_json().unwrap()).unwrap();
        assert_eq!(value["blocks"][0]["transform"].as_array().unwrap().len(), 6);
        assert_eq!(value["art"][0]["path"], "grass.png");
        assert!(value["art"][0].get("image").is_none());
        assert_eq!(value["triggers"]["jump"]["audio"]["volume"], 0.5);
        assert!(value.get("background").is_none());
    }

    #[test]
    fn json_is_indented() {
        let json = Level::starter().to_json().unwrap();
        assert!(json.contains("\n  "));
    }

    #[test]
    fn transforms_survive_a_round_trip_exactly() {
        let mut level = Level::default();
        let mut t = Mx::from_rect(DVec2::new(0.1, 1.0 / 3.0), DVec2::new(2.7, 0.3));
        t.rotate(0.123456789);
        level.blocks.push(Block::new(t));
        let back = Level::from_json(&level.to_json().unwrap()).unwrap();
        assert_eq!(back.blocks[0].transform.elements(), t.elements());
    }

    #[test]
    fn starter_has_ground() {
        let level = Level::starter();
        assert_eq!(level.blocks.len(), 1);
        let g = level.blocks[0].transform.geometry();
        assert!((g.half_width - 50.0).abs() < 1e-9);
        assert!((g.half_height - 0.25).abs() < 1e-9);
    }

    #[test]
    fn resolve_fills_audio_handles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("land.wav"), b"RIFF").unwrap();
        let mut assets = Assets::silent(dir.path());
        let mut level = Level::default();
        level.triggers.insert(
            "land".into(),
            Trigger {
                audio: Some(AudioRef::new("land.wav", None)),
            },
        );
        level.resolve(&mut assets).unwrap();
        let trigger = &level.triggers["land"];
        assert!(trigger.audio.as_ref().unwrap().clip.is_some());

        trigger.activate(assets.audio.as_mut());
        assert_eq!(assets.audio.history().len(), 1);
        assert_eq!(assets.audio.history()[0].1, 1.0);
    }

    #[test]
    fn resolve_reports_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let mut assets = Assets::silent(dir.path());
        let mut level = Level::default();
        level.background = Some(ArtRef::new("sky.png"));
        let err = level.resolve(&mut assets).unwrap_err();
        assert!(matches!(err, LevelError::Resource { ref path, .. } if path == "sky.png"));
    }
}
