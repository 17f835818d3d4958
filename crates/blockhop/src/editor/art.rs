//! Commands accepted by the art tool's text field.
//!
//! A bare path adds a piece of art at the camera center. Keywords set or
//! clear the level's other optional resources:
//!
//! ```text
//! resources/grass.png
//! background resources/sky.png
//! player resources/hero.png
//! music resources/theme.wav 0.5
//! trigger land resources/thud.wav
//! clear background | player | music | trigger <name>
//! ```

use blockhop_engine::{Assets, Camera2D, Mx};
use glam::DVec2;

use crate::error::{CommandError, LevelError};
use crate::level::{load_audio, load_image, Art, ArtRef, AudioRef, Level, Trigger};

/// Image pixels per world unit for newly added art.
pub const ART_PIXELS_PER_UNIT: f64 = 32.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ArtCommand {
    Add(String),
    Background(String),
    Player(String),
    Music { path: String, volume: Option<f32> },
    Trigger { name: String, path: String, volume: Option<f32> },
    Clear(ClearTarget),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClearTarget {
    Background,
    Player,
    Music,
    Trigger(String),
}

impl ArtCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["background", path] => Ok(ArtCommand::Background(path.to_string())),
            ["background", ..] => Err(CommandError::Usage("background <path>")),
            ["player", path] => Ok(ArtCommand::Player(path.to_string())),
            ["player", ..] => Err(CommandError::Usage("player <path>")),
            ["music", path] => Ok(ArtCommand::Music {
                path: path.to_string(),
                volume: None,
            }),
            ["music", path, volume] => Ok(ArtCommand::Music {
                path: path.to_string(),
                volume: Some(parse_volume(volume)?),
            }),
            ["music", ..] => Err(CommandError::Usage("music <path> [volume]")),
            ["trigger", name, path] => Ok(ArtCommand::Trigger {
                name: name.to_string(),
                path: path.to_string(),
                volume: None,
            }),
            ["trigger", name, path, volume] => Ok(ArtCommand::Trigger {
                name: name.to_string(),
                path: path.to_string(),
                volume: Some(parse_volume(volume)?),
            }),
            ["trigger", ..] => Err(CommandError::Usage("trigger <name> <path> [volume]")),
            ["clear", "background"] => Ok(ArtCommand::Clear(ClearTarget::Background)),
            ["clear", "player"] => Ok(ArtCommand::Clear(ClearTarget::Player)),
            ["clear", "music"] => Ok(ArtCommand::Clear(ClearTarget::Music)),
            ["clear", "trigger", name] => Ok(ArtCommand::Clear(ClearTarget::Trigger(name.to_string()))),
            ["clear", ..] => Err(CommandError::Usage("clear background|player|music|trigger <name>")),
            [] => Err(CommandError::Usage("<path>")),
            _ => Ok(ArtCommand::Add(line.to_string())),
        }
    }

    /// Load whatever the command names and update `level`. On error the
    /// level is left as it was. Returns a status line.
    pub fn apply(&self, level: &mut Level, camera: &Camera2D, assets: &mut Assets) -> Result<String, LevelError> {
        match self {
            ArtCommand::Add(path) => {
                let image = load_image(assets, path)?;
                let size = DVec2::new(image.width as f64, image.height as f64) / ART_PIXELS_PER_UNIT;
                level.art.push(Art {
                    transform: Mx::from_rect(camera.center, size),
                    path: path.clone(),
                    image: Some(image),
                });
                Ok(format!("Added {}", path))
            }
            ArtCommand::Background(path) => {
                level.background = Some(art_ref(assets, path)?);
                Ok(format!("Background set to {}", path))
            }
            ArtCommand::Player(path) => {
                level.player = Some(art_ref(assets, path)?);
                Ok(format!("Player art set to {}", path))
            }
            ArtCommand::Music { path, volume } => {
                level.background_audio = Some(audio_ref(assets, path, *volume)?);
                Ok(format!("Music set to {}", path))
            }
            ArtCommand::Trigger { name, path, volume } => {
                let audio = audio_ref(assets, path, *volume)?;
                level.triggers.insert(name.clone(), Trigger { audio: Some(audio) });
                Ok(format!("Trigger {} plays {}", name, path))
            }
            ArtCommand::Clear(target) => Ok(clear(level, target)),
        }
    }
}

/// Parse and apply one typed line, reporting the outcome as a status line.
pub fn run(line: &str, level: &mut Level, camera: &Camera2D, assets: &mut Assets) -> String {
    let command = match ArtCommand::parse(line) {
        Ok(command) => command,
        Err(err) => return err.to_string(),
    };
    match command.apply(level, camera, assets) {
        Ok(status) => status,
        Err(err) => {
            log::warn!("{}", err);
            format!("Failed: {}", err)
        }
    }
}

fn clear(level: &mut Level, target: &ClearTarget) -> String {
    match target {
        ClearTarget::Background => {
            level.background = None;
            "Background cleared".to_string()
        }
        ClearTarget::Player => {
            level.player = None;
            "Player art cleared".to_string()
        }
        ClearTarget::Music => {
            level.background_audio = None;
            "Music cleared".to_string()
        }
        ClearTarget::Trigger(name) => match level.triggers.remove(name) {
            Some(_) => format!("Trigger {} cleared", name),
            None => format!("No trigger named {}", name),
        },
    }
}

fn parse_volume(word: &str) -> Result<f32, CommandError> {
    match word.parse::<f32>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Ok(v),
        _ => Err(CommandError::Volume(word.to_string())),
    }
}

fn art_ref(assets: &mut Assets, path: &str) -> Result<ArtRef, LevelError> {
    let image = load_image(assets, path)?;
    Ok(ArtRef {
        path: path.to_string(),
        image: Some(image),
    })
}

fn audio_ref(assets: &mut Assets, path: &str, volume: Option<f32>) -> Result<AudioRef, LevelError> {
    let clip = load_audio(assets, path)?;
    Ok(AudioRef {
        path: path.to_string(),
        volume,
        clip: Some(clip),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &std::path::Path, name: &str, w: u32, h: u32) {
        image::RgbaImage::new(w, h).save(dir.join(name)).unwrap();
    }

    #[test]
    fn parses_keywords_and_bare_paths() {
        assert_eq!(
            ArtCommand::parse("resources/grass.png").unwrap(),
            ArtCommand::Add("resources/grass.png".into())
        );
        assert_eq!(
            ArtCommand::parse("music theme.wav 0.25").unwrap(),
            ArtCommand::Music {
                path: "theme.wav".into(),
                volume: Some(0.25)
            }
        );
        assert_eq!(
            ArtCommand::parse("trigger land thud.wav").unwrap(),
            ArtCommand::Trigger {
                name: "land".into(),
                path: "thud.wav".into(),
                volume: None
            }
        );
        assert_eq!(
            ArtCommand::parse("clear trigger land").unwrap(),
            ArtCommand::Clear(ClearTarget::Trigger("land".into()))
        );
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(matches!(ArtCommand::parse("background"), Err(CommandError::Usage(_))));
        assert!(matches!(ArtCommand::parse("clear everything"), Err(CommandError::Usage(_))));
        assert_eq!(
            ArtCommand::parse("music a.wav loud"),
            Err(CommandError::Volume("loud".into()))
        );
        assert_eq!(
            ArtCommand::parse("music a.wav 1.5"),
            Err(CommandError::Volume("1.5".into()))
        );
    }

    #[test]
    fn add_places_art_at_camera_center() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "grass.png", 64, 32);
        let mut assets = Assets::silent(dir.path());
        let mut camera = Camera2D::new(720.0, 480.0, 8.0);
        camera.center = DVec2::new(3.0, -1.0);
        let mut level = Level::default();

        let status = run("grass.png", &mut level, &camera, &mut assets);
        assert_eq!(status, "Added grass.png");
        assert_eq!(level.art.len(), 1);
        let g = level.art[0].transform.geometry();
        assert!((g.center - camera.center).length() < 1e-9);
        assert!((g.half_width - 1.0).abs() < 1e-9);
        assert!((g.half_height - 0.5).abs() < 1e-9);
        assert!(level.art[0].image.is_some());
    }

    #[test]
    fn failed_load_reports_and_leaves_level() {
        let dir = tempfile::tempdir().unwrap();
        let mut assets = Assets::silent(dir.path());
        let camera = Camera2D::new(720.0, 480.0, 8.0);
        let mut level = Level::starter();

        let status = run("missing.png", &mut level, &camera, &mut assets);
        assert!(status.starts_with("Failed"));
        assert!(status.contains("missing.png"));
        assert!(level.art.is_empty());

        let status = run("music missing.wav", &mut level, &camera, &mut assets);
        assert!(status.starts_with("Failed"));
        assert!(level.background_audio.is_none());
    }

    #[test]
    fn sets_and_clears_optional_resources() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "sky.png", 4, 4);
        std::fs::write(dir.path().join("thud.wav"), b"RIFF").unwrap();
        let mut assets = Assets::silent(dir.path());
        let camera = Camera2D::new(720.0, 480.0, 8.0);
        let mut level = Level::default();

        run("background sky.png", &mut level, &camera, &mut assets);
        run("player sky.png", &mut level, &camera, &mut assets);
        run("music thud.wav 0.5", &mut level, &camera, &mut assets);
        run("trigger land thud.wav", &mut level, &camera, &mut assets);
        assert!(level.background.as_ref().is_some_and(|b| b.image.is_some()));
        assert!(level.player.is_some());
        assert_eq!(level.background_audio.as_ref().and_then(|a| a.volume), Some(0.5));
        assert!(level.triggers["land"].audio.as_ref().is_some_and(|a| a.clip.is_some()));

        assert_eq!(run("clear trigger jump", &mut level, &camera, &mut assets), "No trigger named jump");
        run("clear trigger land", &mut level, &camera, &mut assets);
        run("clear music", &mut level, &camera, &mut assets);
        run("clear background", &mut level, &camera, &mut assets);
        run("clear player", &mut level, &camera, &mut assets);
        assert!(level.triggers.is_empty());
        assert!(level.background_audio.is_none());
        assert!(level.background.is_none());
        assert!(level.player.is_none());
    }
}
