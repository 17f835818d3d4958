use std::path::Path;

use blockhop_engine::Assets;

use crate::level::Level;
use crate::typer::Typer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Save,
    Load,
}

/// Save or load the level at a typed path.
#[derive(Debug, Clone)]
pub struct FileTool {
    pub mode: FileMode,
    pub typer: Typer,
}

impl FileTool {
    pub fn new(mode: FileMode) -> Self {
        Self {
            mode,
            typer: Typer::new(),
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self.mode {
            FileMode::Save => "Save level as",
            FileMode::Load => "Open level",
        }
    }
}

/// Save `level` to, or replace it from, `path`. A failed load keeps the
/// current level. Returns a status line.
pub fn run(mode: FileMode, path: &Path, level: &mut Level, assets: &mut Assets) -> String {
    match mode {
        FileMode::Save => match level.save(path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => {
                log::warn!("{}", err);
                format!("Save failed: {}", err)
            }
        },
        FileMode::Load => match Level::load(path, assets) {
            Ok(loaded) => {
                *level = loaded;
                format!("Loaded {}", path.display())
            }
            Err(err) => {
                log::warn!("{}", err);
                format!("Load failed: {}", err)
            }
        },
    }
}
