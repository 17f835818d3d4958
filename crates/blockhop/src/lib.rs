//! A 2D platformer with a built-in level editor.
//!
//! Levels are edited as plain data ([`Level`]): every platform, piece of art
//! and the spawn point is a transform of the unit square. Pressing `P` in
//! the [`Editor`] bakes the level into a fresh physics [`Game`]; `E` returns
//! to the same editor. A host embeds the whole program through [`Runner`],
//! supplying a [`Renderer`](blockhop_engine::Renderer), input events and
//! frame times.

pub mod app;
pub mod bake;
pub mod config;
pub mod editor;
pub mod error;
pub mod level;
pub mod play;
pub mod runner;
pub mod selector;
pub mod shaders;
pub mod typer;

pub use app::{App, Mode, QUIT_CODE};
pub use bake::BakeReport;
pub use config::Config;
pub use editor::{Editor, EditorAction, Tool};
pub use error::{AppError, CommandError, ConfigSource, LevelError};
pub use level::{Art, ArtRef, AudioRef, Block, Level, Point, Trigger};
pub use play::Game;
pub use runner::Runner;
pub use selector::{LevelSelection, LevelSelector, ObjectRef, Selectable, Selectables, Selector};
pub use shaders::Shaders;
pub use typer::{Typer, TyperEvent};
