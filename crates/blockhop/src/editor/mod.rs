//! The level editor: a shared level and camera plus one active tool.
//!
//! Every frame the editor polls the autosave interval, lets the active tool
//! handle input, then applies the shared bindings: scroll to zoom,
//! right-drag to pan, Cmd/Ctrl+S and Cmd/Ctrl+L for quick save and load,
//! `P` to play, `R` to reset, and the tool keys in [`TOOLS`]. While a tool's
//! text field is open it owns the keyboard and none of the shared bindings
//! run.

pub mod art;
pub mod file;
pub mod platform;

use std::path::{Path, PathBuf};

use blockhop_engine::{Assets, Camera2D, Color, FrameInput, Interval, Key, MouseButton, Mx, Renderer, Uniforms};
use glam::DVec2;

use crate::config::Config;
use crate::error::LevelError;
use crate::level::Level;
use crate::selector::{draw_selection, level_transform, LevelSelection, LevelSelector};
use crate::shaders::Shaders;
use crate::typer::{Typer, TyperEvent};

use self::file::{FileMode, FileTool};
use self::platform::PlatformTool;

/// Half-length of the spawn marker's arms, in screen pixels.
const SPAWN_MARK_PX: f64 = 10.0;
const LINE_HEIGHT: f64 = 16.0;

/// What the editor asks of its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Play,
}

/// The active editing tool.
#[derive(Debug)]
pub enum Tool {
    Idle,
    Platform(PlatformTool),
    Spawn,
    Art(Typer),
    Select(LevelSelector),
    File(FileTool),
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Idle => "Editor",
            Tool::Platform(_) => "Platform Editor",
            Tool::Spawn => "Spawn Editor",
            Tool::Art(_) => "Art Editor",
            Tool::Select(_) => "Transform Editor",
            Tool::File(tool) => match tool.mode {
                FileMode::Save => "Save",
                FileMode::Load => "Open",
            },
        }
    }
}

/// One row of the tool key table.
pub struct ToolBinding {
    pub key: char,
    pub name: &'static str,
    pub activate: fn() -> Tool,
}

fn platforms() -> Tool {
    Tool::Platform(PlatformTool::new())
}

fn spawn() -> Tool {
    Tool::Spawn
}

fn art() -> Tool {
    Tool::Art(Typer::new())
}

fn transform() -> Tool {
    Tool::Select(LevelSelector::new())
}

fn save_as() -> Tool {
    Tool::File(FileTool::new(FileMode::Save))
}

fn open() -> Tool {
    Tool::File(FileTool::new(FileMode::Load))
}

/// Tool keys, checked in order; the first one pressed this frame wins.
pub const TOOLS: [ToolBinding; 6] = [
    ToolBinding { key: 'l', name: "Platforms", activate: platforms },
    ToolBinding { key: 'w', name: "Spawn", activate: spawn },
    ToolBinding { key: 'a', name: "Art", activate: art },
    ToolBinding { key: 't', name: "Transform", activate: transform },
    ToolBinding { key: 'f', name: "Save as", activate: save_as },
    ToolBinding { key: 'o', name: "Open", activate: open },
];

pub struct Editor {
    pub level: Level,
    pub camera: Camera2D,
    tool: Tool,
    status: String,
    autosave: Interval,
    autosave_path: PathBuf,
    quick_save_path: PathBuf,
    dt: f64,
}

impl Editor {
    pub fn new(level: Level, config: &Config) -> Self {
        Self {
            level,
            camera: Camera2D::new(config.screen_width, config.screen_height, config.camera_half_height),
            tool: Tool::Idle,
            status: String::new(),
            autosave: Interval::new(config.autosave_interval),
            autosave_path: config.autosave_path.clone(),
            quick_save_path: config.quick_save_path.clone(),
            dt: config.fixed_dt,
        }
    }

    /// Resume from the autosave, or start from the starter level if it
    /// cannot be loaded.
    pub fn open(config: &Config, assets: &mut Assets) -> Self {
        let level = match Level::load(&config.autosave_path, assets) {
            Ok(level) => level,
            Err(err) => {
                log::info!("Starting a new level ({})", err);
                Level::starter()
            }
        };
        Self::new(level, config)
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Last result shown on the status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn layout(&mut self, width: f64, height: f64) {
        self.camera.layout(width, height);
    }

    pub fn autosave(&self) -> Result<(), LevelError> {
        self.level.save(&self.autosave_path)
    }

    /// One fixed tick of editing.
    pub fn update(&mut self, input: &FrameInput, assets: &mut Assets) -> EditorAction {
        if self.autosave.tick(self.dt) {
            if let Err(err) = self.autosave() {
                log::warn!("Autosave failed: {}", err);
            }
        }

        if self.update_tool(input, assets) {
            return EditorAction::None;
        }

        self.camera.zoom(input.scroll);
        self.camera.pan(input.drag(MouseButton::Right));

        if input.command(Key::char('s')) {
            self.quick(FileMode::Save, assets);
            return EditorAction::None;
        }
        if input.command(Key::char('l')) {
            self.quick(FileMode::Load, assets);
            return EditorAction::None;
        }
        if input.command_held() {
            return EditorAction::None;
        }

        if input.pressed(Key::char('p')) {
            return EditorAction::Play;
        }
        if let Some(binding) = TOOLS.iter().find(|b| input.pressed(Key::char(b.key))) {
            self.tool = (binding.activate)();
            self.status.clear();
            log::debug!("Switched to {}", binding.name);
            return EditorAction::None;
        }
        if input.pressed(Key::char('r')) {
            self.level = Level::default();
            self.forget_selection();
            self.status = "Level reset".to_string();
        }
        EditorAction::None
    }

    fn quick(&mut self, mode: FileMode, assets: &mut Assets) {
        let path = self.quick_save_path.clone();
        self.status = file::run(mode, &path, &mut self.level, assets);
        if mode == FileMode::Load {
            self.forget_selection();
        }
    }

    /// Selections are indices into the level, so they die with it.
    fn forget_selection(&mut self) {
        if let Tool::Select(selector) = &mut self.tool {
            selector.clear();
        }
    }

    /// Returns true when a text field consumed the frame.
    fn update_tool(&mut self, input: &FrameInput, assets: &mut Assets) -> bool {
        match &mut self.tool {
            Tool::Idle => false,
            Tool::Platform(tool) => {
                tool.update(&mut self.level, &self.camera, input);
                false
            }
            Tool::Spawn => {
                if input.button_down(MouseButton::Left) {
                    self.level.spawn = self.camera.screen_to_world(input.cursor).into();
                }
                false
            }
            Tool::Art(typer) => {
                let event = typer.update(input);
                if let TyperEvent::Submitted(line) = &event {
                    self.status = art::run(line, &mut self.level, &self.camera, assets);
                }
                event.consumed()
            }
            Tool::Select(selector) => {
                let mut items = LevelSelection::new(&mut self.level, &self.camera);
                selector.update(&mut items, &self.camera, input);
                false
            }
            Tool::File(tool) => {
                let event = tool.typer.update(input);
                if let TyperEvent::Submitted(line) = &event {
                    self.status = file::run(tool.mode, Path::new(line), &mut self.level, assets);
                }
                event.consumed()
            }
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, shaders: &Shaders) {
        let camera = &self.camera;
        let screen = DVec2::new(camera.screen_width, camera.screen_height);
        let uniforms = Uniforms {
            screen_pixels: screen,
            velocity: DVec2::ZERO,
        };

        if let Some(image) = self.level.background.as_ref().and_then(|b| b.image) {
            let backdrop = Mx::from_rect(screen / 2.0, screen);
            renderer.draw_textured_quad(&backdrop, Some(&image), shaders.main, &uniforms);
        }
        for block in &self.level.blocks {
            renderer.draw_textured_quad(&camera.quad_to_screen(&block.transform), None, shaders.main, &uniforms);
        }
        for art in &self.level.art {
            renderer.draw_textured_quad(
                &camera.quad_to_screen(&art.transform),
                art.image.as_ref(),
                shaders.main,
                &uniforms,
            );
        }

        let s = camera.world_to_screen(self.level.spawn.into());
        let d = SPAWN_MARK_PX;
        renderer.draw_line(s + DVec2::new(-d, -d), s + DVec2::new(d, d), Color::WHITE);
        renderer.draw_line(s + DVec2::new(-d, d), s + DVec2::new(d, -d), Color::WHITE);

        let mut help = vec!["(P) Play".to_string(), String::new(), "Editors:".to_string()];
        help.extend(TOOLS.iter().map(|b| format!("({}) {}", b.key.to_ascii_uppercase(), b.name)));
        help.push("(R) Reset".to_string());
        for (i, line) in help.iter().enumerate() {
            renderer.draw_text(DVec2::new(10.0, 5.0 + i as f64 * LINE_HEIGHT), line, Color::WHITE);
        }

        match &self.tool {
            Tool::Platform(tool) => {
                if let Some(t) = tool.creating() {
                    renderer.draw_textured_quad(&camera.quad_to_screen(t), None, shaders.outline, &uniforms);
                }
            }
            Tool::Select(selector) => {
                if let Some(t) = selector
                    .selected()
                    .and_then(|key| level_transform(&self.level, camera, key))
                {
                    draw_selection(&t, camera, renderer);
                }
            }
            Tool::Art(typer) => typer.draw("Image path or command", camera, renderer),
            Tool::File(tool) => tool.typer.draw(tool.prompt(), camera, renderer),
            Tool::Idle | Tool::Spawn => {}
        }

        renderer.draw_text(DVec2::new(10.0, screen.y - 40.0), self.tool.name(), Color::WHITE);
        renderer.draw_text(DVec2::new(10.0, screen.y - 20.0), &self.status, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockhop_engine::{DrawList, InputEvent, InputState};
    use crate::selector::ObjectRef;
    use tempfile::TempDir;

    struct Session {
        dir: TempDir,
        editor: Editor,
        assets: Assets,
        input: InputState,
    }

    impl Session {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = Config {
                autosave_path: dir.path().join("autosave.lvl"),
                quick_save_path: dir.path().join("created.lvl"),
                asset_root: dir.path().to_path_buf(),
                ..Config::default()
            };
            let mut assets = Assets::silent(dir.path());
            let editor = Editor::open(&config, &mut assets);
            Self {
                dir,
                editor,
                assets,
                input: InputState::new(),
            }
        }

        fn frame(&mut self) -> EditorAction {
            let frame = self.input.snapshot();
            self.editor.update(&frame, &mut self.assets)
        }

        fn tap(&mut self, key: Key) -> EditorAction {
            self.input.handle(&InputEvent::KeyDown { key });
            let action = self.frame();
            self.input.handle(&InputEvent::KeyUp { key });
            action
        }

        fn type_text(&mut self, text: &str) -> Vec<EditorAction> {
            text.chars()
                .map(|ch| {
                    self.input.handle(&InputEvent::KeyDown { key: Key::char(ch) });
                    self.input.handle(&InputEvent::Text { ch });
                    let action = self.frame();
                    self.input.handle(&InputEvent::KeyUp { key: Key::char(ch) });
                    action
                })
                .collect()
        }
    }

    #[test]
    fn starts_from_starter_without_autosave() {
        let session = Session::new();
        assert_eq!(session.editor.level.blocks.len(), 1);
        assert!(matches!(session.editor.tool(), Tool::Idle));
    }

    #[test]
    fn tool_keys_switch_tools() {
        let mut s = Session::new();
        s.tap(Key::char('l'));
        assert!(matches!(s.editor.tool(), Tool::Platform(_)));
        s.tap(Key::char('t'));
        assert!(matches!(s.editor.tool(), Tool::Select(_)));
        s.tap(Key::char('o'));
        assert_eq!(s.editor.tool().name(), "Open");
        s.tap(Key::char('w'));
        assert!(matches!(s.editor.tool(), Tool::Spawn));
    }

    #[test]
    fn p_requests_play() {
        let mut s = Session::new();
        assert_eq!(s.tap(Key::char('p')), EditorAction::Play);
        assert_eq!(s.frame(), EditorAction::None);
    }

    #[test]
    fn typing_suppresses_shortcuts() {
        let mut s = Session::new();
        s.tap(Key::char('a'));
        s.tap(Key::Enter);
        let actions = s.type_text("lwtprfo");
        assert!(actions.iter().all(|a| *a == EditorAction::None));
        assert!(matches!(s.editor.tool(), Tool::Art(t) if t.buffer() == "lwtprfo"));
        assert_eq!(s.editor.level.blocks.len(), 1);

        s.tap(Key::Enter);
        assert!(s.editor.status().starts_with("Failed"));
        assert!(s.editor.level.art.is_empty());
    }

    #[test]
    fn command_modifier_disables_tool_keys() {
        let mut s = Session::new();
        s.input.handle(&InputEvent::KeyDown { key: Key::Control });
        s.tap(Key::char('l'));
        assert!(matches!(s.editor.tool(), Tool::Idle));
        assert!(s.editor.status().starts_with("Load failed"));
        s.tap(Key::char('p'));
        assert!(matches!(s.editor.tool(), Tool::Idle));
    }

    #[test]
    fn quick_save_and_load() {
        let mut s = Session::new();
        s.input.handle(&InputEvent::KeyDown { key: Key::Meta });
        s.tap(Key::char('s'));
        assert!(s.editor.status().starts_with("Saved"));
        s.input.handle(&InputEvent::KeyUp { key: Key::Meta });

        s.tap(Key::char('r'));
        assert!(s.editor.level.blocks.is_empty());

        s.input.handle(&InputEvent::KeyDown { key: Key::Meta });
        s.tap(Key::char('l'));
        assert!(s.editor.status().starts_with("Loaded"));
        assert_eq!(s.editor.level.blocks.len(), 1);
    }

    #[test]
    fn loading_a_level_drops_the_selection() {
        let mut s = Session::new();
        s.input.handle(&InputEvent::KeyDown { key: Key::Control });
        s.tap(Key::char('s'));
        s.input.handle(&InputEvent::KeyUp { key: Key::Control });

        s.tap(Key::char('t'));
        let ground = s.editor.camera.world_to_screen(DVec2::new(5.0, 0.0));
        s.input.handle(&InputEvent::PointerMove { x: ground.x, y: ground.y });
        s.input.handle(&InputEvent::PointerDown { button: MouseButton::Left });
        s.frame();
        s.input.handle(&InputEvent::PointerUp { button: MouseButton::Left });
        s.frame();
        let selected = |s: &Session| match s.editor.tool() {
            Tool::Select(selector) => selector.selected(),
            _ => None,
        };
        assert_eq!(selected(&s), Some(ObjectRef::Block(0)));

        s.input.handle(&InputEvent::KeyDown { key: Key::Control });
        s.tap(Key::char('l'));
        s.input.handle(&InputEvent::KeyUp { key: Key::Control });
        assert!(s.editor.status().starts_with("Loaded"));
        assert_eq!(s.editor.level.blocks.len(), 1);
        assert_eq!(selected(&s), None);

        // Deleting now must not touch the freshly loaded ground.
        s.tap(Key::Backspace);
        assert_eq!(s.editor.level.blocks.len(), 1);
    }

    #[test]
    fn reset_drops_the_selection() {
        let mut s = Session::new();
        s.tap(Key::char('t'));
        let ground = s.editor.camera.world_to_screen(DVec2::new(-5.0, 0.0));
        s.input.handle(&InputEvent::PointerMove { x: ground.x, y: ground.y });
        s.input.handle(&InputEvent::PointerDown { button: MouseButton::Left });
        s.frame();
        s.input.handle(&InputEvent::PointerUp { button: MouseButton::Left });
        s.frame();
        s.tap(Key::char('r'));
        assert!(matches!(s.editor.tool(), Tool::Select(sel) if sel.selected().is_none()));
    }

    #[test]
    fn autosave_after_interval() {
        let mut s = Session::new();
        let path = s.dir.path().join("autosave.lvl");
        s.editor.autosave = Interval::new(0.05);
        s.frame();
        assert!(!path.exists());
        s.frame();
        s.frame();
        s.frame();
        assert!(path.exists());
    }

    #[test]
    fn spawn_tool_follows_cursor() {
        let mut s = Session::new();
        s.tap(Key::char('w'));
        let target = s.editor.camera.world_to_screen(DVec2::new(3.0, 2.0));
        s.input.handle(&InputEvent::PointerMove { x: target.x, y: target.y });
        s.input.handle(&InputEvent::PointerDown { button: MouseButton::Left });
        s.frame();
        let spawn: DVec2 = s.editor.level.spawn.into();
        assert!((spawn - DVec2::new(3.0, 2.0)).length() < 1e-9);
    }

    #[test]
    fn scroll_zooms_and_right_drag_pans() {
        let mut s = Session::new();
        let hh = s.editor.camera.half_height;
        s.input.handle(&InputEvent::Scroll { dy: 2.0 });
        s.frame();
        assert!((s.editor.camera.half_height - hh * 0.98 * 0.98).abs() < 1e-9);

        s.input.handle(&InputEvent::PointerDown { button: MouseButton::Right });
        s.frame();
        let before = s.editor.camera.center;
        s.input.handle(&InputEvent::PointerMove { x: 30.0, y: 0.0 });
        s.frame();
        assert!(s.editor.camera.center.x < before.x);
    }

    #[test]
    fn draw_marks_spawn_and_status() {
        let mut s = Session::new();
        s.tap(Key::char('r'));
        let mut list = DrawList::new();
        let shaders = Shaders::load(&mut list).unwrap();
        s.editor.draw(&mut list, &shaders);
        assert!(list.texts().any(|t| t == "Level reset"));
        assert!(list.texts().any(|t| t == "(L) Platforms"));
        assert_eq!(list.quads().count(), 0);
    }
}
