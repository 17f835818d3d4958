use blockhop_engine::{Assets, FrameInput, Key, Renderer};

use crate::bake;
use crate::config::Config;
use crate::editor::{Editor, EditorAction};
use crate::error::AppError;
use crate::play::Game;
use crate::shaders::Shaders;

/// Exit code reported when the user quits with Escape.
pub const QUIT_CODE: i32 = 1;

/// What the program is doing right now.
///
/// Play mode keeps the editor it came from, so returning to edit mode
/// resumes the very same editor with its level, camera and tool.
pub enum Mode {
    Edit(Box<Editor>),
    Play { editor: Box<Editor>, game: Box<Game> },
    Quit { code: i32 },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Edit(_) => "edit",
            Mode::Play { .. } => "play",
            Mode::Quit { .. } => "quit",
        }
    }
}

/// Top of the program: the current mode plus everything shared across modes.
pub struct App {
    mode: Mode,
    assets: Assets,
    config: Config,
    shaders: Shaders,
}

impl App {
    /// Compile shaders and open the editor. Shader failures are fatal.
    pub fn new(config: Config, renderer: &mut dyn Renderer, mut assets: Assets) -> Result<Self, AppError> {
        let shaders = Shaders::load(renderer)?;
        let editor = Editor::open(&config, &mut assets);
        log::info!("Editor ready with {} blocks", editor.level.blocks.len());
        Ok(Self {
            mode: Mode::Edit(Box::new(editor)),
            assets,
            config,
            shaders,
        })
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// The active editor, also while playing.
    pub fn editor(&self) -> Option<&Editor> {
        match &self.mode {
            Mode::Edit(editor) | Mode::Play { editor, .. } => Some(editor.as_ref()),
            Mode::Quit { .. } => None,
        }
    }

    pub fn game(&self) -> Option<&Game> {
        match &self.mode {
            Mode::Play { game, .. } => Some(game.as_ref()),
            _ => None,
        }
    }

    /// Set once the program should terminate.
    pub fn exit_code(&self) -> Option<i32> {
        match self.mode {
            Mode::Quit { code } => Some(code),
            _ => None,
        }
    }

    pub fn layout(&mut self, width: f64, height: f64) {
        match &mut self.mode {
            Mode::Edit(editor) => editor.layout(width, height),
            Mode::Play { editor, game } => {
                editor.layout(width, height);
                game.layout(width, height);
            }
            Mode::Quit { .. } => {}
        }
    }

    /// One fixed tick.
    pub fn update(&mut self, input: &FrameInput) {
        let mode = std::mem::replace(&mut self.mode, Mode::Quit { code: 0 });
        self.mode = self.transition(mode, input);
    }

    fn transition(&mut self, mode: Mode, input: &FrameInput) -> Mode {
        if matches!(mode, Mode::Quit { .. }) {
            return mode;
        }
        if input.is_down(Key::Escape) || input.pressed(Key::Escape) {
            log::info!("Quit from {} mode", mode.name());
            return Mode::Quit { code: QUIT_CODE };
        }

        match mode {
            Mode::Edit(mut editor) => match editor.update(input, &mut self.assets) {
                EditorAction::Play => self.play(editor),
                EditorAction::None => Mode::Edit(editor),
            },
            Mode::Play { editor, mut game } => {
                if input.pressed(Key::char('e')) {
                    log::info!("Back to the editor");
                    return Mode::Edit(editor);
                }
                game.update(input, &mut self.assets);
                Mode::Play { editor, game }
            }
            quit @ Mode::Quit { .. } => quit,
        }
    }

    /// Bake the editor's level into a fresh game.
    fn play(&mut self, editor: Box<Editor>) -> Mode {
        if let Err(err) = editor.autosave() {
            log::warn!("Autosave failed: {}", err);
        }
        let mut game = Box::new(Game::new(&self.config));
        game.layout(editor.camera.screen_width, editor.camera.screen_height);
        let report = bake::apply(&editor.level, &mut game);
        game.start(&mut self.assets);
        log::info!(
            "Playing: {} blocks baked, {} skipped",
            report.baked,
            report.skipped
        );
        Mode::Play { editor, game }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        match &self.mode {
            Mode::Edit(editor) => editor.draw(renderer, &self.shaders),
            Mode::Play { game, .. } => game.draw(renderer, &self.shaders),
            Mode::Quit { .. } => {}
        }
    }
}
