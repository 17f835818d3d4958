//! One-line text entry for editor commands.

use blockhop_engine::{Camera2D, Color, FrameInput, Renderer, TextEdit};
use glam::DVec2;

/// What a [`Typer`] did with a frame of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TyperEvent {
    /// Not typing and nothing opened the field.
    Idle,
    /// The field is open; the frame was consumed.
    Typing,
    /// Enter closed the field with this non-empty, trimmed line.
    Submitted(String),
    /// Enter closed the field with nothing in it.
    Closed,
}

impl TyperEvent {
    /// Whether the keyboard belonged to the field this frame. When true the
    /// caller must not treat any key as a shortcut.
    pub fn consumed(&self) -> bool {
        !matches!(self, TyperEvent::Idle)
    }
}

/// Enter opens the field, typed characters append, Backspace deletes the
/// last one, and Enter again submits.
#[derive(Debug, Clone, Default)]
pub struct Typer {
    typing: bool,
    buffer: String,
}

impl Typer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Apply the frame's edits in the order they were typed. Anything after
    /// the Enter that closes the field is left for the next frame's owner.
    pub fn update(&mut self, input: &FrameInput) -> TyperEvent {
        let was_typing = self.typing;
        for edit in input.edits() {
            match *edit {
                TextEdit::Enter if !self.typing => {
                    self.typing = true;
                    self.buffer.clear();
                }
                TextEdit::Enter => return self.close(),
                _ if !self.typing => {}
                TextEdit::Backspace => {
                    self.buffer.pop();
                }
                TextEdit::Insert(ch) => self.buffer.push(ch),
            }
        }
        if self.typing || was_typing {
            TyperEvent::Typing
        } else {
            TyperEvent::Idle
        }
    }

    fn close(&mut self) -> TyperEvent {
        self.typing = false;
        let line = std::mem::take(&mut self.buffer);
        match line.trim() {
            "" => TyperEvent::Closed,
            line => TyperEvent::Submitted(line.to_string()),
        }
    }

    /// Draw the prompt and the text typed so far.
    pub fn draw(&self, prompt: &str, camera: &Camera2D, renderer: &mut dyn Renderer) {
        let at = DVec2::new(10.0, camera.screen_height - 60.0);
        if self.typing {
            renderer.draw_text(at, &format!("{}: {}_", prompt, self.buffer), Color::YELLOW);
        } else {
            renderer.draw_text(at, &format!("{} (enter to type)", prompt), Color::WHITE);
        }
    }
}
