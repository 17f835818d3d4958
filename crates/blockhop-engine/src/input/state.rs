use std::collections::HashSet;

use glam::DVec2;

use super::queue::{InputEvent, InputQueue, Key, MouseButton};

/// Live input state, fed by events as they arrive.
///
/// Once per fixed step the runner calls [`InputState::snapshot`], which
/// freezes everything into a [`FrameInput`]. Edge-triggered "pressed this
/// frame" sets are computed there by diffing against the previous snapshot,
/// so a held key reports `pressed` exactly once.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
    /// Keys that went down since the last snapshot, even if already released.
    keys_struck: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
    buttons_struck: HashSet<MouseButton>,
    cursor: DVec2,
    scroll: f64,
    text: String,
    edits: Vec<TextEdit>,
    // Previous snapshot, for edge detection and drag deltas.
    prev_keys: HashSet<Key>,
    prev_buttons: HashSet<MouseButton>,
    prev_cursor: DVec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { button } => {
                self.buttons_down.insert(button);
                self.buttons_struck.insert(button);
            }
            InputEvent::PointerUp { button } => {
                self.buttons_down.remove(&button);
            }
            InputEvent::PointerMove { x, y } => {
                self.cursor = DVec2::new(x, y);
            }
            InputEvent::Scroll { dy } => {
                self.scroll += dy;
            }
            InputEvent::KeyDown { key } => {
                let fresh = self.keys_down.insert(key);
                self.keys_struck.insert(key);
                match key {
                    Key::Enter if fresh => self.edits.push(TextEdit::Enter),
                    Key::Backspace if fresh => self.edits.push(TextEdit::Backspace),
                    _ => {}
                }
            }
            InputEvent::KeyUp { key } => {
                self.keys_down.remove(&key);
            }
            InputEvent::Text { ch } => {
                if !ch.is_control() {
                    self.text.push(ch);
                    self.edits.push(TextEdit::Insert(ch));
                }
            }
        }
    }

    /// Feed every pending event from the queue.
    pub fn consume(&mut self, queue: &mut InputQueue) {
        for event in queue.drain() {
            self.handle(&event);
        }
    }

    /// Freeze the current state into this frame's input and start a new frame.
    pub fn snapshot(&mut self) -> FrameInput {
        let keys_pressed = self
            .keys_down
            .union(&self.keys_struck)
            .filter(|k| !self.prev_keys.contains(k))
            .copied()
            .collect();
        let buttons_pressed = self
            .buttons_down
            .union(&self.buttons_struck)
            .filter(|b| !self.prev_buttons.contains(b))
            .copied()
            .collect();
        // A drag only counts while the button was held across both frames.
        let held: HashSet<MouseButton> = self
            .buttons_down
            .intersection(&self.prev_buttons)
            .copied()
            .collect();

        let frame = FrameInput {
            keys_down: self.keys_down.clone(),
            keys_pressed,
            buttons_down: self.buttons_down.clone(),
            buttons_pressed,
            buttons_held: held,
            cursor: self.cursor,
            cursor_delta: self.cursor - self.prev_cursor,
            scroll: self.scroll,
            text: std::mem::take(&mut self.text),
            edits: std::mem::take(&mut self.edits),
        };

        self.prev_keys = self.keys_down.clone();
        self.prev_buttons = self.buttons_down.clone();
        self.prev_cursor = self.cursor;
        self.keys_struck.clear();
        self.buttons_struck.clear();
        self.scroll = 0.0;
        frame
    }
}

/// Line-editing input in the order it arrived within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Enter,
}

/// Everything the update step may know about input for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_held: HashSet<MouseButton>,
    /// Cursor position in screen pixels.
    pub cursor: DVec2,
    cursor_delta: DVec2,
    /// Scroll wheel movement this frame.
    pub scroll: f64,
    /// Characters typed this frame.
    pub text: String,
    edits: Vec<TextEdit>,
}

impl FrameInput {
    /// Level-triggered: the key is held right now.
    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Edge-triggered: the key went down this frame.
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Typed characters interleaved with Backspace and Enter presses.
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Edge-triggered press with Meta or Control held.
    pub fn command(&self, key: Key) -> bool {
        self.pressed(key) && self.command_held()
    }

    pub fn command_held(&self) -> bool {
        self.is_down(Key::Meta) || self.is_down(Key::Control)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Edge-triggered: the button went down this frame.
    pub fn clicked(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Screen-space cursor movement since last frame while `button` stayed held.
    pub fn drag(&self, button: MouseButton) -> DVec2 {
        if self.buttons_held.contains(&button) {
            self.cursor_delta
        } else {
            DVec2::ZERO
        }
    }
}
