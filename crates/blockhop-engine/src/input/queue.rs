/// Keys the editor and game react to.
///
/// Printable keys are carried as `Char` with the lowercase character so that
/// bindings do not depend on shift state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Escape,
    Space,
    Tab,
    Shift,
    Control,
    Meta,
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Printable key for `c`, normalized to lowercase.
    pub fn char(c: char) -> Key {
        Key::Char(c.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Input event types the engine understands.
/// Pointer coordinates are screen pixels, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { button: MouseButton },
    PointerUp { button: MouseButton },
    PointerMove { x: f64, y: f64 },
    /// Vertical wheel movement; positive scrolls up.
    Scroll { dy: f64 },
    KeyDown { key: Key },
    KeyUp { key: Key },
    /// A character produced by the keyboard layout.
    Text { ch: char },
}

/// Events written by the host between frames, in arrival order.
#[derive(Debug, Default)]
pub struct InputQueue(Vec<InputEvent>);

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.0.push(event);
    }

    /// Take everything queued so far, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
