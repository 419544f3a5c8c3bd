//! Input events supplied by the host

use crate::foundation::math::Vec2;

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Keyboard key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / return
    Enter,
    /// Space bar
    Space,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Backspace
    Backspace,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Printable character
    Char(char),
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    /// Pointer moved
    PointerMove,
    /// Mouse button went down
    PointerDown(MouseButton),
    /// Mouse button went up
    PointerUp(MouseButton),
    /// Scroll wheel delta
    Scroll(Vec2),
    /// Key went down
    KeyDown(Key),
    /// Key went up
    KeyUp(Key),
}

/// A pointer or key event in UI space (top-left origin, pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// Event kind
    pub kind: InputKind,
    /// Pointer position when the event happened
    pub position: Vec2,
    /// Host timestamp in seconds
    pub timestamp: f64,
}

impl InputEvent {
    /// Create an event at a position
    pub fn new(kind: InputKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Vec2::new(x, y),
            timestamp: 0.0,
        }
    }

    /// Pointer moved to `(x, y)`
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::new(InputKind::PointerMove, x, y)
    }

    /// Left button pressed at `(x, y)`
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::new(InputKind::PointerDown(MouseButton::Left), x, y)
    }

    /// Left button released at `(x, y)`
    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::new(InputKind::PointerUp(MouseButton::Left), x, y)
    }

    /// Key pressed (position unused)
    pub fn key_down(key: Key) -> Self {
        Self::new(InputKind::KeyDown(key), 0.0, 0.0)
    }

    /// Key released (position unused)
    pub fn key_up(key: Key) -> Self {
        Self::new(InputKind::KeyUp(key), 0.0, 0.0)
    }

    /// Builder pattern: host timestamp
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the event carries a meaningful pointer position
    pub fn is_pointer(&self) -> bool {
        matches!(
            self.kind,
            InputKind::PointerMove | InputKind::PointerDown(_) | InputKind::PointerUp(_) | InputKind::Scroll(_)
        )
    }
}
