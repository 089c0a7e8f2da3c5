//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen pointer events into one `InputEvent`
//! enum consumed by the engine and its tools. Coordinates are workspace
//! pixels: the pointer position relative to the workspace element, before
//! the canvas pan is undone.

/// Which button produced a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button, touch contact, pen tip.
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// Map a DOM `PointerEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        pointer_id: i32,
        button: Button,
        /// False for the second finger of a multi-touch, etc.
        is_primary: bool,
    },

    PointerMove { x: f64, y: f64, pointer_id: i32 },

    /// Pointer released or cancelled.
    PointerUp { x: f64, y: f64, pointer_id: i32 },

    Key {
        /// `KeyboardEvent.key` value (e.g. `"Delete"`).
        key: String,
        /// Focus is inside a text input or textarea.
        focus_in_text: bool,
    },
}

impl InputEvent {
    /// A primary-button down from the primary pointer.
    pub fn down(x: f64, y: f64, pointer_id: i32) -> Self {
        Self::PointerDown {
            x,
            y,
            pointer_id,
            button: Button::Primary,
            is_primary: true,
        }
    }

    pub fn moved(x: f64, y: f64, pointer_id: i32) -> Self {
        Self::PointerMove { x, y, pointer_id }
    }

    pub fn up(x: f64, y: f64, pointer_id: i32) -> Self {
        Self::PointerUp { x, y, pointer_id }
    }

    pub fn key(key: impl Into<String>, focus_in_text: bool) -> Self {
        Self::Key {
            key: key.into(),
            focus_in_text,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }

    pub fn pointer_id(&self) -> Option<i32> {
        match self {
            Self::PointerDown { pointer_id, .. }
            | Self::PointerMove { pointer_id, .. }
            | Self::PointerUp { pointer_id, .. } => Some(*pointer_id),
            Self::Key { .. } => None,
        }
    }

    /// Whether this event may start a gesture.
    pub fn starts_gesture(&self) -> bool {
        matches!(
            self,
            Self::PointerDown {
                button: Button::Primary,
                is_primary: true,
                ..
            }
        )
    }
}
