//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values to semantic `ShortcutAction`s. Keys
//! typed into a text field belong to the field, except `Escape`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the selected node.
    Delete,
    Deselect,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. Returns `None` if the key has no
    /// binding or belongs to a focused text field.
    pub fn resolve(key: &str, focus_in_text: bool) -> Option<ShortcutAction> {
        match key {
            "Delete" | "Backspace" if !focus_in_text => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
