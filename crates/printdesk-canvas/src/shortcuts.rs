//! Keyboard shortcut registry.

use std::fmt;

/// A key as reported by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Escape => f.write_str("Escape"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

/// A key press with modifiers. `ctrl` also covers the command key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyCombo {
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub const fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
            shift: false,
        }
    }

    pub const fn ctrl_shift(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
            shift: true,
        }
    }

    fn normalized(self) -> Self {
        match self.key {
            Key::Char(c) => Self {
                key: Key::Char(c.to_ascii_lowercase()),
                ..self
            },
            _ => self,
        }
    }
}

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelection,
    DuplicateSelection,
    Undo,
    Redo,
    GroupSelection,
    UngroupSelection,
    /// Cancel the current gesture and clear the selection.
    Cancel,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub combo: KeyCombo,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(combo: KeyCombo, action: ShortcutAction, description: &'static str) -> Self {
        Self {
            combo,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.combo.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.combo.shift {
            parts.push("Shift".to_string());
        }
        parts.push(self.combo.key.to_string());
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new(KeyCombo::plain(Key::Delete), DeleteSelection, "Delete selected objects"),
            Shortcut::new(
                KeyCombo::plain(Key::Backspace),
                DeleteSelection,
                "Delete selected objects",
            ),
            Shortcut::new(KeyCombo::ctrl('d'), DuplicateSelection, "Duplicate selected objects"),
            Shortcut::new(KeyCombo::ctrl('z'), Undo, "Undo"),
            Shortcut::new(KeyCombo::ctrl_shift('z'), Redo, "Redo"),
            Shortcut::new(KeyCombo::ctrl('y'), Redo, "Redo"),
            Shortcut::new(KeyCombo::ctrl('g'), GroupSelection, "Group selected objects"),
            Shortcut::new(KeyCombo::ctrl_shift('g'), UngroupSelection, "Ungroup selected objects"),
            Shortcut::new(KeyCombo::plain(Key::Escape), Cancel, "Cancel current action"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn lookup(combo: KeyCombo) -> Option<ShortcutAction> {
        let combo = combo.normalized();
        Self::all()
            .into_iter()
            .find(|s| s.combo == combo)
            .map(|s| s.action)
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:20} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(ShortcutRegistry::lookup(KeyCombo::ctrl('Z')), Some(ShortcutAction::Undo));
        assert_eq!(
            ShortcutRegistry::lookup(KeyCombo::ctrl_shift('Z')),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn test_unbound_combo() {
        assert_eq!(ShortcutRegistry::lookup(KeyCombo::ctrl('q')), None);
        assert_eq!(
            ShortcutRegistry::lookup(KeyCombo::plain(Key::Char('z'))),
            None
        );
    }

    #[test]
    fn test_format() {
        let redo = Shortcut::new(KeyCombo::ctrl_shift('z'), ShortcutAction::Redo, "Redo");
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
        let delete = Shortcut::new(
            KeyCombo::plain(Key::Delete),
            ShortcutAction::DeleteSelection,
            "Delete",
        );
        assert_eq!(delete.format(), "Delete");
    }

    #[test]
    fn test_no_conflicting_bindings() {
        let all = ShortcutRegistry::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a.combo != b.combo || a.action == b.action);
            }
        }
    }
}
