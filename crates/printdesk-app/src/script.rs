//! Session scripts: a JSON list of editing steps replayed against an editor.

use printdesk_canvas::{Key, KeyCombo};
use printdesk_core::{Action, ObjectId};
use serde::{Deserialize, Serialize};

/// One step of a scripted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    /// Apply an action as one undo step.
    Dispatch { action: Action },
    /// Apply an action as part of the open gesture.
    Preview { action: Action },
    BeginGesture,
    EndGesture,
    CancelGesture,
    Undo,
    Redo,
    /// Select objects on the surface.
    Select { ids: Vec<ObjectId> },
    /// Press a key combination, e.g. `"ctrl+shift+z"` or `"delete"`.
    Press { keys: String },
}

/// Parse a key combination such as `"ctrl+d"`.
pub fn parse_combo(keys: &str) -> Option<KeyCombo> {
    let mut ctrl = false;
    let mut shift = false;
    let mut key = None;

    for part in keys.split('+').map(|p| p.trim().to_ascii_lowercase()) {
        match part.as_str() {
            "ctrl" | "cmd" => ctrl = true,
            "shift" => shift = true,
            "delete" | "del" => key = Some(Key::Delete),
            "backspace" => key = Some(Key::Backspace),
            "escape" | "esc" => key = Some(Key::Escape),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => key = Some(Key::Char(c)),
                    _ => return None,
                }
            }
        }
    }

    key.map(|key| KeyCombo { key, ctrl, shift })
}

pub fn parse_script(json: &str) -> Result<Vec<Step>, serde_json::Error> {
    serde_json::from_str(json)
}
