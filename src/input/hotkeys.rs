//! Hotkey system - keyboard shortcuts to playback commands.
//!
//! Bindings are plain strings (`"ArrowLeft"`, `"Space"`, `"Ctrl+ArrowRight"`)
//! so they can be remapped freely; nothing here depends on a UI toolkit.

use crate::core::player_events::PlaybackCommand;
use std::collections::HashMap;

/// Hotkey handler for mapping key presses to transitions
#[derive(Clone, Debug, Default)]
pub struct Hotkeys {
    bindings: HashMap<String, PlaybackCommand>,
}

impl Hotkeys {
    /// Empty handler (no bindings)
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler with the default bindings
    pub fn with_defaults() -> Self {
        let mut hotkeys = Self::new();
        hotkeys.setup_default_bindings();
        hotkeys
    }

    /// Handle key press
    pub fn handle_key(&self, key: &str) -> Option<PlaybackCommand> {
        self.bindings.get(&normalize(key)).copied()
    }

    /// Handle key with modifiers
    pub fn handle_key_with_modifiers(
        &self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
    ) -> Option<PlaybackCommand> {
        let mut key_combo = String::new();
        if ctrl {
            key_combo.push_str("Ctrl+");
        }
        if shift {
            key_combo.push_str("Shift+");
        }
        if alt {
            key_combo.push_str("Alt+");
        }
        key_combo.push_str(key);

        self.handle_key(&key_combo)
    }

    /// Add (or replace) a binding
    pub fn add_binding(&mut self, key: &str, command: PlaybackCommand) {
        self.bindings.insert(normalize(key), command);
    }

    pub fn remove_binding(&mut self, key: &str) -> Option<PlaybackCommand> {
        self.bindings.remove(&normalize(key))
    }

    /// Keys bound to `command`, sorted
    pub fn keys_for(&self, command: PlaybackCommand) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Arrows step, Space plays/pauses, Escape resets
    pub fn setup_default_bindings(&mut self) {
        use PlaybackCommand::*;

        self.add_binding("ArrowLeft", StepBackward);
        self.add_binding("ArrowRight", StepForward);
        self.add_binding("Space", TogglePlayPause);
        self.add_binding(" ", TogglePlayPause);
        self.add_binding("Escape", Reset);
    }
}

/// Canonical form: modifiers in fixed order, names case-insensitive
/// (`shift+ctrl+arrowleft` -> `Ctrl+Shift+ArrowLeft`). The `+` key itself
/// is written as a trailing `+` (`+`, `Ctrl++`).
fn normalize(key: &str) -> String {
    if key == " " {
        return "Space".to_string();
    }
    let (mods, base) = if key == "+" {
        ("", "+")
    } else if let Some(mods) = key.strip_suffix("++") {
        (mods, "+")
    } else {
        key.rsplit_once('+').unwrap_or(("", key))
    };
    let has = |m: &str| mods.split('+').any(|p| p.eq_ignore_ascii_case(m));

    let mut out = String::new();
    for m in ["Ctrl", "Shift", "Alt"] {
        if has(m) {
            out.push_str(m);
            out.push('+');
        }
    }
    out.push_str(&canonical_key(base));
    out
}

fn canonical_key(base: &str) -> String {
    const NAMED: &[&str] = &["ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown", "Space", "Escape", "Enter"];
    NAMED
        .iter()
        .find(|n| n.eq_ignore_ascii_case(base))
        .map(|n| n.to_string())
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let h = Hotkeys::with_defaults();
        assert_eq!(h.handle_key("ArrowLeft"), Some(PlaybackCommand::StepBackward));
        assert_eq!(h.handle_key("ArrowRight"), Some(PlaybackCommand::StepForward));
        assert_eq!(h.handle_key(" "), Some(PlaybackCommand::TogglePlayPause));
        assert_eq!(h.handle_key("space"), Some(PlaybackCommand::TogglePlayPause));
        assert_eq!(h.handle_key("Escape"), Some(PlaybackCommand::Reset));
        assert_eq!(h.handle_key("F1"), None);
    }

    #[test]
    fn test_remap() {
        let mut h = Hotkeys::with_defaults();
        h.add_binding("arrowright", PlaybackCommand::ShowAll);
        h.add_binding("Shift+ArrowRight", PlaybackCommand::ScrubTo(i64::MAX));
        assert_eq!(h.handle_key("ArrowRight"), Some(PlaybackCommand::ShowAll));
        assert_eq!(
            h.handle_key_with_modifiers("ArrowRight", false, true, false),
            Some(PlaybackCommand::ScrubTo(i64::MAX))
        );
        assert_eq!(h.remove_binding("Escape"), Some(PlaybackCommand::Reset));
        assert_eq!(h.handle_key("Escape"), None);
    }

    #[test]
    fn test_modifier_order_normalized() {
        let mut h = Hotkeys::new();
        h.add_binding("Shift+Ctrl+ArrowLeft", PlaybackCommand::Reset);
        assert_eq!(h.handle_key("ctrl+shift+arrowleft"), Some(PlaybackCommand::Reset));
        assert_eq!(h.keys_for(PlaybackCommand::Reset), vec!["Ctrl+Shift+ArrowLeft"]);
    }

    #[test]
    fn test_plus_key_can_be_bound() {
        let mut h = Hotkeys::new();
        h.add_binding("+", PlaybackCommand::ShowAll);
        h.add_binding("ctrl++", PlaybackCommand::Reset);
        assert_eq!(h.handle_key("+"), Some(PlaybackCommand::ShowAll));
        assert_eq!(
            h.handle_key_with_modifiers("+", true, false, false),
            Some(PlaybackCommand::Reset)
        );
        assert_eq!(h.keys_for(PlaybackCommand::Reset), vec!["Ctrl++"]);
        assert_eq!(h.handle_key(""), None);
    }
}
