use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Seconds jumped back by the rewind key.
    #[serde(default = "default_rewind_seconds")]
    pub rewind_seconds: f64,
    /// Seconds moved by the seek keys.
    #[serde(default = "default_seek_step")]
    pub seek_step: f64,
    #[serde(default = "default_highlight")]
    pub highlight_subtitles: bool,
    #[serde(default)]
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub play_pause: String,
    pub rewind: String,
    pub seek_back: String,
    pub seek_forward: String,
    pub next_scene: String,
    pub prev_scene: String,
    pub loop_start: String,
    pub loop_end: String,
    pub clear_loop: String,
    pub toggle_highlight: String,
    pub rip_subtitle: String,
    pub clear_workspace: String,
    pub select_token: String,
    pub move_token: String,
    pub quit: String,
}

fn default_frame_rate() -> u32 { 30 }
fn default_rewind_seconds() -> f64 { 5.0 }
fn default_seek_step() -> f64 { 1.0 }
fn default_highlight() -> bool { true }

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            play_pause: "Space".into(),
            rewind: "r".into(),
            seek_back: "Left".into(),
            seek_forward: "Right".into(),
            next_scene: "n".into(),
            prev_scene: "p".into(),
            loop_start: "[".into(),
            loop_end: "]".into(),
            clear_loop: "c".into(),
            toggle_highlight: "h".into(),
            rip_subtitle: "x".into(),
            clear_workspace: "w".into(),
            select_token: "Tab".into(),
            move_token: "m".into(),
            quit: "q".into(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            frame_rate: default_frame_rate(),
            rewind_seconds: default_rewind_seconds(),
            seek_step: default_seek_step(),
            highlight_subtitles: default_highlight(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl PlayerConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read a config file. A missing file gives defaults; an invalid one is
    /// reported and also gives defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), "invalid player config ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("scene-player");
        path.push("player.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire on Ctrl/Alt chords.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }
    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "BackTab" => code == KeyCode::BackTab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn named_and_char_bindings() {
        let none = KeyModifiers::NONE;
        assert!(matches_binding("Space", &key(KeyCode::Char(' '), none)));
        assert!(matches_binding("Left", &key(KeyCode::Left, none)));
        assert!(matches_binding("F5", &key(KeyCode::F(5), none)));
        assert!(matches_binding("[", &key(KeyCode::Char('['), none)));
        assert!(!matches_binding("r", &key(KeyCode::Char('x'), none)));
    }

    #[test]
    fn plain_binding_rejects_chords() {
        assert!(!matches_binding("r", &key(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(matches_binding("Ctrl-r", &key(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(!matches_binding("Ctrl-r", &key(KeyCode::Char('r'), KeyModifiers::NONE)));
        assert!(matches_binding("Alt-Enter", &key(KeyCode::Enter, KeyModifiers::ALT)));
    }

    #[test]
    fn multi_char_unknown_name_never_matches() {
        assert!(!matches_binding("Foo", &key(KeyCode::Char('F'), KeyModifiers::NONE)));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.json");
        std::fs::write(&path, r#"{"frame_rate": 60, "key_bindings": {"quit": "Esc"}}"#).unwrap();

        let config = PlayerConfig::load_from(&path);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.rewind_seconds, 5.0);
        assert_eq!(config.key_bindings.quit, "Esc");
        assert_eq!(config.key_bindings.play_pause, "Space");
    }

    #[test]
    fn invalid_or_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert_eq!(PlayerConfig::load_from(&bad), PlayerConfig::default());
        assert_eq!(
            PlayerConfig::load_from(&dir.path().join("missing.json")),
            PlayerConfig::default()
        );
    }
}
