//! Keyboard shortcut bindings.
//!
//! Maps key chords such as `mod+shift+z` to editor actions. `mod` stands for
//! the platform command key and is treated the same as `ctrl`.

use std::fmt;
use std::str::FromStr;

/// Something a shortcut can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Undo,
    Redo,
    GenerateSql,
    ExportSchema,
    ShowDiagram,
    ShowShortcuts,
}

impl Action {
    /// Looks up the action bound to `chord`, if any.
    pub fn for_chord(chord: &KeyChord) -> Option<Action> {
        BINDINGS
            .iter()
            .find(|b| b.chord == *chord)
            .map(|b| b.action)
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::GenerateSql => "Generate SQL",
            Action::ExportSchema => "Export Schema",
            Action::ShowDiagram => "View Schema Diagram",
            Action::ShowShortcuts => "Show Shortcuts",
        }
    }
}

/// A key plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    /// Lower-cased key character.
    pub key: char,
}

impl KeyChord {
    pub const fn plain(key: char) -> Self {
        Self {
            ctrl: false,
            shift: false,
            key,
        }
    }

    pub const fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            shift: false,
            key,
        }
    }

    pub const fn ctrl_shift(key: char) -> Self {
        Self {
            ctrl: true,
            shift: true,
            key,
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl/⌘ + ")?;
        }
        if self.shift {
            f.write_str("Shift + ")?;
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChordParseError {
    #[error("empty key chord")]
    Empty,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("key must be a single character, got '{0}'")]
    InvalidKey(String),
}

impl FromStr for KeyChord {
    type Err = ChordParseError;

    /// Parses `mod+z`, `Ctrl+Shift+Z`, `cmd+e`, `?` and similar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ChordParseError::Empty);
        }
        // A bare "+" is a key, not a separator.
        let mut parts: Vec<&str> = if s == "+" { vec![s] } else { s.split('+').collect() };
        let key_part = parts.pop().ok_or(ChordParseError::Empty)?.trim();

        let mut chord = KeyChord::plain(' ');
        for modifier in parts {
            match modifier.trim().to_ascii_lowercase().as_str() {
                "mod" | "ctrl" | "control" | "cmd" | "command" | "meta" => chord.ctrl = true,
                "shift" => chord.shift = true,
                other => return Err(ChordParseError::UnknownModifier(other.to_string())),
            }
        }

        let mut chars = key_part.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => chord.key = c.to_ascii_lowercase(),
            _ => return Err(ChordParseError::InvalidKey(key_part.to_string())),
        }
        Ok(chord)
    }
}

/// A chord-to-action binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub chord: KeyChord,
    pub action: Action,
}

/// Every shortcut, in the order shown in the shortcut list.
pub const BINDINGS: [Binding; 6] = [
    Binding {
        chord: KeyChord::ctrl('z'),
        action: Action::Undo,
    },
    Binding {
        chord: KeyChord::ctrl_shift('z'),
        action: Action::Redo,
    },
    Binding {
        chord: KeyChord::ctrl('s'),
        action: Action::GenerateSql,
    },
    Binding {
        chord: KeyChord::ctrl('e'),
        action: Action::ExportSchema,
    },
    Binding {
        chord: KeyChord::ctrl('v'),
        action: Action::ShowDiagram,
    },
    Binding {
        chord: KeyChord::plain('?'),
        action: Action::ShowShortcuts,
    },
];
