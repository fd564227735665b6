//! Key chord parsing and matching.
//!
//! Chords are written as "ctrl+space" or "ctrl+shift+k". Both `+` and `-`
//! are accepted as separators. Matching is exact on all four modifiers, so
//! "ctrl+shift+space" never fires a binding for "ctrl+space".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// A parsed key chord: modifier set plus a named key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,

    /// Normalized lowercase key name, e.g. "space", "k", "enter".
    pub key: String,
}

impl Chord {
    /// Parse a chord string like "ctrl+shift+space".
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut chord = Chord::default();
        let mut key = None;

        let tokens: Vec<&str> = s
            .split(['+', '-'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(ConfigError::InvalidChord(s.to_string()));
        }

        for (i, token) in tokens.iter().enumerate() {
            let lowered = token.to_ascii_lowercase();
            let last = i == tokens.len() - 1;
            match lowered.as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "alt" | "option" => chord.alt = true,
                "shift" => chord.shift = true,
                "meta" | "cmd" | "super" | "win" => chord.meta = true,
                _ if last => key = Some(normalize_key(&lowered)),
                _ => return Err(ConfigError::InvalidChord(s.to_string())),
            }
        }

        match key {
            Some(key) => {
                chord.key = key;
                Ok(chord)
            }
            // All tokens were modifiers.
            None => Err(ConfigError::InvalidChord(s.to_string())),
        }
    }

    /// Build a chord from live key event state.
    pub fn from_event(key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        Self {
            ctrl,
            alt,
            shift,
            meta,
            key: normalize_key(&key.to_ascii_lowercase()),
        }
    }

    /// Exact match: same key and the same modifier set.
    pub fn matches(&self, pressed: &Chord) -> bool {
        self == pressed
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.alt {
            write!(f, "alt+")?;
        }
        if self.shift {
            write!(f, "shift+")?;
        }
        if self.meta {
            write!(f, "meta+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Normalize a key name. Event sources disagree on whitespace keys.
fn normalize_key(key: &str) -> String {
    match key {
        " " | "spacebar" => "space".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_separators() {
        let plus = Chord::parse("ctrl+shift+space").unwrap();
        let dash = Chord::parse("ctrl-shift-space").unwrap();
        assert_eq!(plus, dash);
        assert!(plus.ctrl);
        assert!(plus.shift);
        assert!(!plus.alt);
        assert!(!plus.meta);
        assert_eq!(plus.key, "space");
    }

    #[test]
    fn test_exact_modifier_match() {
        let web = Chord::parse("ctrl+space").unwrap();
        let tool = Chord::parse("ctrl+shift+space").unwrap();
        let pressed = Chord::from_event(" ", true, false, true, false);

        assert!(tool.matches(&pressed));
        assert!(!web.matches(&pressed));
    }

    #[test]
    fn test_parse_rejects_unknown_modifier() {
        assert!(Chord::parse("hyper+space").is_err());
        assert!(Chord::parse("ctrl+").is_err());
        assert!(Chord::parse("").is_err());
    }

    #[test]
    fn test_modifier_only_is_rejected() {
        assert!(Chord::parse("ctrl+shift").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let chord = Chord::parse("shift-ctrl-k").unwrap();
        assert_eq!(chord.to_string(), "ctrl+shift+k");
        assert_eq!(Chord::parse(&chord.to_string()).unwrap(), chord);
    }
}
