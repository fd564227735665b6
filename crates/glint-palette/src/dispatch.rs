//! Keyboard chord dispatch.
//!
//! Decides, for each key press, whether a configured chord should open a
//! palette or the event belongs to the page. The caller is responsible
//! for consuming the event when told to open.

use glint_core::{AppConfig, Chord, ConfigError, PaletteMode};

use crate::focus::FocusTarget;

/// A key press paired with where it landed.
#[derive(Debug, Clone)]
pub struct KeyPress {
    pub chord: Chord,
    pub target: FocusTarget,
}

impl KeyPress {
    pub fn new(chord: Chord, target: FocusTarget) -> Self {
        Self { chord, target }
    }
}

/// What the host should do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Not ours; let the page see it.
    Pass,

    /// Consume the event and open the palette in this mode. The caller
    /// must stop propagation so the page never sees the chord.
    OpenPalette(PaletteMode),
}

/// Routes configured chords to palette modes, deferring to editable
/// targets that are not search boxes.
#[derive(Debug, Clone)]
pub struct ShortcutDispatcher {
    web_chord: Chord,
    tool_chord: Chord,
    enabled: bool,
}

impl ShortcutDispatcher {
    pub fn new(web_chord: Chord, tool_chord: Chord) -> Self {
        Self {
            web_chord,
            tool_chord,
            enabled: true,
        }
    }

    /// Build from configuration, parsing both chord strings.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.web_chord()?, config.tool_chord()?))
    }

    /// Flip the global shortcut toggle. While disabled every press passes
    /// through.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        tracing::debug!(
            "Shortcuts {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Classify one key press.
    pub fn dispatch(&self, press: &KeyPress) -> KeyDisposition {
        if !self.enabled {
            return KeyDisposition::Pass;
        }

        let mode = if self.web_chord.matches(&press.chord) {
            PaletteMode::Web
        } else if self.tool_chord.matches(&press.chord) {
            PaletteMode::Tool
        } else {
            return KeyDisposition::Pass;
        };

        // A user typing in a form field keeps their keystrokes, unless the
        // field is a search box.
        if press.target.is_editable() && !press.target.is_search_box() {
            return KeyDisposition::Pass;
        }

        KeyDisposition::OpenPalette(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> ShortcutDispatcher {
        ShortcutDispatcher::new(
            Chord::parse("ctrl+space").unwrap(),
            Chord::parse("ctrl+shift+space").unwrap(),
        )
    }

    fn press(chord: &str, target: FocusTarget) -> KeyPress {
        KeyPress::new(Chord::parse(chord).unwrap(), target)
    }

    #[test]
    fn test_web_chord_opens_on_plain_target() {
        let d = dispatcher();
        assert_eq!(
            d.dispatch(&press("ctrl+space", FocusTarget::other())),
            KeyDisposition::OpenPalette(PaletteMode::Web)
        );
    }

    #[test]
    fn test_tool_chord_requires_exact_modifiers() {
        let d = dispatcher();
        assert_eq!(
            d.dispatch(&press("ctrl+shift+space", FocusTarget::other())),
            KeyDisposition::OpenPalette(PaletteMode::Tool)
        );
        // The extra modifier means the web chord must not fire.
        assert_ne!(
            d.dispatch(&press("ctrl+shift+space", FocusTarget::other())),
            KeyDisposition::OpenPalette(PaletteMode::Web)
        );
    }

    #[test]
    fn test_unrelated_keys_pass() {
        let d = dispatcher();
        assert_eq!(
            d.dispatch(&press("ctrl+k", FocusTarget::other())),
            KeyDisposition::Pass
        );
        assert_eq!(
            d.dispatch(&press("space", FocusTarget::other())),
            KeyDisposition::Pass
        );
    }

    #[test]
    fn test_editable_target_swallows_chord() {
        let d = dispatcher();
        let textarea = FocusTarget {
            kind: crate::focus::TargetKind::TextArea,
            ..FocusTarget::default()
        };
        assert_eq!(d.dispatch(&press("ctrl+space", textarea)), KeyDisposition::Pass);
    }

    #[test]
    fn test_search_box_still_opens() {
        let d = dispatcher();
        assert_eq!(
            d.dispatch(&press("ctrl+space", FocusTarget::input("search"))),
            KeyDisposition::OpenPalette(PaletteMode::Web)
        );

        let by_placeholder = FocusTarget {
            placeholder: "Search products".to_string(),
            ..FocusTarget::input("text")
        };
        assert_eq!(
            d.dispatch(&press("ctrl+space", by_placeholder)),
            KeyDisposition::OpenPalette(PaletteMode::Web)
        );
    }

    #[test]
    fn test_plain_text_input_swallows_chord() {
        let d = dispatcher();
        let email = FocusTarget {
            placeholder: "Email address".to_string(),
            ..FocusTarget::input("email")
        };
        assert_eq!(d.dispatch(&press("ctrl+space", email)), KeyDisposition::Pass);
    }

    #[test]
    fn test_disabled_dispatcher_passes_everything() {
        let mut d = dispatcher();
        d.set_enabled(false);
        assert_eq!(
            d.dispatch(&press("ctrl+space", FocusTarget::other())),
            KeyDisposition::Pass
        );

        d.set_enabled(true);
        assert_eq!(
            d.dispatch(&press("ctrl+space", FocusTarget::other())),
            KeyDisposition::OpenPalette(PaletteMode::Web)
        );
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let d = ShortcutDispatcher::from_config(&AppConfig::default()).unwrap();
        assert_eq!(
            d.dispatch(&press("ctrl+space", FocusTarget::other())),
            KeyDisposition::OpenPalette(PaletteMode::Web)
        );
        assert_eq!(
            d.dispatch(&press("ctrl+shift+space", FocusTarget::other())),
            KeyDisposition::OpenPalette(PaletteMode::Tool)
        );
    }
}
