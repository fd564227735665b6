//! Focus classification and retention against a hostile host page.
//!
//! A page may programmatically steal focus after the overlay mounts, so
//! the floating palette re-asserts focus on a fixed schedule and after
//! focus-loss events. This is a best-effort heuristic, not a guarantee:
//! the allow-list below keeps it from fighting a user who is legitimately
//! typing into another editable element.

use std::time::Duration;

/// Mount-time focus re-assertion schedule, in milliseconds after open.
pub const RETENTION_SCHEDULE_MS: [u64; 7] = [10, 25, 50, 100, 150, 200, 300];

/// Delay before re-focusing after a non-editable target stole focus.
pub const REFOCUS_DELAY: Duration = Duration::from_millis(10);

/// Delay before outside-pointer dismissal arms after open, so the click
/// that opened the palette cannot immediately close it.
pub const OUTSIDE_ARM_DELAY: Duration = Duration::from_millis(100);

/// What kind of element an event or focus change targeted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetKind {
    /// An input element, with its type attribute (lowercased, may be empty).
    Input { input_type: String },

    /// A textarea.
    TextArea,

    /// A contenteditable region.
    Editable,

    /// The palette's own input.
    PaletteInput,

    /// Anything else: divs, body, detached targets.
    #[default]
    Other,
}

/// A snapshot of the attributes the heuristics inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTarget {
    pub kind: TargetKind,

    /// Placeholder attribute, if any.
    pub placeholder: String,

    /// Element id attribute.
    pub id: String,

    /// Space-joined class list.
    pub classes: String,
}

impl FocusTarget {
    /// A non-editable, attribute-free target.
    pub fn other() -> Self {
        Self::default()
    }

    /// A plain input with the given type attribute.
    pub fn input(input_type: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Input {
                input_type: input_type.into(),
            },
            ..Self::default()
        }
    }

    /// True for targets a user can type into.
    pub fn is_editable(&self) -> bool {
        !matches!(self.kind, TargetKind::Other)
    }

    /// Search-box heuristic: an input is treated as a search box when its
    /// type is "search" or any of placeholder, id, or class mentions
    /// "search" (case-insensitive). Chords fired from a search box still
    /// open the palette; other editable targets swallow them.
    pub fn is_search_box(&self) -> bool {
        let TargetKind::Input { input_type } = &self.kind else {
            return false;
        };
        input_type.eq_ignore_ascii_case("search")
            || mentions_search(&self.placeholder)
            || mentions_search(&self.id)
            || mentions_search(&self.classes)
    }

    /// True when a focus change onto this target should trigger a delayed
    /// re-focus of the palette input. Editable targets are left alone.
    pub fn should_refocus(&self) -> bool {
        !self.is_editable()
    }
}

fn mentions_search(value: &str) -> bool {
    value.to_ascii_lowercase().contains("search")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_div_is_not_editable() {
        let target = FocusTarget::other();
        assert!(!target.is_editable());
        assert!(target.should_refocus());
    }

    #[test]
    fn test_textarea_is_editable_not_search() {
        let target = FocusTarget {
            kind: TargetKind::TextArea,
            placeholder: "Write a comment".to_string(),
            ..FocusTarget::default()
        };
        assert!(target.is_editable());
        assert!(!target.is_search_box());
        assert!(!target.should_refocus());
    }

    #[test]
    fn test_search_box_heuristic() {
        assert!(FocusTarget::input("search").is_search_box());

        let by_placeholder = FocusTarget {
            placeholder: "Search the docs".to_string(),
            ..FocusTarget::input("text")
        };
        assert!(by_placeholder.is_search_box());

        let by_class = FocusTarget {
            classes: "nav-item SearchField".to_string(),
            ..FocusTarget::input("text")
        };
        assert!(by_class.is_search_box());

        let plain = FocusTarget {
            placeholder: "Email address".to_string(),
            ..FocusTarget::input("text")
        };
        assert!(!plain.is_search_box());
    }

    #[test]
    fn test_search_mention_outside_input_kind_does_not_count() {
        let div = FocusTarget {
            classes: "search-results".to_string(),
            ..FocusTarget::other()
        };
        assert!(!div.is_search_box());
    }
}
