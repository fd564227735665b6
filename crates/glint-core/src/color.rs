//! Recently used colors.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Maximum number of colors kept in the recent list.
pub const RECENT_COLOR_CAP: usize = 20;

/// One entry in the recent color list, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentColor {
    /// Canonical lowercase "#rrggbb".
    pub value: String,

    /// When the color was last picked, unix millis.
    pub timestamp: u64,
}

/// Canonicalize a hex color to lowercase "#rrggbb".
///
/// Accepts "#RGB" and "#RRGGBB" forms, case-insensitive, with or without
/// the leading "#".
pub fn normalize_hex(raw: &str) -> Result<String, StoreError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StoreError::Validation(format!(
            "invalid hex color '{raw}'"
        )));
    }

    match digits.len() {
        3 => {
            let mut out = String::with_capacity(7);
            out.push('#');
            for c in digits.chars() {
                let c = c.to_ascii_lowercase();
                out.push(c);
                out.push(c);
            }
            Ok(out)
        }
        6 => Ok(format!("#{}", digits.to_ascii_lowercase())),
        _ => Err(StoreError::Validation(format!(
            "invalid hex color '{raw}'"
        ))),
    }
}

/// Insert a color at the front of the recent list.
///
/// Re-adding an existing value moves it to the front without growing the
/// list. The list never exceeds [`RECENT_COLOR_CAP`] entries.
pub fn push_recent(list: &mut Vec<RecentColor>, value: String, timestamp: u64) {
    list.retain(|c| c.value != value);
    list.insert(0, RecentColor { value, timestamp });
    list.truncate(RECENT_COLOR_CAP);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex_forms() {
        assert_eq!(normalize_hex("#FF8800").unwrap(), "#ff8800");
        assert_eq!(normalize_hex("ff8800").unwrap(), "#ff8800");
        assert_eq!(normalize_hex("#F80").unwrap(), "#ff8800");
        assert_eq!(normalize_hex("  #f80  ").unwrap(), "#ff8800");
    }

    #[test]
    fn test_normalize_hex_rejects_garbage() {
        assert!(normalize_hex("").is_err());
        assert!(normalize_hex("#").is_err());
        assert!(normalize_hex("#ff88").is_err());
        assert!(normalize_hex("#ggg").is_err());
        assert!(normalize_hex("red").is_err());
    }

    #[test]
    fn test_push_recent_dedupes_to_front() {
        let mut list = Vec::new();
        push_recent(&mut list, "#111111".to_string(), 1);
        push_recent(&mut list, "#222222".to_string(), 2);
        push_recent(&mut list, "#111111".to_string(), 3);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].value, "#111111");
        assert_eq!(list[0].timestamp, 3);
        assert_eq!(list[1].value, "#222222");
    }

    #[test]
    fn test_push_recent_caps_length() {
        let mut list = Vec::new();
        for i in 0..30 {
            push_recent(&mut list, format!("#{i:06x}"), i);
        }

        assert_eq!(list.len(), RECENT_COLOR_CAP);
        // Most recent first, oldest evicted.
        assert_eq!(list[0].value, "#00001d");
        assert!(list.iter().all(|c| c.value != "#000000"));
    }
}
