//! Mood markers and accent colors.
//!
//! Entries store their mood marker as an opaque string. Early revisions only
//! offered the fixed set in [`Mood`]; later ones accept arbitrary text. This
//! module maps markers to their default accent color and normalizes
//! user-supplied hex colors. The entry store never consults it.

use crate::constants::FALLBACK_ACCENT_HEX;

/// The fixed set of moods offered by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Calm,
    Sad,
    Angry,
    Anxious,
    Tired,
    Excited,
    Loved,
}

impl Mood {
    /// Every mood in picker order.
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Sad,
        Mood::Angry,
        Mood::Anxious,
        Mood::Tired,
        Mood::Excited,
        Mood::Loved,
    ];

    /// The emoji stored as the entry's mood marker.
    pub fn marker(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Calm => "😌",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Anxious => "😰",
            Mood::Tired => "😴",
            Mood::Excited => "🤩",
            Mood::Loved => "🥰",
        }
    }

    /// Default accent as `#RRGGBB`.
    pub fn default_accent(self) -> &'static str {
        match self {
            Mood::Happy => "#FFD60A",
            Mood::Calm => "#64D2FF",
            Mood::Sad => "#0A84FF",
            Mood::Angry => "#FF453A",
            Mood::Anxious => "#BF5AF2",
            Mood::Tired => "#8E8CD8",
            Mood::Excited => "#FF9F0A",
            Mood::Loved => "#FF375F",
        }
    }

    /// Looks up a mood by its emoji marker. Surrounding whitespace is ignored.
    pub fn from_marker(marker: &str) -> Option<Mood> {
        let marker = marker.trim();
        Mood::ALL.into_iter().find(|mood| mood.marker() == marker)
    }
}

/// Returns the accent used when an entry has no explicit color.
///
/// Known markers get their mood's default; anything else gets a neutral gray.
pub fn default_accent_for(marker: &str) -> &'static str {
    Mood::from_marker(marker)
        .map(Mood::default_accent)
        .unwrap_or(FALLBACK_ACCENT_HEX)
}

/// Normalizes a hex color to uppercase `#RRGGBB` or `#RRGGBBAA`.
///
/// The leading `#` is optional on input. Returns `None` for anything that is
/// not six or eight hex digits.
///
/// # Examples
///
/// ```
/// use moodiary::mood::normalize_hex_color;
///
/// assert_eq!(normalize_hex_color("ff9f0a").as_deref(), Some("#FF9F0A"));
/// assert_eq!(normalize_hex_color("#0a84ffcc").as_deref(), Some("#0A84FFCC"));
/// assert_eq!(normalize_hex_color("#fff"), None);
/// ```
pub fn normalize_hex_color(input: &str) -> Option<String> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);

    if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(format!("#{}", digits.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_round_trip_through_lookup() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_marker(mood.marker()), Some(mood));
        }
    }

    #[test]
    fn test_from_marker_trims_whitespace() {
        assert_eq!(Mood::from_marker(" 😢 "), Some(Mood::Sad));
    }

    #[test]
    fn test_default_accent_for_known_and_custom_markers() {
        assert_eq!(default_accent_for("😊"), "#FFD60A");
        assert_eq!(default_accent_for("feeling meh"), FALLBACK_ACCENT_HEX);
        assert_eq!(default_accent_for(""), FALLBACK_ACCENT_HEX);
    }

    #[test]
    fn test_default_accents_are_normalized() {
        for mood in Mood::ALL {
            let accent = mood.default_accent();
            assert_eq!(normalize_hex_color(accent).as_deref(), Some(accent));
        }
    }

    #[test]
    fn test_normalize_hex_color_rejects_invalid_input() {
        let cases = ["", "#", "#12345", "#1234567", "#GGGGGG", "red", "#12 456"];
        for case in cases {
            assert_eq!(normalize_hex_color(case), None, "accepted {:?}", case);
        }
    }
}
