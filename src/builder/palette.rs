// Color palette editing
//
// The palette is an ordered, index-addressable list on FieldState.
// Entries may be hex codes or free-form color names; blanks and
// duplicates are allowed while editing (the compiler filters blanks on
// output). Swatch sync maps a text entry to the 6-digit hex shown on
// the paired swatch control.

use crate::builder::field_state::FieldState;

/// Swatch color shown for entries that aren't valid hex.
pub const NEUTRAL_SWATCH: &str = "#888888";

/// Expanded 6-digit hex for a palette text entry, when the text is `#`
/// followed by exactly 3 or 6 hex digits. 3-digit shorthand doubles
/// each digit (`#abc` -> `#aabbcc`). Anything else returns None and the
/// swatch stays at [`NEUTRAL_SWATCH`].
pub fn swatch_hex(text: &str) -> Option<String> {
    let digits = text.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some(text.to_string()),
        3 => {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for c in digits.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            Some(expanded)
        }
        _ => None,
    }
}

/// Split a comma-separated palette string into trimmed, non-empty
/// entries (the node-input form of the palette).
pub fn coerce_palette(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

impl FieldState {
    /// Append a blank palette entry (the UI focuses it). Returns its
    /// index.
    pub fn add_color(&mut self) -> usize {
        self.colors.push(String::new());
        self.colors.len() - 1
    }

    /// Remove the entry at `index`; out-of-range indexes are ignored.
    pub fn remove_color(&mut self, index: usize) {
        if index < self.colors.len() {
            self.colors.remove(index);
        }
    }

    /// Replace the entry at `index` — from typed text, a swatch pick, an
    /// eyedropper pick, or a canvas pick. Out-of-range indexes are
    /// ignored.
    pub fn set_color(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = value.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_expands_three_digit_shorthand() {
        assert_eq!(swatch_hex("#abc").as_deref(), Some("#aabbcc"));
        assert_eq!(swatch_hex("#F0A").as_deref(), Some("#FF00AA"));
    }

    #[test]
    fn test_swatch_passes_six_digit_hex_through() {
        assert_eq!(swatch_hex("#A1B2C3").as_deref(), Some("#A1B2C3"));
    }

    #[test]
    fn test_swatch_rejects_non_hex() {
        assert_eq!(swatch_hex("amber glow"), None);
        assert_eq!(swatch_hex("#ggg"), None);
        assert_eq!(swatch_hex("#12"), None);
        assert_eq!(swatch_hex("#12345"), None);
        assert_eq!(swatch_hex(""), None);
    }

    #[test]
    fn test_coerce_palette_splits_and_trims() {
        assert_eq!(coerce_palette("a, ,b"), vec!["a", "b"]);
        assert_eq!(
            coerce_palette("#FFF, amber glow ,teal"),
            vec!["#FFF", "amber glow", "teal"]
        );
        assert!(coerce_palette("").is_empty());
        assert!(coerce_palette(" , ,").is_empty());
    }

    #[test]
    fn test_add_color_appends_blank_entry() {
        let mut state = FieldState::default();
        let index = state.add_color();
        assert_eq!(index, 2);
        assert_eq!(state.colors[index], "");
    }

    #[test]
    fn test_set_and_remove_color() {
        let mut state = FieldState::default();
        state.set_color(0, "#FF0000");
        assert_eq!(state.colors[0], "#FF0000");

        state.remove_color(0);
        assert_eq!(state.colors, vec!["amber glow"]);
    }

    #[test]
    fn test_out_of_range_indexes_are_ignored() {
        let mut state = FieldState::default();
        state.set_color(99, "#FFF");
        state.remove_color(99);
        assert_eq!(state.colors.len(), 2);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let mut state = FieldState {
            colors: Vec::new(),
            ..FieldState::default()
        };
        state.add_color();
        state.set_color(0, "#FFF");
        state.add_color();
        state.set_color(1, "#FFF");
        state.add_color();
        assert_eq!(state.colors, vec!["#FFF", "#FFF", ""]);
    }
}
