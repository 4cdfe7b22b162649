use cld_core::theme::{Font, FontWeight};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Greedily packs space-separated words into lines of at most `max_chars` characters.
///
/// A word is moved to a new line when appending it (with one joining space) to the current
/// line would exceed the threshold. A single word longer than the threshold gets a line of its
/// own and is never split.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let candidate_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if candidate_len > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = candidate_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Baseline y of each of `count` lines stacked `line_height` apart and centered on `center_y`.
pub fn centered_line_offsets(count: usize, center_y: f64, line_height: f64) -> Vec<f64> {
    let start = center_y - (count.saturating_sub(1) as f64) * line_height / 2.0;
    (0..count).map(|i| start + i as f64 * line_height).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &Font) -> TextMetrics;
}

/// Font-independent estimate: every display column is `char_width_factor × size` wide.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, font: &Font) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };
        let bold = if font.weight == FontWeight::Bold {
            1.1
        } else {
            1.0
        };

        let size = font.size.max(1.0);
        TextMetrics {
            width: text.width() as f64 * size * char_width_factor * bold,
            height: size * line_height_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_the_long_program_label_into_two_lines() {
        assert_eq!(
            wrap_words("Affordable Housing Program", 18),
            ["Affordable Housing", "Program"]
        );
    }

    #[test]
    fn exact_fit_stays_on_one_line() {
        // "Homelessness Presence" is 21 chars; "Temporary Shelters" is exactly 18.
        assert_eq!(wrap_words("Temporary Shelters", 18), ["Temporary Shelters"]);
        assert_eq!(
            wrap_words("Homelessness Presence", 18),
            ["Homelessness", "Presence"]
        );
    }

    #[test]
    fn overlong_words_get_their_own_line() {
        assert_eq!(
            wrap_words("a supercalifragilistic b", 5),
            ["a", "supercalifragilistic", "b"]
        );
    }

    #[test]
    fn empty_labels_have_no_lines() {
        assert!(wrap_words("", 18).is_empty());
        assert!(wrap_words("   ", 18).is_empty());
    }

    #[test]
    fn line_offsets_center_on_the_node() {
        assert_eq!(centered_line_offsets(1, 80.0, 12.0), [80.0]);
        assert_eq!(centered_line_offsets(2, 420.0, 12.0), [414.0, 426.0]);
        assert_eq!(centered_line_offsets(3, 0.0, 10.0), [-10.0, 0.0, 10.0]);
        assert!(centered_line_offsets(0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn deterministic_measurer_scales_with_font_size() {
        let m = DeterministicTextMeasurer::default();
        let small = m.measure("abcd", &Font::regular(10.0));
        let large = m.measure("abcd", &Font::regular(20.0));
        assert!((small.width - 24.0).abs() < 1e-9);
        assert!((large.width - 2.0 * small.width).abs() < 1e-9);
        assert!(m.measure("abcd", &Font::bold(10.0)).width > small.width);
    }
}
