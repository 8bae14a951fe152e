//! Text utilities for field rendering.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Character drawn in place of each password character.
pub const MASK_CHAR: char = '•';

/// Returns a string of `MASK_CHAR` with one mask per grapheme of `secret`.
pub fn mask(secret: &str) -> String {
    std::iter::repeat_n(MASK_CHAR, secret.graphemes(true).count()).collect()
}

/// Removes the last grapheme cluster, so a base letter and its combining
/// marks go together.
pub fn pop_grapheme(text: &mut String) {
    if let Some((start, _)) = text.grapheme_indices(true).next_back() {
        text.truncate(start);
    }
}

/// Keeps the end of `text` visible, prefixing `…` when it exceeds `max_width`.
///
/// Input fields grow to the right, so the cursor end is what must stay on screen.
/// Width is measured in terminal columns (wide characters count as 2).
pub fn truncate_start_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut kept: Vec<char> = Vec::new();
    let mut width = 0;
    for ch in text.chars().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        kept.push(ch);
    }
    let mut truncated = String::from('…');
    truncated.extend(kept.into_iter().rev());
    truncated
}
