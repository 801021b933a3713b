// Text measuring and cropping helpers
//
// Widths are terminal cells as reported by unicode-width, so every
// padding/cropping decision in the listing is made in the same unit the
// renderer paints in.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// How a cropped string is terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Append "..." (costs three cells of the budget)
    Ellipsis,
    /// Replace the last kept character with '-'
    Hyphen,
}

/// Rendered width of a string in terminal cells
pub fn width(s: &str) -> usize {
    s.width()
}

/// Number of leading chars that fit within `max_width` cells
fn fitting_prefix(chars: &[char], max_width: usize) -> usize {
    let mut used = 0;
    for (idx, c) in chars.iter().enumerate() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            return idx;
        }
        used += w;
    }
    chars.len()
}

/// Hard-truncate to at most `max_width` cells
pub fn truncate(s: &str, max_width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    chars[..fitting_prefix(&chars, max_width)].iter().collect()
}

/// Left-justify to `min_width` cells; never truncates
pub fn pad_right(s: &str, min_width: usize) -> String {
    let current = width(s);
    if current >= min_width {
        return s.to_string();
    }
    let mut padded = String::with_capacity(s.len() + min_width - current);
    padded.push_str(s);
    padded.extend(std::iter::repeat(' ').take(min_width - current));
    padded
}

/// Truncate then pad so the result is exactly `exact_width` cells
pub fn fit(s: &str, exact_width: usize) -> String {
    pad_right(&truncate(s, exact_width), exact_width)
}

/// Shorten `msg` to fit `size` cells, preferring to break on a word boundary
///
/// A word is only split mid-way when at least `min_word_length` of it would
/// remain visible; otherwise the crop falls back to the previous space, or to
/// an empty string when there is none. Trailing commas and periods are
/// dropped before the ending is applied. The result never exceeds `size`.
pub fn crop(msg: &str, size: usize, min_word_length: usize, ending: Ending) -> String {
    if width(msg) <= size {
        return msg.to_string();
    }

    let (room, min_word) = match ending {
        Ending::Ellipsis => {
            if size < 3 {
                return String::new();
            }
            (size - 3, min_word_length)
        }
        Ending::Hyphen if min_word_length > 0 => (size, min_word_length + 1),
        Ending::Hyphen => (size, 0),
    };

    let chars: Vec<char> = msg.chars().collect();
    let cut = fitting_prefix(&chars, room);
    let search_end = (cut + 1).min(chars.len());

    let (include_crop, word_break) = match chars[..search_end].iter().rposition(|c| *c == ' ') {
        None => {
            if room < min_word {
                return String::new();
            }
            (true, 0)
        }
        Some(idx) => {
            let kept: String = chars[..idx].iter().collect();
            let kept_len = kept.trim_end().chars().count();
            let leftover = room as isize - kept_len as isize - 1;
            (leftover >= min_word as isize, kept_len)
        }
    };

    let mut cropped: String = if include_crop {
        let kept: String = chars[..cut].iter().collect();
        match ending {
            Ending::Hyphen => {
                let mut kept_chars = kept.chars();
                if kept_chars.next_back().is_none() {
                    return String::new();
                }
                format!("{}-", kept_chars.as_str().trim_end())
            }
            Ending::Ellipsis => kept,
        }
    } else {
        chars[..word_break].iter().collect()
    };

    if cropped.ends_with(',') || cropped.ends_with('.') {
        cropped.pop();
    }

    if ending == Ending::Ellipsis {
        cropped = format!("{}...", cropped.trim_end());
    }

    cropped
}

const TIME_UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Short label for a duration with one decimal, rounded down ("5.0s", "1.5m")
pub fn time_label(seconds: u64) -> String {
    let (unit, label) = TIME_UNITS
        .iter()
        .copied()
        .find(|(unit, _)| seconds >= *unit)
        .unwrap_or((1, "s"));

    let tenths = seconds.saturating_mul(10) / unit;
    format!("{}.{}{}", tenths / 10, tenths % 10, label)
}

/// Age column: legacy marker followed by a right-aligned five cell label
pub fn age_label(seconds: u64, is_legacy: bool) -> String {
    let prefix = if is_legacy { '+' } else { ' ' };
    let mut label = time_label(seconds);

    if width(&label) > 5 {
        // drop the decimal before giving up on the unit
        let (unit, suffix) = TIME_UNITS
            .iter()
            .copied()
            .find(|(unit, _)| seconds >= *unit)
            .unwrap_or((1, "s"));
        label = format!("{}{}", seconds / unit, suffix);
    }

    format!("{}{:>5}", prefix, truncate(&label, 5))
}
