//! Character-level helpers over `&[char]` slices.
//!
//! Offsets are counts of Unicode scalar values, matching `TextState`.

/// Length of the longest shared prefix of `a` and `b`.
pub fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Length of the longest shared suffix of `a` and `b`.
///
/// Computed independently of the prefix, so on short strings the two may
/// overlap.
pub fn common_suffix_len(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Anything that is not part of a word: whitespace, punctuation, symbols.
pub fn is_word_break_char(ch: char) -> bool {
    !(ch.is_alphanumeric() || ch == '_')
}

/// `len` characters starting at `start`, clamped to the slice.
pub fn substr(chars: &[char], start: usize, len: usize) -> String {
    let start = start.min(chars.len());
    let end = start.saturating_add(len).min(chars.len());
    chars[start..end].iter().collect()
}

/// Characters from `start` to the end.
pub fn tail(chars: &[char], start: usize) -> String {
    substr(chars, start, chars.len())
}

pub fn char_at(chars: &[char], index: usize) -> Option<char> {
    chars.get(index).copied()
}

/// Non-empty and made only of whitespace.
pub fn is_blank_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(char::is_whitespace)
}
