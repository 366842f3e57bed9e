use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const NBSP: char = '\u{a0}';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextStateError {
    #[error("Selection {start}..{end} out of range for text of length {len}")]
    SelectionOutOfRange { start: usize, end: usize, len: usize },

    #[error("Unknown typing echo mode: {0}")]
    UnknownTypingEcho(String),
}

/// Snapshot of an editable field: its full text plus the selection.
///
/// Offsets count Unicode scalar values, not bytes. Construction normalizes
/// non-breaking spaces to plain spaces and orders the selection so that
/// `selection_start() <= selection_end()`; the anchor/focus direction is not
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTextState", into = "RawTextState")]
pub struct TextState {
    text: String,
    chars: Vec<char>,
    start: usize,
    end: usize,
    triggered_by_user: bool,
}

impl TextState {
    pub fn new(
        text: impl Into<String>,
        start: usize,
        end: usize,
        triggered_by_user: bool,
    ) -> Result<Self, TextStateError> {
        let mut text = text.into();
        if text.contains(NBSP) {
            text = text.replace(NBSP, " ");
        }
        let chars: Vec<char> = text.chars().collect();
        let (start, end) = if start > end { (end, start) } else { (start, end) };

        if end > chars.len() {
            return Err(TextStateError::SelectionOutOfRange {
                start,
                end,
                len: chars.len(),
            });
        }

        Ok(Self {
            text,
            chars,
            start,
            end,
            triggered_by_user,
        })
    }

    /// A state with a collapsed selection (plain caret) at `position`.
    pub fn cursor(
        text: impl Into<String>,
        position: usize,
        triggered_by_user: bool,
    ) -> Result<Self, TextStateError> {
        Self::new(text, position, position, triggered_by_user)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn selection_start(&self) -> usize {
        self.start
    }

    pub fn selection_end(&self) -> usize {
        self.end
    }

    pub fn triggered_by_user(&self) -> bool {
        self.triggered_by_user
    }

    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }

    /// True when text and selection match, regardless of who triggered them.
    pub fn same_content(&self, other: &TextState) -> bool {
        self.start == other.start && self.end == other.end && self.chars == other.chars
    }

    pub fn with_triggered_by_user(mut self, triggered_by_user: bool) -> Self {
        self.triggered_by_user = triggered_by_user;
        self
    }

    /// Drops everything from the selection start onward and leaves a caret
    /// there. Used to set aside an autocompleted tail before diffing.
    pub fn truncated_at_selection_start(&self) -> Self {
        let chars: Vec<char> = self.chars[..self.start].to_vec();
        Self {
            text: chars.iter().collect(),
            chars,
            start: self.start,
            end: self.start,
            triggered_by_user: self.triggered_by_user,
        }
    }
}

fn default_triggered_by_user() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "TextState")]
struct RawTextState {
    text: String,
    selection_start: usize,
    selection_end: usize,
    #[serde(default = "default_triggered_by_user")]
    triggered_by_user: bool,
}

impl TryFrom<RawTextState> for TextState {
    type Error = TextStateError;

    fn try_from(raw: RawTextState) -> Result<Self, Self::Error> {
        TextState::new(
            raw.text,
            raw.selection_start,
            raw.selection_end,
            raw.triggered_by_user,
        )
    }
}

impl From<TextState> for RawTextState {
    fn from(state: TextState) -> Self {
        Self {
            text: state.text,
            selection_start: state.start,
            selection_end: state.end,
            triggered_by_user: state.triggered_by_user,
        }
    }
}

/// How much of the user's own typing is spoken back.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypingEcho {
    #[default]
    Character,
    Word,
    CharacterAndWord,
    None,
}

impl TypingEcho {
    pub fn echoes_characters(self) -> bool {
        matches!(self, TypingEcho::Character | TypingEcho::CharacterAndWord)
    }

    pub fn echoes_words(self) -> bool {
        matches!(self, TypingEcho::Word | TypingEcho::CharacterAndWord)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypingEcho::Character => "character",
            TypingEcho::Word => "word",
            TypingEcho::CharacterAndWord => "character_and_word",
            TypingEcho::None => "none",
        }
    }
}

impl fmt::Display for TypingEcho {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypingEcho {
    type Err = TextStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "character" | "char" => Ok(TypingEcho::Character),
            "word" => Ok(TypingEcho::Word),
            "character_and_word" | "both" => Ok(TypingEcho::CharacterAndWord),
            "none" | "off" => Ok(TypingEcho::None),
            _ => Err(TextStateError::UnknownTypingEcho(s.to_string())),
        }
    }
}
