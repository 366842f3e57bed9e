use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed phrases the describer speaks instead of field content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    PasswordChar,
    Selected,
    AddedToSelection,
    RemovedFromSelection,
    TextBoxBlank,
    TextBoxWhitespace,
    EndOfTextVerbose,
}

impl MessageKey {
    pub const ALL: [MessageKey; 7] = [
        MessageKey::PasswordChar,
        MessageKey::Selected,
        MessageKey::AddedToSelection,
        MessageKey::RemovedFromSelection,
        MessageKey::TextBoxBlank,
        MessageKey::TextBoxWhitespace,
        MessageKey::EndOfTextVerbose,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::PasswordChar => "password_char",
            MessageKey::Selected => "selected",
            MessageKey::AddedToSelection => "added_to_selection",
            MessageKey::RemovedFromSelection => "removed_from_selection",
            MessageKey::TextBoxBlank => "text_box_blank",
            MessageKey::TextBoxWhitespace => "text_box_whitespace",
            MessageKey::EndOfTextVerbose => "end_of_text_verbose",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown message key: {0}")]
pub struct UnknownMessageKey(pub String);

impl FromStr for MessageKey {
    type Err = UnknownMessageKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownMessageKey(s.to_string()))
    }
}

/// Resolves message keys to user-facing text. Phrases are opaque to the
/// describer.
pub trait MessageCatalog: Send + Sync {
    fn message(&self, key: MessageKey) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl MessageCatalog for EnglishMessages {
    fn message(&self, key: MessageKey) -> String {
        match key {
            MessageKey::PasswordChar => "dot",
            MessageKey::Selected => "selected",
            MessageKey::AddedToSelection => "added to selection",
            MessageKey::RemovedFromSelection => "removed from selection",
            MessageKey::TextBoxBlank => "blank",
            MessageKey::TextBoxWhitespace => "space",
            MessageKey::EndOfTextVerbose => "end of text",
        }
        .to_string()
    }
}

/// A base catalog with some phrases replaced, e.g. from the `[messages]`
/// config table.
pub struct OverlayCatalog<C> {
    base: C,
    overrides: HashMap<MessageKey, String>,
}

impl<C: MessageCatalog> OverlayCatalog<C> {
    pub fn new(base: C, overrides: &HashMap<String, String>) -> Result<Self, UnknownMessageKey> {
        let overrides = overrides
            .iter()
            .map(|(key, text)| key.parse::<MessageKey>().map(|key| (key, text.clone())))
            .collect::<Result<HashMap<_, _>, UnknownMessageKey>>()?;
        Ok(Self { base, overrides })
    }
}

impl<C: MessageCatalog> MessageCatalog for OverlayCatalog<C> {
    fn message(&self, key: MessageKey) -> String {
        match self.overrides.get(&key) {
            Some(text) => text.clone(),
            None => self.base.message(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in MessageKey::ALL {
            assert_eq!(key.as_str().parse::<MessageKey>().unwrap(), key);
            assert_eq!(key.to_string(), key.as_str());
        }
    }

    #[test]
    fn test_unknown_key() {
        let err = "bogus".parse::<MessageKey>().unwrap_err();
        assert_eq!(err, UnknownMessageKey("bogus".to_string()));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_english_messages() {
        assert_eq!(EnglishMessages.message(MessageKey::Selected), "selected");
        assert_eq!(
            EnglishMessages.message(MessageKey::RemovedFromSelection),
            "removed from selection"
        );
        for key in MessageKey::ALL {
            assert!(!EnglishMessages.message(key).is_empty());
        }
    }

    #[test]
    fn test_overlay_replaces_only_configured_keys() {
        let mut overrides = HashMap::new();
        overrides.insert("password_char".to_string(), "star".to_string());
        let catalog = OverlayCatalog::new(EnglishMessages, &overrides).unwrap();
        assert_eq!(catalog.message(MessageKey::PasswordChar), "star");
        assert_eq!(catalog.message(MessageKey::Selected), "selected");
    }

    #[test]
    fn test_overlay_rejects_unknown_keys() {
        let mut overrides = HashMap::new();
        overrides.insert("selcted".to_string(), "x".to_string());
        assert!(OverlayCatalog::new(EnglishMessages, &overrides).is_err());
    }
}
