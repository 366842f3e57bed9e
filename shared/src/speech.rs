use serde::{Deserialize, Serialize};

/// Queuing behaviour the host's speech engine should apply.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueueMode {
    /// Interrupt and flush pending speech of the same category.
    Flush,
    /// Enqueue after whatever is currently being spoken.
    Queue,
}

impl QueueMode {
    pub fn for_trigger(triggered_by_user: bool) -> Self {
        if triggered_by_user {
            QueueMode::Flush
        } else {
            QueueMode::Queue
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeechCategory {
    #[default]
    Nav,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeechStyle {
    pub category: SpeechCategory,
    /// Voice the text as removed content.
    #[serde(default)]
    pub deleted: bool,
    /// Pronounce the text character by character.
    #[serde(default)]
    pub phonetic_characters: bool,
}

impl SpeechStyle {
    pub fn nav() -> Self {
        Self::default()
    }

    pub fn deleted() -> Self {
        Self {
            deleted: true,
            ..Self::default()
        }
    }

    pub fn phonetic(phonetic_characters: bool) -> Self {
        Self {
            phonetic_characters,
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub queue_mode: QueueMode,
    pub style: SpeechStyle,
}

impl Utterance {
    pub fn new(text: impl Into<String>, triggered_by_user: bool, style: SpeechStyle) -> Self {
        Self {
            text: text.into(),
            queue_mode: QueueMode::for_trigger(triggered_by_user),
            style,
        }
    }
}
