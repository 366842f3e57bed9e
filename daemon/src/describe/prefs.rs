use shared::TypingEcho;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Process-wide echo preferences, read afresh on every decision.
pub trait EchoPreferences: Send + Sync {
    fn typing_echo(&self) -> TypingEcho;

    /// Whether insertions longer than one character are spoken at all.
    fn speak_insertions(&self) -> bool;
}

/// A fixed echo mode that always speaks insertions.
impl EchoPreferences for TypingEcho {
    fn typing_echo(&self) -> TypingEcho {
        *self
    }

    fn speak_insertions(&self) -> bool {
        true
    }
}

/// Runtime-adjustable preferences shared by every tracker in the process.
#[derive(Debug)]
pub struct EchoSettings {
    typing_echo: AtomicU8,
    speak_insertions: AtomicBool,
}

impl EchoSettings {
    pub fn new(typing_echo: TypingEcho, speak_insertions: bool) -> Self {
        Self {
            typing_echo: AtomicU8::new(encode(typing_echo)),
            speak_insertions: AtomicBool::new(speak_insertions),
        }
    }

    pub fn set_typing_echo(&self, typing_echo: TypingEcho) {
        tracing::info!("Typing echo set to {}", typing_echo);
        self.typing_echo.store(encode(typing_echo), Ordering::Relaxed);
    }

    pub fn set_speak_insertions(&self, enabled: bool) {
        tracing::info!("Speak insertions set to {}", enabled);
        self.speak_insertions.store(enabled, Ordering::Relaxed);
    }
}

impl Default for EchoSettings {
    fn default() -> Self {
        Self::new(TypingEcho::default(), true)
    }
}

impl EchoPreferences for EchoSettings {
    fn typing_echo(&self) -> TypingEcho {
        decode(self.typing_echo.load(Ordering::Relaxed))
    }

    fn speak_insertions(&self) -> bool {
        self.speak_insertions.load(Ordering::Relaxed)
    }
}

fn encode(typing_echo: TypingEcho) -> u8 {
    match typing_echo {
        TypingEcho::Character => 0,
        TypingEcho::Word => 1,
        TypingEcho::CharacterAndWord => 2,
        TypingEcho::None => 3,
    }
}

fn decode(value: u8) -> TypingEcho {
    match value {
        0 => TypingEcho::Character,
        1 => TypingEcho::Word,
        2 => TypingEcho::CharacterAndWord,
        _ => TypingEcho::None,
    }
}
