use shared::{SpeechStyle, Utterance};
use tracing::info;

/// Receives everything the describer decides to say.
///
/// `triggered_by_user` selects interrupt-and-flush queuing when true and
/// enqueue-after-current-speech when false; see [`shared::QueueMode`].
pub trait SpeechSink {
    fn speak(&mut self, text: &str, triggered_by_user: bool, style: SpeechStyle);
}

impl<S: SpeechSink + ?Sized> SpeechSink for &mut S {
    fn speak(&mut self, text: &str, triggered_by_user: bool, style: SpeechStyle) {
        (**self).speak(text, triggered_by_user, style);
    }
}

/// Collects utterances in the order they were spoken.
#[derive(Debug, Default, Clone)]
pub struct UtteranceBuffer {
    utterances: Vec<Utterance>,
}

impl UtteranceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn texts(&self) -> Vec<&str> {
        self.utterances.iter().map(|u| u.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn into_utterances(self) -> Vec<Utterance> {
        self.utterances
    }
}

impl SpeechSink for UtteranceBuffer {
    fn speak(&mut self, text: &str, triggered_by_user: bool, style: SpeechStyle) {
        self.utterances
            .push(Utterance::new(text, triggered_by_user, style));
    }
}

/// Logs each utterance before handing it to the wrapped sink.
pub struct LogSink<'a, S: ?Sized> {
    field: &'a str,
    inner: &'a mut S,
}

impl<'a, S: SpeechSink + ?Sized> LogSink<'a, S> {
    pub fn new(field: &'a str, inner: &'a mut S) -> Self {
        Self { field, inner }
    }
}

impl<S: SpeechSink + ?Sized> SpeechSink for LogSink<'_, S> {
    fn speak(&mut self, text: &str, triggered_by_user: bool, style: SpeechStyle) {
        info!(
            field = self.field,
            deleted = style.deleted,
            phonetic = style.phonetic_characters,
            "Speak ({}): '{}'",
            if triggered_by_user { "flush" } else { "queue" },
            text
        );
        self.inner.speak(text, triggered_by_user, style);
    }
}
