use shared::{SpeechStyle, TextState};
use std::sync::Arc;
use tracing::debug;

use super::lines::{LineModel, NewlineLines, SingleLine};
use super::messages::{MessageCatalog, MessageKey};
use super::prefs::EchoPreferences;
use super::text::{
    char_at, common_prefix_len, common_suffix_len, is_blank_line, is_word_break_char, substr,
    tail,
};
use crate::output::SpeechSink;

pub const DEFAULT_MAX_SHORT_PHRASE_LEN: usize = 60;

/// Most characters a single IME keystroke can rewrite inside a composition.
const MAX_IME_KEYSTROKE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    pub is_password: bool,
    pub multiline: bool,
    /// Text up to this length is read in full when an edit cannot be
    /// classified.
    pub max_short_phrase_len: usize,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            is_password: false,
            multiline: false,
            max_short_phrase_len: DEFAULT_MAX_SHORT_PHRASE_LEN,
        }
    }
}

/// Tracks one editable field and describes each change to it.
///
/// The tracker keeps the last adopted snapshot and compares every new one
/// against it. It never mutates past snapshots. One tracker belongs to one
/// field and is driven from a single context.
pub struct EditableTextTracker {
    current: TextState,
    options: TrackerOptions,
    last_change_described: bool,
    lines: Box<dyn LineModel>,
    prefs: Arc<dyn EchoPreferences>,
    messages: Arc<dyn MessageCatalog>,
}

impl EditableTextTracker {
    pub fn new(
        initial: TextState,
        options: TrackerOptions,
        prefs: Arc<dyn EchoPreferences>,
        messages: Arc<dyn MessageCatalog>,
    ) -> Self {
        let lines: Box<dyn LineModel> = if options.multiline {
            Box::new(NewlineLines)
        } else {
            Box::new(SingleLine)
        };

        Self {
            current: initial,
            options,
            last_change_described: false,
            lines,
            prefs,
            messages,
        }
    }

    pub fn with_line_model(mut self, lines: impl LineModel + 'static) -> Self {
        self.lines = Box::new(lines);
        self
    }

    pub fn current(&self) -> &TextState {
        &self.current
    }

    pub fn value(&self) -> &str {
        self.current.text()
    }

    pub fn selection_start(&self) -> usize {
        self.current.selection_start()
    }

    pub fn selection_end(&self) -> usize {
        self.current.selection_end()
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Whether the most recent `process_change` call got past the no-op
    /// check.
    pub fn last_change_described(&self) -> bool {
        self.last_change_described
    }

    /// Describes the transition from the current snapshot to `evt`, then
    /// adopts `evt`.
    pub fn process_change(&mut self, evt: TextState, sink: &mut dyn SpeechSink) {
        if evt.same_content(&self.current) {
            debug!("Snapshot unchanged, nothing to describe");
            self.last_change_described = false;
            return;
        }

        if evt.chars() == self.current.chars() {
            self.describe_selection_changed(&evt, sink);
        } else {
            let prev = self.current.clone().with_triggered_by_user(true);
            self.describe_text_changed(&prev, &evt, sink);
        }
        self.last_change_described = true;

        self.current = evt;
    }

    fn message(&self, key: MessageKey) -> String {
        self.messages.message(key)
    }

    fn describe_selection_changed(&self, evt: &TextState, sink: &mut dyn SpeechSink) {
        let user = evt.triggered_by_user();
        let nav = SpeechStyle::nav();

        if self.options.is_password {
            speak(sink, &self.message(MessageKey::PasswordChar), user, nav);
            return;
        }

        let value = self.current.chars();
        let old_start = self.current.selection_start();
        let old_end = self.current.selection_end();
        let start = evt.selection_start();
        let end = evt.selection_end();

        if evt.is_cursor() {
            if old_start != old_end {
                debug!("Selection collapsed to a caret");
                speak(sink, &substr(value, old_start, old_end - old_start), user, nav);
                speak(sink, &self.message(MessageKey::RemovedFromSelection), false, nav);
            } else if self.lines.line_index(value, old_start) != self.lines.line_index(value, start)
            {
                let line = self.lines.line_text(value, self.lines.line_index(value, start));
                debug!("Caret moved to another line");
                let line = if line.is_empty() {
                    self.message(MessageKey::TextBoxBlank)
                } else if line == "\n" {
                    // Spoken as-is so the synthesizer announces a new line.
                    line
                } else if is_blank_line(&line) {
                    self.message(MessageKey::TextBoxWhitespace)
                } else {
                    line
                };
                speak(sink, &line, user, nav);
            } else if old_start.abs_diff(start) == 1 {
                if start == value.len() {
                    speak(sink, &self.message(MessageKey::EndOfTextVerbose), user, nav);
                } else {
                    speak(sink, &substr(value, start, 1), user, SpeechStyle::phonetic(user));
                }
            } else {
                speak(
                    sink,
                    &substr(value, old_start.min(start), old_start.abs_diff(start)),
                    user,
                    nav,
                );
            }
            return;
        }

        if old_start + 1 == start && old_end == value.len() && end == value.len() {
            debug!("Typed character completed by autocomplete selection");
            if self.prefs.typing_echo().echoes_characters() {
                speak(sink, &substr(value, old_start, 1), user, nav);
            }
            speak(sink, &tail(value, start), false, nav);
        } else if old_start == old_end {
            speak(sink, &substr(value, start, end - start), user, nav);
            speak(sink, &self.message(MessageKey::Selected), false, nav);
        } else if old_start == start && old_end < end {
            speak(sink, &substr(value, old_end, end - old_end), user, nav);
            speak(sink, &self.message(MessageKey::AddedToSelection), false, nav);
        } else if old_start == start && old_end > end {
            speak(sink, &substr(value, end, old_end - end), user, nav);
            speak(sink, &self.message(MessageKey::RemovedFromSelection), false, nav);
        } else if old_end == end && old_start > start {
            speak(sink, &substr(value, start, old_start - start), user, nav);
            speak(sink, &self.message(MessageKey::AddedToSelection), false, nav);
        } else if old_end == end && old_start < start {
            speak(sink, &substr(value, old_start, start - old_start), user, nav);
            speak(sink, &self.message(MessageKey::RemovedFromSelection), false, nav);
        } else {
            debug!("Unrelated new selection");
            speak(sink, &substr(value, start, end - start), user, nav);
            speak(sink, &self.message(MessageKey::Selected), false, nav);
        }
    }

    fn describe_text_changed(&self, prev: &TextState, evt: &TextState, sink: &mut dyn SpeechSink) {
        let style = if evt.len() + 1 < prev.len() {
            SpeechStyle::deleted()
        } else {
            SpeechStyle::nav()
        };

        if self.options.is_password {
            speak(
                sink,
                &self.message(MessageKey::PasswordChar),
                evt.triggered_by_user(),
                style,
            );
            return;
        }

        // A selection running to the end of the text is treated as an
        // autocompleted tail and set aside while diffing.
        let truncated;
        let mut autocomplete_suffix = None;
        let working = if !evt.is_cursor() && evt.selection_end() == evt.len() {
            autocomplete_suffix = Some(tail(evt.chars(), evt.selection_start()));
            truncated = evt.truncated_at_selection_start();
            &truncated
        } else {
            evt
        };
        let autocomplete = autocomplete_suffix.as_deref();

        let common_prefix = common_prefix_len(working.chars(), prev.chars());
        let common_suffix = common_suffix_len(working.chars(), prev.chars());

        // The previous selection (possibly empty) was replaced by typed or
        // pasted text.
        let prefix_len = prev.selection_start();
        let suffix_len = prev.len() - prev.selection_end();
        let new_selection_len = working.selection_end() - working.selection_start();
        if working.len() >= prefix_len + suffix_len + new_selection_len
            && common_prefix >= prefix_len
            && common_suffix >= suffix_len
        {
            debug!("Selection replaced by typed or pasted text");
            self.describe_text_changed_helper(
                prev,
                working,
                prefix_len,
                suffix_len,
                autocomplete,
                style,
                sink,
            );
            return;
        }

        // Backspace, forward delete, word and line deletes.
        let prefix_len = working.selection_start();
        let suffix_len = working.len() - working.selection_end();
        if prev.is_cursor()
            && working.is_cursor()
            && common_prefix >= prefix_len
            && common_suffix >= suffix_len
        {
            if prev.selection_start() == working.selection_start() {
                if let Some(ch) = char_at(working.chars(), working.selection_start()) {
                    debug!("Forward delete, reading the character under the caret");
                    speak(
                        sink,
                        &ch.to_string(),
                        working.triggered_by_user(),
                        SpeechStyle::nav(),
                    );
                    return;
                }
            }
            debug!("Deletion at the caret");
            self.describe_text_changed_helper(
                prev,
                working,
                prefix_len,
                suffix_len,
                autocomplete,
                style,
                sink,
            );
            return;
        }

        if self.describe_text_changed_by_ime(prev, working, common_prefix, common_suffix, sink) {
            return;
        }

        // Not a standard edit: describe from the text alone, using the
        // original snapshot including any autocompleted tail.
        self.describe_nonstandard_change(prev, evt, style, sink);
    }

    fn describe_nonstandard_change(
        &self,
        prev: &TextState,
        evt: &TextState,
        style: SpeechStyle,
        sink: &mut dyn SpeechSink,
    ) {
        let old = prev.chars();
        let new = evt.chars();
        let len = old.len();
        let new_len = new.len();
        let common_prefix = common_prefix_len(new, old);
        let common_suffix = common_suffix_len(new, old);
        let user = evt.triggered_by_user();

        if new_len == len + 1 {
            if common_prefix >= len {
                speak(sink, &tail(new, new_len - 1), user, style);
                return;
            }
            if common_suffix >= len {
                speak(sink, &substr(new, 0, 1), user, style);
                return;
            }
        } else if new_len + 1 == len {
            let deleted = SpeechStyle {
                deleted: true,
                ..style
            };
            if common_prefix >= new_len {
                speak(sink, &tail(old, len - 1), user, deleted);
                return;
            }
            if common_suffix >= new_len {
                speak(sink, &substr(old, 0, 1), user, deleted);
                return;
            }
        }

        if self.options.multiline {
            // Multi-line editors often rewrite whole chunks; announcing them
            // would read far more than was typed.
            debug!("Unclassified multi-line edit left silent");
            return;
        }

        if new_len <= self.options.max_short_phrase_len {
            debug!("Unclassified edit of short text, reading it in full");
            self.describe_text_changed_helper(prev, evt, 0, 0, None, style, sink);
            return;
        }

        // Speak only the changed region, widened to whole words.
        let mut prefix_len = common_prefix;
        while prefix_len > 0 && !is_word_break_char(old[prefix_len - 1]) {
            prefix_len -= 1;
        }

        let mut suffix_len = 0;
        while suffix_len < len - prefix_len
            && suffix_len < new_len - prefix_len
            && old[len - suffix_len - 1] == new[new_len - suffix_len - 1]
        {
            suffix_len += 1;
        }
        while suffix_len > 0 && !is_word_break_char(old[len - suffix_len]) {
            suffix_len -= 1;
        }

        debug!(
            prefix_len,
            suffix_len, "Unclassified edit of long text, reading changed words"
        );
        self.describe_text_changed_helper(prev, evt, prefix_len, suffix_len, None, style, sink);
    }

    /// Speaks what went in and out between a kept prefix and suffix.
    #[allow(clippy::too_many_arguments)]
    fn describe_text_changed_helper(
        &self,
        prev: &TextState,
        evt: &TextState,
        prefix_len: usize,
        suffix_len: usize,
        autocomplete: Option<&str>,
        style: SpeechStyle,
        sink: &mut dyn SpeechSink,
    ) {
        let kept = prefix_len + suffix_len;
        let deleted_len = prev.len().saturating_sub(kept);
        let inserted_len = evt.len().saturating_sub(kept);
        let deleted = substr(prev.chars(), prefix_len, deleted_len);
        let inserted = substr(evt.chars(), prefix_len, inserted_len);
        let typing_echo = self.prefs.typing_echo();

        let mut style = style;
        let mut triggered_by_user = evt.triggered_by_user();
        let mut utterance = String::new();

        if inserted_len > 1 {
            if !self.prefs.speak_insertions() {
                debug!("Insertion of {} characters suppressed", inserted_len);
                return;
            }
            utterance = inserted;
        } else if inserted_len == 1 {
            let text = evt.chars();
            let completes_word = typing_echo.echoes_words()
                && is_word_break_char(text[prefix_len])
                && prefix_len > 0
                && !is_word_break_char(text[prefix_len - 1]);

            if completes_word {
                let mut index = prefix_len;
                while index > 0 && !is_word_break_char(text[index - 1]) {
                    index -= 1;
                }
                utterance = substr(text, index, prefix_len - index);
                triggered_by_user = false;
            } else if typing_echo.echoes_characters() {
                utterance = inserted;
            }
        } else if deleted_len > 1 && autocomplete.is_none() {
            utterance = format!("{}, deleted", deleted);
        } else if deleted_len == 1 {
            utterance = deleted;
            style.deleted = true;
        }

        match autocomplete {
            Some(suffix) if utterance.is_empty() => {
                speak(sink, suffix, triggered_by_user, style);
            }
            Some(suffix) => {
                speak(sink, &utterance, triggered_by_user, style);
                speak(sink, suffix, false, SpeechStyle::nav());
            }
            None => speak(sink, &utterance, triggered_by_user, style),
        }
    }

    /// Handles edits made inside an IME composition. Returns whether the
    /// change was recognised.
    fn describe_text_changed_by_ime(
        &self,
        prev: &TextState,
        evt: &TextState,
        common_prefix: usize,
        common_suffix: usize,
        sink: &mut dyn SpeechSink,
    ) -> bool {
        if !prev.is_cursor() || !evt.is_cursor() {
            return false;
        }

        let caret = evt.selection_start();
        let prev_suffix_len = prev.len() - prev.selection_end();
        let suffix_len = evt.len() - evt.selection_end();
        let relaxed_prefix_len = prev
            .selection_start()
            .saturating_sub(MAX_IME_KEYSTROKE_LEN);

        if prev_suffix_len == suffix_len
            && (relaxed_prefix_len..caret).contains(&common_prefix)
            && common_suffix >= suffix_len
        {
            debug!("Composition text updated");
            if self.prefs.typing_echo().echoes_characters() {
                speak(
                    sink,
                    &substr(evt.chars(), common_prefix, caret - common_prefix),
                    evt.triggered_by_user(),
                    SpeechStyle::nav(),
                );
            }
            return true;
        }

        if caret < prev.selection_start()
            && evt.len() > caret + prev_suffix_len
            && common_prefix >= caret
            && common_suffix >= prev_suffix_len
        {
            debug!("IME candidate inserted");
            let inserted_len = evt.len() - caret - prev_suffix_len;
            speak(
                sink,
                &substr(evt.chars(), caret, inserted_len),
                evt.triggered_by_user(),
                SpeechStyle::phonetic(true),
            );
            return true;
        }

        false
    }
}

fn speak(sink: &mut dyn SpeechSink, text: &str, triggered_by_user: bool, style: SpeechStyle) {
    if text.is_empty() {
        return;
    }
    sink.speak(text, triggered_by_user, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::messages::EnglishMessages;
    use crate::describe::prefs::EchoSettings;
    use crate::output::UtteranceBuffer;
    use shared::{QueueMode, TypingEcho};

    fn state(text: &str, start: usize, end: usize) -> TextState {
        TextState::new(text, start, end, true).unwrap()
    }

    fn tracker(initial: TextState, echo: TypingEcho) -> EditableTextTracker {
        tracker_with(initial, echo, TrackerOptions::default())
    }

    fn tracker_with(
        initial: TextState,
        echo: TypingEcho,
        options: TrackerOptions,
    ) -> EditableTextTracker {
        EditableTextTracker::new(initial, options, Arc::new(echo), Arc::new(EnglishMessages))
    }

    fn spoken(tracker: &mut EditableTextTracker, evt: TextState) -> UtteranceBuffer {
        let mut buffer = UtteranceBuffer::new();
        tracker.process_change(evt, &mut buffer);
        buffer
    }

    #[test]
    fn test_adopts_new_state() {
        let mut t = tracker(state("ab", 2, 2), TypingEcho::Character);
        spoken(&mut t, state("abc", 3, 3));
        assert_eq!(t.value(), "abc");
        assert_eq!(t.selection_start(), 3);
        assert_eq!(t.selection_end(), 3);
        assert!(t.last_change_described());
    }

    #[test]
    fn test_trigger_only_change_is_a_no_op() {
        let mut t = tracker(state("ab", 1, 1), TypingEcho::Character);
        let buffer = spoken(&mut t, TextState::cursor("ab", 1, false).unwrap());
        assert!(buffer.is_empty());
        assert!(!t.last_change_described());
    }

    #[test]
    fn test_caret_move_by_one_reads_character_phonetically() {
        let mut t = tracker(state("abc", 0, 0), TypingEcho::Character);
        let buffer = spoken(&mut t, state("abc", 1, 1));
        assert_eq!(buffer.texts(), vec!["b"]);
        assert!(buffer.utterances()[0].style.phonetic_characters);
        assert_eq!(buffer.utterances()[0].queue_mode, QueueMode::Flush);
    }

    #[test]
    fn test_programmatic_caret_move_is_not_phonetic() {
        let mut t = tracker(state("abc", 2, 2), TypingEcho::Character);
        let buffer = spoken(&mut t, TextState::cursor("abc", 1, false).unwrap());
        assert_eq!(buffer.texts(), vec!["b"]);
        assert!(!buffer.utterances()[0].style.phonetic_characters);
        assert_eq!(buffer.utterances()[0].queue_mode, QueueMode::Queue);
    }

    #[test]
    fn test_caret_move_to_end_of_text() {
        let mut t = tracker(state("abc", 2, 2), TypingEcho::Character);
        let buffer = spoken(&mut t, state("abc", 3, 3));
        assert_eq!(buffer.texts(), vec!["end of text"]);
    }

    #[test]
    fn test_caret_jump_reads_crossed_characters() {
        let mut t = tracker(state("hello world", 11, 11), TypingEcho::Character);
        let buffer = spoken(&mut t, state("hello world", 6, 6));
        assert_eq!(buffer.texts(), vec!["world"]);

        let buffer = spoken(&mut t, state("hello world", 11, 11));
        assert_eq!(buffer.texts(), vec!["world"]);
    }

    #[test]
    fn test_caret_moves_between_lines() {
        let text = "first\n\n   \nlast";
        let options = TrackerOptions {
            multiline: true,
            ..TrackerOptions::default()
        };
        let mut t = tracker_with(state(text, 0, 0), TypingEcho::Character, options);

        assert_eq!(spoken(&mut t, state(text, 6, 6)).texts(), vec!["blank"]);
        assert_eq!(spoken(&mut t, state(text, 7, 7)).texts(), vec!["space"]);
        assert_eq!(spoken(&mut t, state(text, 11, 11)).texts(), vec!["last"]);
        assert_eq!(spoken(&mut t, state(text, 2, 2)).texts(), vec!["first"]);
    }

    struct LiteralNewlines;

    impl LineModel for LiteralNewlines {
        fn line_index(&self, text: &[char], offset: usize) -> usize {
            NewlineLines.line_index(text, offset)
        }

        fn line_text(&self, _text: &[char], _index: usize) -> String {
            "\n".to_string()
        }
    }

    #[test]
    fn test_newline_line_is_spoken_literally() {
        let mut t = tracker(state("a\n\nb", 0, 0), TypingEcho::Character)
            .with_line_model(LiteralNewlines);
        let buffer = spoken(&mut t, state("a\n\nb", 2, 2));
        assert_eq!(buffer.texts(), vec!["\n"]);
    }

    #[test]
    fn test_selection_extended_and_shrunk() {
        let text = "hello world";
        let mut t = tracker(state(text, 0, 5), TypingEcho::Character);

        let buffer = spoken(&mut t, state(text, 0, 11));
        assert_eq!(buffer.texts(), vec![" world", "added to selection"]);
        assert_eq!(buffer.utterances()[1].queue_mode, QueueMode::Queue);

        let buffer = spoken(&mut t, state(text, 0, 8));
        assert_eq!(buffer.texts(), vec!["rld", "removed from selection"]);
    }

    #[test]
    fn test_selection_start_moves() {
        let text = "hello world";
        let mut t = tracker(state(text, 6, 11), TypingEcho::Character);

        let buffer = spoken(&mut t, state(text, 0, 11));
        assert_eq!(buffer.texts(), vec!["hello ", "added to selection"]);

        let buffer = spoken(&mut t, state(text, 3, 11));
        assert_eq!(buffer.texts(), vec!["hel", "removed from selection"]);
    }

    #[test]
    fn test_unrelated_selection() {
        let text = "hello world";
        let mut t = tracker(state(text, 0, 2), TypingEcho::Character);
        let buffer = spoken(&mut t, state(text, 6, 8));
        assert_eq!(buffer.texts(), vec!["wo", "selected"]);
    }

    #[test]
    fn test_autocomplete_selection_advances() {
        let text = "abcdef";
        let mut t = tracker(state(text, 2, 6), TypingEcho::Character);
        let buffer = spoken(&mut t, state(text, 3, 6));
        assert_eq!(buffer.texts(), vec!["c", "def"]);

        let mut t = tracker(state(text, 2, 6), TypingEcho::Word);
        let buffer = spoken(&mut t, state(text, 3, 6));
        assert_eq!(buffer.texts(), vec!["def"]);
    }

    #[test]
    fn test_backspace_speaks_deleted_character() {
        let mut t = tracker(state("cats", 4, 4), TypingEcho::Character);
        let buffer = spoken(&mut t, state("cat", 3, 3));
        assert_eq!(buffer.texts(), vec!["s"]);
        assert!(buffer.utterances()[0].style.deleted);
    }

    #[test]
    fn test_forward_delete_reads_next_character() {
        let mut t = tracker(state("abcd", 1, 1), TypingEcho::Character);
        let buffer = spoken(&mut t, state("acd", 1, 1));
        assert_eq!(buffer.texts(), vec!["c"]);
        assert!(!buffer.utterances()[0].style.deleted);
    }

    #[test]
    fn test_forward_delete_at_end_describes_deletion() {
        let mut t = tracker(state("hello world", 5, 5), TypingEcho::Character);
        let buffer = spoken(&mut t, state("hello", 5, 5));
        assert_eq!(buffer.texts(), vec![" world, deleted"]);
        assert!(buffer.utterances()[0].style.deleted);
    }

    #[test]
    fn test_selection_replaced_by_paste() {
        let mut t = tracker(state("hello world", 6, 11), TypingEcho::Character);
        let buffer = spoken(&mut t, state("hello there", 11, 11));
        assert_eq!(buffer.texts(), vec!["there"]);
    }

    #[test]
    fn test_speak_insertions_off_suppresses_paste() {
        let settings = Arc::new(EchoSettings::new(TypingEcho::Character, false));
        let mut t = EditableTextTracker::new(
            state("ab", 2, 2),
            TrackerOptions::default(),
            settings.clone(),
            Arc::new(EnglishMessages),
        );
        assert!(spoken(&mut t, state("abcdef", 6, 6)).is_empty());
        assert!(t.last_change_described());

        settings.set_speak_insertions(true);
        assert_eq!(spoken(&mut t, state("abcdefgh", 8, 8)).texts(), vec!["gh"]);
    }

    #[test]
    fn test_autocomplete_after_paste_follows_speak_insertions() {
        let settings = Arc::new(EchoSettings::new(TypingEcho::Character, false));
        let mut t = EditableTextTracker::new(
            state("a", 1, 1),
            TrackerOptions::default(),
            settings.clone(),
            Arc::new(EnglishMessages),
        );
        assert!(spoken(&mut t, state("abcdef", 3, 6)).is_empty());

        settings.set_speak_insertions(true);
        let mut t = EditableTextTracker::new(
            state("a", 1, 1),
            TrackerOptions::default(),
            settings,
            Arc::new(EnglishMessages),
        );
        let buffer = spoken(&mut t, state("abcdef", 3, 6));
        assert_eq!(buffer.texts(), vec!["bc", "def"]);
        assert_eq!(buffer.utterances()[1].queue_mode, QueueMode::Queue);
    }

    #[test]
    fn test_autocomplete_after_long_deletion_speaks_only_suggestion() {
        let mut t = tracker(state("hello world", 11, 11), TypingEcho::Character);
        let buffer = spoken(&mut t, state("help", 3, 4));
        assert_eq!(buffer.texts(), vec!["p"]);
        assert!(buffer.utterances()[0].style.deleted);
        assert_eq!(buffer.utterances()[0].queue_mode, QueueMode::Flush);
        assert_eq!(t.value(), "help");
    }

    #[test]
    fn test_typing_echo_is_read_on_every_change() {
        let settings = Arc::new(EchoSettings::new(TypingEcho::None, true));
        let mut t = EditableTextTracker::new(
            state("", 0, 0),
            TrackerOptions::default(),
            settings.clone(),
            Arc::new(EnglishMessages),
        );
        assert!(spoken(&mut t, state("a", 1, 1)).is_empty());

        settings.set_typing_echo(TypingEcho::Character);
        assert_eq!(spoken(&mut t, state("ab", 2, 2)).texts(), vec!["b"]);
    }

    #[test]
    fn test_character_and_word_echo() {
        let mut t = tracker(state("do", 2, 2), TypingEcho::CharacterAndWord);
        assert_eq!(spoken(&mut t, state("dog", 3, 3)).texts(), vec!["g"]);

        let buffer = spoken(&mut t, state("dog.", 4, 4));
        assert_eq!(buffer.texts(), vec!["dog"]);
        assert_eq!(buffer.utterances()[0].queue_mode, QueueMode::Queue);

        assert_eq!(spoken(&mut t, state("dog. ", 5, 5)).texts(), vec![" "]);
    }

    #[test]
    fn test_word_echo_in_middle_of_text() {
        let mut t = tracker(state("one two", 3, 3), TypingEcho::Word);
        assert!(spoken(&mut t, state("onex two", 4, 4)).is_empty());
        let buffer = spoken(&mut t, state("onex, two", 5, 5));
        assert_eq!(buffer.texts(), vec!["onex"]);
    }

    #[test]
    fn test_ime_composition_update() {
        let mut t = tracker(state("k", 1, 1), TypingEcho::Character);
        let buffer = spoken(&mut t, state("か", 1, 1));
        assert_eq!(buffer.texts(), vec!["か"]);

        let mut t = tracker(state("k", 1, 1), TypingEcho::None);
        assert!(spoken(&mut t, state("か", 1, 1)).is_empty());
        assert!(t.last_change_described());
    }

    #[test]
    fn test_ime_candidate_inserted_phonetically() {
        let mut t = tracker(state("xyz", 3, 3), TypingEcho::Character);
        let buffer = spoken(&mut t, state("x漢字", 1, 1));
        assert_eq!(buffer.texts(), vec!["漢字"]);
        assert!(buffer.utterances()[0].style.phonetic_characters);
    }

    #[test]
    fn test_nonstandard_single_character_changes() {
        let mut t = tracker(state("abc", 0, 0), TypingEcho::Character);
        assert_eq!(spoken(&mut t, state("abcd", 0, 0)).texts(), vec!["d"]);

        let mut t = tracker(state("abcd", 4, 4), TypingEcho::Character);
        let buffer = spoken(&mut t, state("bcd", 3, 3));
        assert_eq!(buffer.texts(), vec!["a"]);
        assert!(buffer.utterances()[0].style.deleted);
    }

    #[test]
    fn test_nonstandard_short_text_read_in_full() {
        let mut t = tracker(state("foo", 0, 0), TypingEcho::Character);
        let buffer = spoken(&mut t, state("bar baz", 0, 0));
        assert_eq!(buffer.texts(), vec!["bar baz"]);
    }

    #[test]
    fn test_nonstandard_multiline_stays_silent() {
        let options = TrackerOptions {
            multiline: true,
            ..TrackerOptions::default()
        };
        let mut t = tracker_with(state("foo", 0, 0), TypingEcho::Character, options);
        let buffer = spoken(&mut t, state("bar baz", 0, 0));
        assert!(buffer.is_empty());
        assert!(t.last_change_described());
    }

    #[test]
    fn test_password_selection_and_text_changes() {
        let options = TrackerOptions {
            is_password: true,
            ..TrackerOptions::default()
        };
        let mut t = tracker_with(state("hunter", 6, 6), TypingEcho::Character, options);
        assert_eq!(spoken(&mut t, state("hunter2", 7, 7)).texts(), vec!["dot"]);
        assert_eq!(spoken(&mut t, state("hunter2", 0, 7)).texts(), vec!["dot"]);

        let buffer = spoken(&mut t, state("", 0, 0));
        assert_eq!(buffer.texts(), vec!["dot"]);
        assert!(buffer.utterances()[0].style.deleted);
    }
}
