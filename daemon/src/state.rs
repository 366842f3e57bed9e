use shared::{ChangeReport, StatusInfo, TextState, TypingEcho};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::describe::{
    EchoPreferences, EchoSettings, EditableTextTracker, MessageCatalog, TrackerOptions,
};
use crate::output::{LogSink, UtteranceBuffer};
use crate::rate_limit::FieldRateLimiter;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("Field is not focused: {0}")]
    UnknownField(String),

    #[error("Too many changes for field {0}, snapshot dropped")]
    RateLimited(String),
}

/// Everything the daemon tracks: shared echo settings plus one tracker per
/// focused field.
pub struct DaemonState {
    pub config: Config,
    settings: Arc<EchoSettings>,
    messages: Arc<dyn MessageCatalog>,
    trackers: HashMap<String, EditableTextTracker>,
    rate_limiter: FieldRateLimiter,
}

impl DaemonState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let messages = config
            .message_catalog()
            .map_err(|e| anyhow::anyhow!("Invalid message overrides: {}", e))?;
        let settings = EchoSettings::new(config.echo.typing_echo, config.echo.speak_insertions);
        let rate_limiter = FieldRateLimiter::new(
            config.rate_limit.changes_per_second,
            config.rate_limit.burst_capacity,
            config.rate_limit.enabled,
        );
        if rate_limiter.is_enabled() {
            tracing::info!(
                "Rate limiting {} changes/s per field (burst {})",
                config.rate_limit.changes_per_second,
                config.rate_limit.burst_capacity
            );
        } else {
            tracing::info!("Rate limiting disabled");
        }

        Ok(Self {
            config,
            settings: Arc::new(settings),
            messages: Arc::new(messages),
            trackers: HashMap::new(),
            rate_limiter,
        })
    }

    pub fn tracker_options(&self, is_password: bool, multiline: bool) -> TrackerOptions {
        TrackerOptions {
            is_password,
            multiline,
            max_short_phrase_len: self.config.echo.max_short_phrase_len,
        }
    }

    /// Starts tracking `field` from `initial`, replacing any earlier tracker.
    pub fn focus(&mut self, field: String, options: TrackerOptions, initial: TextState) {
        let tracker = EditableTextTracker::new(
            initial,
            options,
            self.settings.clone(),
            self.messages.clone(),
        );
        if self.trackers.insert(field.clone(), tracker).is_some() {
            tracing::debug!("Replaced tracker for field '{}'", field);
        }
        tracing::info!(
            "Tracking field '{}' (password={}, multiline={})",
            field,
            options.is_password,
            options.multiline
        );
    }

    pub fn change(&mut self, field: &str, state: TextState) -> Result<ChangeReport, StateError> {
        let tracker = self
            .trackers
            .get_mut(field)
            .ok_or_else(|| StateError::UnknownField(field.to_string()))?;

        if !self.rate_limiter.check(field) {
            tracing::warn!("Rate limit exceeded for field '{}'", field);
            return Err(StateError::RateLimited(field.to_string()));
        }

        let mut buffer = UtteranceBuffer::new();
        if self.config.output.log_utterances {
            tracker.process_change(state, &mut LogSink::new(field, &mut buffer));
        } else {
            tracker.process_change(state, &mut buffer);
        }

        Ok(ChangeReport {
            described: tracker.last_change_described(),
            utterances: buffer.into_utterances(),
        })
    }

    /// Stops tracking `field`. Returns whether it was tracked.
    pub fn blur(&mut self, field: &str) -> bool {
        let removed = self.trackers.remove(field).is_some();
        if removed {
            self.rate_limiter.prune();
            tracing::info!("Stopped tracking field '{}'", field);
        }
        removed
    }

    pub fn tracker(&self, field: &str) -> Option<&EditableTextTracker> {
        self.trackers.get(field)
    }

    pub fn set_typing_echo(&self, typing_echo: TypingEcho) {
        self.settings.set_typing_echo(typing_echo);
    }

    pub fn set_speak_insertions(&self, enabled: bool) {
        self.settings.set_speak_insertions(enabled);
    }

    pub fn get_status(&self) -> StatusInfo {
        let mut tracked_fields: Vec<String> = self.trackers.keys().cloned().collect();
        tracked_fields.sort();
        StatusInfo {
            is_running: true,
            typing_echo: self.settings.typing_echo(),
            speak_insertions: self.settings.speak_insertions(),
            tracked_fields,
        }
    }
}
