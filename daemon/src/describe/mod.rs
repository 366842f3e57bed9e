//! Turns consecutive snapshots of an editable field into spoken feedback.

pub mod lines;
pub mod messages;
pub mod prefs;
pub mod text;
pub mod tracker;

pub use lines::{LineModel, NewlineLines, SingleLine};
pub use messages::{EnglishMessages, MessageCatalog, MessageKey, OverlayCatalog};
pub use prefs::{EchoPreferences, EchoSettings};
pub use tracker::{EditableTextTracker, TrackerOptions, DEFAULT_MAX_SHORT_PHRASE_LEN};
