pub mod config;
pub mod describe;
pub mod output;
pub mod rate_limit;
pub mod server;
pub mod state;

pub use describe::{EditableTextTracker, TrackerOptions};
pub use output::{SpeechSink, UtteranceBuffer};
pub use rate_limit::FieldRateLimiter;
pub use server::DaemonServer;
pub use state::DaemonState;
