pub mod ipc;
pub mod speech;
pub mod text_state;

pub use ipc::{default_socket_path, ChangeReport, Command, IpcError, Response, StatusInfo};
pub use speech::{QueueMode, SpeechCategory, SpeechStyle, Utterance};
pub use text_state::{TextState, TextStateError, TypingEcho};
