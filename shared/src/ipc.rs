use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::speech::Utterance;
use crate::text_state::{TextState, TypingEcho};

/// One request to the daemon. Sent as a single line of JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Command {
    Focus {
        field: String,
        #[serde(default)]
        password: bool,
        #[serde(default)]
        multiline: bool,
        state: TextState,
    },
    Change {
        field: String,
        state: TextState,
    },
    Blur {
        field: String,
    },
    SetTypingEcho(TypingEcho),
    SetSpeakInsertions(bool),
    Status,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Response {
    Ok,
    Error(String),
    Spoken(ChangeReport),
    Status(StatusInfo),
}

/// What the daemon said about one snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChangeReport {
    pub described: bool,
    pub utterances: Vec<Utterance>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusInfo {
    pub is_running: bool,
    pub typing_echo: TypingEcho,
    pub speak_insertions: bool,
    pub tracked_fields: Vec<String>,
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection refused: is keyechod running?")]
    ConnectionRefused,

    #[error("Connection timeout")]
    Timeout,

    #[error("Connection closed by daemon")]
    Closed,
}

/// `$XDG_RUNTIME_DIR/keyechod.sock`, or `/tmp/keyechod.sock` without one.
pub fn default_socket_path() -> PathBuf {
    match dirs::runtime_dir() {
        Some(runtime_dir) => runtime_dir.join("keyechod.sock"),
        None => PathBuf::from("/tmp/keyechod.sock"),
    }
}
