use shared::ipc::{Command, Response};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::state::DaemonState;

pub struct DaemonServer {
    socket_path: PathBuf,
    state: Arc<Mutex<DaemonState>>,
}

impl DaemonServer {
    pub fn new(socket_path: PathBuf, state: Arc<Mutex<DaemonState>>) -> Self {
        Self { socket_path, state }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let socket_path = self.socket_path.clone();

        if socket_path.exists() {
            std::fs::remove_file(&socket_path)?;
        }

        info!("Starting socket server at {}", socket_path.display());

        let listener = UnixListener::bind(&socket_path)?;
        debug!("Listener bound successfully");

        let write_timeout = Duration::from_secs(
            self.state
                .lock()
                .await
                .config
                .timeouts
                .socket_operation_timeout_seconds,
        );

        loop {
            let state = Arc::clone(&self.state);
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("Connection accepted");
                    tokio::spawn(async move {
                        let result = Self::handle_connection(state, stream, write_timeout).await;
                        if let Err(e) = result {
                            error!("Error handling connection: {}", e);
                        } else {
                            debug!("Connection closed");
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }

    /// Serves newline-delimited JSON commands until the client hangs up.
    async fn handle_connection(
        state: Arc<Mutex<DaemonState>>,
        stream: UnixStream,
        write_timeout: Duration,
    ) -> anyhow::Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Command>(&line) {
                Ok(command) => {
                    debug!("Received command: {:?}", command);
                    Self::dispatch(&state, command).await
                }
                Err(e) => {
                    warn!("Rejected malformed command: {}", e);
                    Response::Error(format!("Invalid command: {}", e))
                }
            };

            let mut response_json = serde_json::to_vec(&response)?;
            response_json.push(b'\n');
            tokio::time::timeout(write_timeout, writer.write_all(&response_json))
                .await
                .map_err(|_| {
                    anyhow::anyhow!("Timed out writing response after {:?}", write_timeout)
                })??;

            debug!("Sent response: {:?}", response);
        }

        Ok(())
    }

    pub async fn dispatch(state: &Mutex<DaemonState>, command: Command) -> Response {
        let mut state = state.lock().await;

        match command {
            Command::Focus {
                field,
                password,
                multiline,
                state: initial,
            } => {
                let options = state.tracker_options(password, multiline);
                state.focus(field, options, initial);
                Response::Ok
            }
            Command::Change {
                field,
                state: snapshot,
            } => match state.change(&field, snapshot) {
                Ok(report) => Response::Spoken(report),
                Err(e) => Response::Error(e.to_string()),
            },
            Command::Blur { field } => {
                if state.blur(&field) {
                    Response::Ok
                } else {
                    Response::Error(format!("Field is not focused: {}", field))
                }
            }
            Command::SetTypingEcho(typing_echo) => {
                state.set_typing_echo(typing_echo);
                Response::Ok
            }
            Command::SetSpeakInsertions(enabled) => {
                state.set_speak_insertions(enabled);
                Response::Ok
            }
            Command::Status => Response::Status(state.get_status()),
        }
    }
}

impl Drop for DaemonServer {
    fn drop(&mut self) {
        if self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use shared::{TextState, TypingEcho};

    fn shared_state() -> Mutex<DaemonState> {
        Mutex::new(DaemonState::new(Config::default()).unwrap())
    }

    fn cursor(text: &str, at: usize) -> TextState {
        TextState::cursor(text, at, true).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_status() {
        let state = shared_state();
        match DaemonServer::dispatch(&state, Command::Status).await {
            Response::Status(info) => {
                assert!(info.is_running);
                assert!(info.tracked_fields.is_empty());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_change_without_focus() {
        let state = shared_state();
        let response = DaemonServer::dispatch(
            &state,
            Command::Change {
                field: "f".to_string(),
                state: cursor("a", 1),
            },
        )
        .await;
        assert_eq!(response, Response::Error("Field is not focused: f".to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_word_echo_flow() {
        let state = shared_state();
        let focus = Command::Focus {
            field: "f".to_string(),
            password: false,
            multiline: false,
            state: cursor("cat", 3),
        };
        assert_eq!(DaemonServer::dispatch(&state, focus).await, Response::Ok);
        assert_eq!(
            DaemonServer::dispatch(&state, Command::SetTypingEcho(TypingEcho::Word)).await,
            Response::Ok
        );

        let change = Command::Change {
            field: "f".to_string(),
            state: cursor("cat ", 4),
        };
        match DaemonServer::dispatch(&state, change).await {
            Response::Spoken(report) => {
                assert!(report.described);
                assert_eq!(report.utterances.len(), 1);
                assert_eq!(report.utterances[0].text, "cat");
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let blur = Command::Blur {
            field: "f".to_string(),
        };
        assert_eq!(DaemonServer::dispatch(&state, blur.clone()).await, Response::Ok);
        assert!(matches!(
            DaemonServer::dispatch(&state, blur).await,
            Response::Error(_)
        ));
    }
}
