mod client;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client::DaemonClient;
use shared::ipc::{Command, Response};
use shared::{QueueMode, TextState, TypingEcho, Utterance};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "keyecho")]
#[command(about = "CLI tool for the keyecho typing-echo daemon")]
struct Cli {
    /// Daemon socket; must match `[server] socket_path` when that is set
    #[arg(long, global = true, value_name = "PATH")]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a field from an initial snapshot
    Focus {
        field: String,
        #[arg(long)]
        password: bool,
        #[arg(long)]
        multiline: bool,
        #[arg(long, default_value = "")]
        text: String,
        /// Selection start; defaults to the end of the text
        #[arg(long)]
        start: Option<usize>,
        /// Selection end; defaults to the selection start
        #[arg(long)]
        end: Option<usize>,
    },
    /// Send a new snapshot of a tracked field and print what was spoken
    Change {
        field: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        start: Option<usize>,
        #[arg(long)]
        end: Option<usize>,
        /// Mark the change as programmatic rather than user-triggered
        #[arg(long)]
        not_user: bool,
    },
    /// Stop tracking a field
    Blur { field: String },
    /// Set the typing echo mode (character, word, character_and_word, none)
    Echo { mode: TypingEcho },
    /// Turn announcement of multi-character insertions on or off
    Insertions { state: Switch },
    Status,
    /// Send JSON-lines commands from a file over one connection
    Replay { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

fn snapshot(
    text: String,
    start: Option<usize>,
    end: Option<usize>,
    triggered_by_user: bool,
) -> Result<TextState> {
    let start = start.unwrap_or_else(|| text.chars().count());
    let end = end.unwrap_or(start);
    TextState::new(text, start, end, triggered_by_user).context("Invalid snapshot")
}

fn describe_utterance(utterance: &Utterance) -> String {
    let mode = match utterance.queue_mode {
        QueueMode::Flush => "flush",
        QueueMode::Queue => "queue",
    };
    let mut line = format!("  [{}] {:?}", mode, utterance.text);
    if utterance.style.deleted {
        line.push_str(" (deleted)");
    }
    if utterance.style.phonetic_characters {
        line.push_str(" (phonetic)");
    }
    line
}

/// Prints a response; returns false for daemon-reported errors.
fn print_response(response: &Response) -> bool {
    match response {
        Response::Ok => {
            println!("Success");
        }
        Response::Spoken(report) => {
            if !report.described {
                println!("No change");
            } else if report.utterances.is_empty() {
                println!("Nothing spoken");
            } else {
                println!("Spoken:");
                for utterance in &report.utterances {
                    println!("{}", describe_utterance(utterance));
                }
            }
        }
        Response::Status(info) => {
            println!("Status:");
            println!("  Running: {}", info.is_running);
            println!("  Typing echo: {}", info.typing_echo);
            println!("  Speak insertions: {}", info.speak_insertions);
            println!("  Tracked fields: {}", info.tracked_fields.join(", "));
        }
        Response::Error(msg) => {
            eprintln!("Error: {}", msg);
            return false;
        }
    }
    true
}

async fn replay(client: &DaemonClient, file: &Path) -> Result<bool> {
    let script = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut connection = client.connect().await?;
    let mut all_ok = true;

    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid command", file.display(), number + 1))?;
        println!("> {}", line);
        let response = connection.send(&command).await?;
        all_ok &= print_response(&response);
    }

    Ok(all_ok)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = match cli.socket {
        Some(socket_path) => DaemonClient::with_socket_path(socket_path),
        None => DaemonClient::new(),
    };

    let command = match cli.command {
        Commands::Focus {
            field,
            password,
            multiline,
            text,
            start,
            end,
        } => Command::Focus {
            field,
            password,
            multiline,
            state: snapshot(text, start, end, true)?,
        },
        Commands::Change {
            field,
            text,
            start,
            end,
            not_user,
        } => Command::Change {
            field,
            state: snapshot(text, start, end, !not_user)?,
        },
        Commands::Blur { field } => Command::Blur { field },
        Commands::Echo { mode } => Command::SetTypingEcho(mode),
        Commands::Insertions { state } => Command::SetSpeakInsertions(matches!(state, Switch::On)),
        Commands::Status => Command::Status,
        Commands::Replay { file } => {
            match replay(&client, &file).await {
                Ok(true) => return Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    eprintln!("Replay failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match client.send_command(command).await {
        Ok(response) => {
            if !print_response(&response) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to talk to keyechod: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
