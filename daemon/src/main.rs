use anyhow::Result;
use keyechod::config::load_config;
use keyechod::{DaemonServer, DaemonState};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    info!("keyecho daemon (keyechod) starting...");

    let config = load_config()?;
    let socket_path = config.server.socket_path();
    info!(
        "Typing echo: {}, speak insertions: {}",
        config.echo.typing_echo, config.echo.speak_insertions
    );

    let daemon_state = DaemonState::new(config)?;
    let state = Arc::new(Mutex::new(daemon_state));

    let server = DaemonServer::new(socket_path, state);
    server.run().await?;

    Ok(())
}
