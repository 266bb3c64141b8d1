//! famcal - family Discord bot backed by Gemini and Google Calendar
//!
//! Main entry point: loads configuration, registers `/ask` and serves the
//! interactions endpoint until Ctrl-C.

use anyhow::Context;
use famcal_app::utils::init_tracing;
use famcal_app::AppContext;
use famcal_infra::config;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = config::load().context("Configuration error")?;
    let listen_addr = config.server.listen_addr.clone();
    let ctx = AppContext::new(config).context("Configuration error")?;

    ctx.register_commands().await.context("Failed to register slash commands")?;

    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;
    info!(%listen_addr, "famcal listening for Discord interactions");

    axum::serve(listener, ctx.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Interactions server failed")?;

    info!("famcal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
