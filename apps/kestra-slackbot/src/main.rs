//! kestra-slackbot server entry point.
//!
//! Loads configuration from the environment, binds the webhook listener on
//! port 3000, and serves until SIGINT/SIGTERM, then waits for in-flight
//! handlers to post their replies.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use kestra_slackbot::{config, server, state};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kestra_slackbot=info".parse()?),
        )
        .init();

    let server_config =
        config::ServerConfig::from_env().context("Failed to load configuration")?;
    info!(
        tenant = %server_config.kestra.tenant_id,
        kestra = %server_config.kestra.server_url,
        "Configuration loaded successfully"
    );

    let app_state = Arc::new(state::AppState::new(server_config));

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, server::PORT));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, path = server::EVENTS_PATH, "Listening for Slack webhooks");
    server::serve(listener, Arc::clone(&app_state), shutdown_signal())
        .await
        .context("Webhook server failed")?;

    app_state.drain().await;

    info!("Server shut down cleanly");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to register SIGTERM handler");
                    ctrl_c.await.ok();
                    info!("Received SIGINT, shutting down...");
                    return;
                }
            };

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT, shutting down...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received SIGINT, shutting down...");
    }
}
