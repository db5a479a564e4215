//! Tank Arena Bot - turn-based decision agent for the two-tank arena
//!
//! The game runner launches this binary and talks to it over stdio:
//! - stdin carries the identity message, setup snapshots and one snapshot per turn
//! - stdout carries exactly one action per turn
//! - stderr carries logs

mod comms;
mod config;
mod game;
mod util;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::comms::{session, TurnChannel};
use crate::config::{Config, LogFormat};
use crate::game::TurnController;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    info!("Starting Tank Arena Bot");
    info!(seed = ?config.seed, tuning = ?config.tuning, "Decision tuning");

    let mut channel = TurnChannel::stdio();
    let (identity, world) = session::handshake(&mut channel).await?;
    let mut controller = TurnController::from_config(identity, world, &config);

    tokio::select! {
        result = session::play(&mut channel, &mut controller) => {
            let summary = result?;
            info!(turns = summary.turns, "Bot shutdown complete");
        }
        _ = shutdown_signal() => {
            info!("Stopped before the game ended");
        }
    }

    Ok(())
}

/// Initialize tracing/logging. Stdout belongs to the game channel, so
/// every layer writes to stderr.
fn init_tracing(log_level: &str, format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
