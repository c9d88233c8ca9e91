use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use oidpoll_agent::config::{AgentConfig, AgentKind};
use oidpoll_agent::poller::Poller;

fn init_logger() {
    // Use LOG_LEVEL env var (fall back to RUST_LOG for backwards compatibility)
    let filter = env::var("LOG_LEVEL")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .with_target(false)
        .init();
}

#[derive(Parser)]
#[command(name = "oidpoll-agent")]
#[command(about = "SNMP polling agent driven by YAML auth and polling groups", long_about = None)]
struct Args {
    /// Directory holding the per-agent YAML configuration files
    #[arg(long, env = "OIDPOLL_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Which agent flavor to run
    #[arg(long, value_enum, default_value = "snmpd")]
    agent: AgentKind,

    /// Run a single poll cycle and exit
    #[arg(long, default_value_t = false)]
    oneshot: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    tracing::info!("oidpoll agent starting");

    let config = AgentConfig::load(&args.config_dir, args.agent)
        .with_context(|| format!("loading configuration from {}", args.config_dir.display()))?;

    let poller = Poller::new(config);

    if args.oneshot {
        poller.poll_cycle().await;
        tracing::info!("oneshot cycle complete");
        return Ok(());
    }

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn signal handler for graceful shutdown
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        tracing::info!("shutdown signal received, initiating graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    poller.run(shutdown_rx).await;

    tracing::info!("oidpoll agent stopped");
    Ok(())
}

/// Wait for SIGTERM or SIGINT shutdown signal.
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        // On non-Unix platforms, just wait for Ctrl+C
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to register Ctrl+C handler");
        tracing::info!("Received Ctrl+C");
    }
}
