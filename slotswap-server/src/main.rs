//! SlotSwap Server
//!
//! Coordinates time-slot swaps between users over HTTP and pushes swap
//! notifications over WebSocket.

use clap::{Parser, Subcommand};
use slotswap_core::SwapEngine;
use slotswap_core::config::ConfigStore;
use slotswap_server::config::ConfigLoader;
use slotswap_server::server::{build_router, run_server};
use slotswap_server::shutdown::{shutdown_signal, spawn_config_reload_handler};
use slotswap_server::state::AppState;
use slotswap_sdk::token::issue_session_token;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// SlotSwap - calendar slot swap coordination service
#[derive(Parser, Debug)]
#[command(name = "slotswap-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./slotswap-config.toml", global = true)]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, global = true)]
    listen: Option<SocketAddr>,

    /// Emit logs as JSON lines
    #[arg(long, env = "SLOTSWAP_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a session token for a user, signed with the configured secret
    IssueToken {
        #[arg(long)]
        user_id: i64,
        /// Token lifetime; defaults to `auth.token_ttl_secs`
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", config_loader.path());

    match args.command.unwrap_or(Command::Serve) {
        Command::IssueToken { user_id, ttl_secs } => {
            let ttl = ttl_secs.map_or(loaded_config.auth.token_ttl, Duration::from_secs);
            println!(
                "{}",
                issue_session_token(user_id, ttl, loaded_config.auth.secret_bytes())
            );
            Ok(())
        }
        Command::Serve => {
            tracing::info!("Starting slotswap-server v{}", env!("CARGO_PKG_VERSION"));

            let listen_addr = loaded_config.listen;
            let (engine, event_rx) = SwapEngine::new(&loaded_config.engine);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);

            let notifier = tokio::spawn(engine.notifier().run(shutdown_rx.clone(), event_rx));

            let auth_store = ConfigStore::new(loaded_config.auth);
            let reload_notify = spawn_config_reload_handler(auth_store.clone(), config_loader);

            let state = AppState::new(engine, auth_store, shutdown_rx);
            let router = build_router(state);

            let result = run_server(router, listen_addr, shutdown_signal()).await;

            // Stop background tasks; open WebSocket sessions close with 1001.
            let _ = shutdown_tx.send(true);
            reload_notify.notify_one();
            if let Err(e) = notifier.await {
                tracing::error!(error = %e, "Notifier task failed");
            }
            tracing::info!("Server shutdown complete");

            result.map_err(Into::into)
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
