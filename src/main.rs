//! Profile API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ CORS headers ─▶ lifecycle guard ─┬─▶ GET /    (delayed greeting)
//!                                                                              ├─▶ GET /me  (profile + fact) ──▶ fact provider
//!                                                                              └─▶ fallback (404)
//!
//!     lifecycle guard: 5 s deadline, one response per request, handler keeps
//!     running after a timeout but its result is discarded.
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use profile_server::config::validation::validate_config;
use profile_server::config::{load_config, ConfigError};
use profile_server::lifecycle::{install_failure_supervisor, wait_for_signal, Shutdown};
use profile_server::observability::init_logging;
use profile_server::HttpServer;

#[derive(Parser)]
#[command(name = "profile-server")]
#[command(about = "Profile API with a guarded request lifecycle", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:3000).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability);
    install_failure_supervisor();

    tracing::info!("profile-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_ms = config.timeouts.request_ms,
        root_delay_ms = config.routes.root_delay_ms,
        fact_url = %config.facts.url,
        email = %config.profile.email,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Server listening");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        let notified = signal_shutdown.trigger();
        tracing::info!(subscribers = notified, "Draining in-flight requests");
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
