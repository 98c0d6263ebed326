//! Taskboard - project and task tracking backend

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use taskboard_api::{AppState, create_router};
use taskboard_auth::TokenManager;
use taskboard_db::Database;

/// Taskboard - project and task tracking backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "TASKBOARD_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "TASKBOARD_PORT")]
    port: Option<u16>,

    /// Database connection string
    #[arg(long, env = "TASKBOARD_DATABASE_URL")]
    database_url: Option<String>,

    /// Token signing secret
    #[arg(long, env = "TASKBOARD_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

impl Args {
    /// Apply command line and environment overrides on top of the file config
    fn apply(self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        if let Some(secret) = self.jwt_secret {
            config.auth.jwt_secret = Some(secret);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting Taskboard v{}", env!("CARGO_PKG_VERSION"));

    // Token issuer is built once; a missing secret stops startup here
    let tokens = Arc::new(TokenManager::new(
        config.auth.jwt_secret.as_deref().unwrap_or_default(),
    )?);

    // Create data directory for file-backed databases
    let db_file = config.database.file_path();
    if let Some(parent) = db_file.as_deref().and_then(Path::parent)
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db = Database::new(&config.database.url).await?;

    // Install the Prometheus recorder; the API still serves without it
    let metrics_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(Arc::new(handle)),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    };

    // Create application state
    let state = AppState::new(db, tokens);

    // Create router
    let app = create_router(state, metrics_handle).layer(TraceLayer::new_for_http());

    let addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
