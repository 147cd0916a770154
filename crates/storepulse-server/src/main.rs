//! StorePulse production server
//!
//! Storefront analytics engine: captures behavioral events, serves
//! sanitized catalog search, and assembles rollup reports over the
//! captured history.
//!
//! Usage:
//! ```bash
//! # With config file
//! storepulse-server --config config.yaml
//!
//! # Or with environment variables
//! STOREPULSE_STORE_PATH=/var/lib/storepulse/events.db storepulse-server
//!
//! # Volatile in-memory backend for local development
//! storepulse-server --store mem
//! ```
//!
//! Test with:
//! ```bash
//! curl 'http://localhost:8080/api/products?search=plc&limit=5'
//! curl 'http://localhost:8080/api/reports?type=overview'
//! curl http://localhost:8080/api/events/page-view \
//!   -H "Content-Type: application/json" \
//!   -d '{"path": "/products/s7-1200"}'
//! ```

mod app;
mod config;
mod error;
mod handlers;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use app::AppState;
use config::{ServerConfig, StoreBackend};
use storepulse_analytics::logger::SearchQueryLogger;
use storepulse_core::store::{CatalogStore, EventStore};
use storepulse_store_mem::{MemCatalogStore, MemEventStore};
use storepulse_store_sqlite::{SqliteCatalogStore, SqliteEventStore};

const PULSE: &str = r#"
  ___ _                 ___      _
 / __| |_ ___ _ _ ___  | _ \_  _| |___ ___
 \__ \  _/ _ \ '_/ -_) |  _/ || | (_-</ -_)
 |___/\__\___/_| \___| |_|  \_,_|_/__/\___|

        storefront analytics & reporting
"#;

/// StorePulse - storefront analytics rollup and reporting engine
#[derive(Parser)]
#[command(name = "storepulse-server")]
#[command(about = "StorePulse analytics and reporting server", long_about = None)]
#[command(before_help = PULSE)]
struct Cli {
    /// Path to configuration file (YAML or TOML)
    #[arg(short, long, value_name = "FILE", env = "STOREPULSE_CONFIG")]
    config: Option<String>,

    /// Storage backend override (mem or sqlite)
    #[arg(short = 's', long, value_name = "BACKEND")]
    store: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config file first, then env vars, then CLI flags on top
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .map_err(|e| anyhow!("failed to load config from {}: {}", path, e))?,
        None => ServerConfig::default(),
    };
    config.merge_env();

    if let Some(ref backend) = cli.store {
        match backend.to_lowercase().as_str() {
            "mem" => config.store.backend = StoreBackend::Mem,
            "sqlite" => config.store.backend = StoreBackend::Sqlite,
            _ => bail!("invalid store backend '{}', use 'mem' or 'sqlite'", backend),
        }
    }

    // Initialize tracing with the configured level and sqlx query control
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Keep sqlx at WARN unless query logging is explicitly requested
    let mut filter = EnvFilter::new(format!("{}", log_level));
    if !config.logging.log_sql_queries {
        match "sqlx=warn".parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Warning: failed to set sqlx log filter: {}", e),
        }
    }

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    println!("{}", PULSE);

    match &cli.config {
        Some(path) => info!("📁 Configuration loaded from: {}", path),
        None => info!("📁 Using default configuration"),
    }

    info!("🚀 Initializing StorePulse");

    let (events, catalog): (Arc<dyn EventStore>, Arc<dyn CatalogStore>) =
        match config.store.backend {
            StoreBackend::Sqlite => {
                info!("💾 Store backend: sqlite ({})", config.store.path);
                let pool = storepulse_store_sqlite::connect(config.store.path.as_str()).await?;
                (
                    Arc::new(SqliteEventStore::new(pool.clone())),
                    Arc::new(SqliteCatalogStore::new(pool)),
                )
            }
            StoreBackend::Mem => {
                info!("💾 Store backend: in-memory (volatile)");
                (
                    Arc::new(MemEventStore::new()),
                    Arc::new(MemCatalogStore::new()),
                )
            }
        };

    // Search logging is fire-and-forget; the worker drains on shutdown
    let search_logger =
        SearchQueryLogger::with_buffer_size(events.clone(), config.search_log.buffer_size);
    info!(
        "🔍 Search query logging enabled (buffer: {})",
        config.search_log.buffer_size
    );

    let state = AppState {
        events,
        catalog,
        search_log: search_logger.handle(),
    };
    let router = app::build_router(state, Duration::from_secs(config.request_timeout_secs));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("");
    info!("✅ StorePulse listening on http://{}", addr);
    info!("   API endpoints:");
    info!("   - Catalog search: http://{}/api/products", addr);
    info!("   - Reports:        http://{}/api/reports?type=overview", addr);
    info!(
        "   - Event capture:  http://{}/api/events/page-view (product-view, interaction, session)",
        addr
    );
    info!("   Observability:");
    info!("   - Health check:    http://{}/healthz", addr);
    info!("   - Readiness check: http://{}/readyz", addr);
    info!("");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Once serve returns the router and every search-log handle in it are
    // gone, so this drains the remaining queue and joins the worker
    search_logger.shutdown().await;

    info!("👋 StorePulse stopped");

    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
