//! Ticketline Daemon - Main Entry Point
//! Composition root: configuration, logging, store, live projections, RPC server

mod settings;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use settings::{DaemonConfig, LogFormat, StoreKind};
use ticketline_api_rpc::{RpcServer, RpcServerConfig};
use ticketline_core::application::{shutdown_channel, LiveProjections, QueueService};
use ticketline_core::port::{
    SystemTimeProvider, TicketStore, TransactionalTicketStore, UuidProvider,
};
use ticketline_infra_memory::MemoryTicketStore;
use ticketline_infra_sqlite::{create_pool, run_migrations, SqliteTicketStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "ticketline=info";
const LOG_FILE_PREFIX: &str = "ticketline.log";
const PROJECTION_STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "ticketline-daemon")]
#[command(about = "Ticketline queue service daemon", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(long, env = "TICKETLINE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration before logging so log settings apply
    let config = DaemonConfig::load(args.config.as_deref())?;

    // 2. Initialize logging; the guard flushes the log file on exit
    let _log_guard = init_logging(&config)?;

    info!("Ticketline v{} starting...", VERSION);
    info!(
        store = ?config.store,
        counter = config.counter,
        max_ticket_number = config.max_ticket_number,
        "Configuration loaded"
    );

    // 3. Initialize the ticket store
    let (tx_store, store) = open_store(&config).await?;

    // 4. Setup dependencies (DI wiring)
    let service = Arc::new(QueueService::new(
        tx_store,
        store.clone(),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        config.queue_config(),
    ));

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let (projections, projections_handle) = LiveProjections::start(store, shutdown_rx);

    // 5. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, service, projections)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(PROJECTION_STOP_TIMEOUT, projections_handle).await;

    info!("Shutdown complete.");
    Ok(())
}

fn init_logging(config: &DaemonConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    let console = match config.log_format {
        // Production: JSON structured logging
        LogFormat::Json => fmt::layer().json().boxed(),
        // Development: pretty formatting with colors
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(telemetry::layer())
        .with(env_filter)
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

type Stores = (Arc<dyn TransactionalTicketStore>, Arc<dyn TicketStore>);

fn shared<S>(store: S) -> Stores
where
    S: TicketStore + TransactionalTicketStore + 'static,
{
    let store = Arc::new(store);
    (store.clone(), store)
}

async fn open_store(config: &DaemonConfig) -> Result<Stores> {
    match config.store {
        StoreKind::Memory => {
            info!("Using in-memory ticket store (tickets are lost on exit)");
            Ok(shared(MemoryTicketStore::new()))
        }
        StoreKind::Sqlite => {
            if let Some(parent) = PathBuf::from(&config.db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {}", parent.display())
                    })?;
                }
            }

            info!(db_path = %config.db_path, "Initializing database...");
            let pool = create_pool(&config.db_path)
                .await
                .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
            run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

            Ok(shared(SqliteTicketStore::new(pool)))
        }
    }
}
