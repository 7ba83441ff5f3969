use std::sync::Arc;

use clap::Parser;

use mvc_basic::config::{AppState, Config};
use mvc_basic::{handler, logger, server};

/// HTTP request/response binding demo server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file, with or without extension
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Override `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut cfg = Config::load_from(&cli.config)?;
    if let Some(host) = cli.host {
        cfg.server.host = host;
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }

    logger::init(&cfg.logging)?;

    // Create the Tokio runtime, sizing worker threads from the config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!("[CONFIG] Using {workers} worker threads");
    } else {
        tracing::info!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let router = handler::build_router(&cfg.http)?;
    let route_count = router.routes().len();

    let listener = server::create_reusable_listener(addr, cfg.server.backlog)?;
    let local_addr = listener.local_addr()?;

    logger::log_server_start(&local_addr, &cfg, route_count);
    tracing::info!("[CONFIG] Max body size: {} bytes", cfg.http.max_body_size);
    tracing::info!(
        "[CONFIG] Max connections: {:?}",
        cfg.performance.max_connections
    );

    let state = Arc::new(AppState::new(cfg, router));
    server::serve(listener, state, server::wait_for_shutdown()).await;

    tracing::info!("Server stopped");
    Ok(())
}
