//! geoserve - distances, geodata uploads and accounts over HTTP.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geoserve::{
    account::AccountService,
    config::Config,
    server::{create_router, AppState},
    storage::DiskBlobStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("geoserve v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Upload dir: {}", config.upload_dir);
    info!("  Max upload size: {} bytes", config.max_upload_size);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    let blobs = match DiskBlobStore::open(&config.upload_dir).await {
        Ok(blobs) => blobs,
        Err(e) => {
            error!("Failed to open upload dir '{}': {}", config.upload_dir, e);
            return ExitCode::FAILURE;
        }
    };

    let mut state = AppState::new(blobs);
    if config.auth_enabled {
        info!("  Auth: enabled (token ttl {}s)", config.token_ttl);
        let accounts = AccountService::in_memory(config.auth_secret_or_empty())
            .with_token_ttl(config.token_ttl());
        state = state.with_accounts(accounts);
    } else {
        warn!("  Auth: DISABLED - /auth routes are not mounted");
    }

    let router = create_router(state, config.router_config());

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/health", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "geoserve=debug,tower_http=debug"
    } else {
        "geoserve=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
