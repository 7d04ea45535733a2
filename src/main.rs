//! Movies API: aggregates two upstream movie catalogs behind one HTTP
//! surface.
//!
//! Single-binary Tokio application that:
//! 1. Loads layered configuration (.env, config.toml, env vars)
//! 2. Builds one client per upstream provider
//! 3. Serves the merged search and per-vendor detail endpoints
//! 4. Caches per-provider results with single-flight de-duplication

mod api;
mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use cinemaworld_client::CinemaWorldClient;
use common::MovieProvider;
use filmworld_client::FilmWorldClient;
use movies::MovieService;

/// Movie catalog aggregation API
#[derive(Parser)]
#[command(name = "movies-api", about = "Movie catalog aggregation API")]
struct Cli {
    /// Probe each provider's listing endpoint once and exit.
    #[arg(long)]
    check_providers: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "movies_api=info,movies=info,cinemaworld_client=info,filmworld_client=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("Movies API starting up...");

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let providers: Vec<Arc<dyn MovieProvider>> = vec![
        Arc::new(CinemaWorldClient::new(&cfg.cinema_world)),
        Arc::new(FilmWorldClient::new(&cfg.film_world)),
    ];

    if cli.check_providers {
        check_providers(&providers).await;
        return;
    }

    let service = MovieService::new(providers, Duration::from_secs(cfg.cache.ttl_secs));
    let app = api::router(api::AppState { service });

    let listener = match tokio::net::TcpListener::bind(&cfg.server.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", cfg.server.bind_addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", cfg.server.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Hit every provider's listing endpoint once and report the outcome.
async fn check_providers(providers: &[Arc<dyn MovieProvider>]) {
    let mut failed = false;

    for provider in providers {
        let vendor = provider.vendor();
        match provider.list_movies().await {
            Ok(listings) => info!("{vendor}: OK ({} listings)", listings.len()),
            Err(e) => {
                error!("{vendor}: {e}");
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
