//! songscope-dash - Song feature correlation dashboard
//!
//! Loads the correlation matrix and song table once, then serves the heatmap
//! with its linked, resampled scatter plot.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songscope_common::config::{load_toml_config, DashboardConfig};
use songscope_common::events::EventBus;
use songscope_dash::cli::Args;
use songscope_dash::dataset::Dataset;
use songscope_dash::{build_router, AppState, EVENT_BUS_CAPACITY};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file = load_toml_config(args.config.as_deref()).context("Failed to load config file")?;
    let config = DashboardConfig::resolve(args.overrides(), file).context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting SongScope dashboard (songscope-dash) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Data directory: {}", config.data_dir.display());

    let mut rng = match config.sample_seed {
        Some(seed) => {
            info!("Sampling with fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let dataset = Dataset::load(&config, &mut rng)
        .await
        .context("Failed to load dashboard data")?;

    let events = EventBus::new(EVENT_BUS_CAPACITY);
    let state = AppState::new(dataset, config.sample_size, rng, events);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("songscope-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
