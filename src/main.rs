//! request-stats service binary.
//!
//! Serves the demo HTTP surface with every handler wrapped in request
//! instrumentation. Reads configuration from a TOML file
//! (~/.config/request-stats/config.toml, override with REQUEST_STATS_CONFIG).

use std::path::PathBuf;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};

use request_stats::support::AppError;
use request_stats::{create_router, default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // ── Load configuration ─────────────────────────────────────
    let explicit_path = std::env::var("REQUEST_STATS_CONFIG")
        .map(PathBuf::from)
        .ok();
    let config_path = explicit_path.clone().unwrap_or_else(default_config_path);
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg.logging.level);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        // An explicitly requested config file must load.
        Err(e) if explicit_path.is_some() => return Err(e.into()),
        Err(e) => {
            init_tracing("info");
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting request-stats service...");

    // ── Prometheus metrics recorder (must be installed before any stats emission) ──
    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");

    // ── HTTP server ────────────────────────────────────────────
    let router = create_router(prometheus_handle);

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("🚀 HTTP server listening on http://{}", addr);
    info!("Scrape endpoint available at http://{}/metrics", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Serve)?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            // Without a signal source, keep serving until killed.
            std::future::pending::<()>().await;
        }
    }
}
