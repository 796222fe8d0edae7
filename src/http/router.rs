//! Service router
//!
//! Wires the demo routes behind the stats middleware and mounts the
//! Prometheus scrape endpoint.

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers::metrics::MetricsState;
use crate::http::handlers::{health, metrics, report};
use crate::stats::{stats_middleware, StatsState};

/// Build the service router.
///
/// Demo routes are wrapped by the stats middleware; `/metrics` is mounted
/// outside it so scrapes do not count as handler traffic.
pub fn create_router(prometheus_handle: PrometheusHandle) -> Router {
    let instrumented = Router::new()
        .route("/health", get(health::health_check))
        .route("/stats/report", get(report::stats_report))
        .layer(middleware::from_fn_with_state(
            StatsState::default(),
            stats_middleware,
        ));

    let scrape = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    instrumented
        .merge(scrape)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
