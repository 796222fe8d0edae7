//! # request-stats
//!
//! HTTP request instrumentation service. Every wrapped handler invocation
//! emits a `handler.received` counter and a `handler.latency` timer, both
//! tagged with the client browser, client operating system, endpoint name
//! and serving host.
//!
//! ## Architecture
//!
//! - **stats**: instrumentation middleware, tag derivation and the
//!   metrics sink seam
//! - **http**: demo HTTP surface (health, tag report, Prometheus scrape)
//! - **config**: TOML-backed application configuration
//! - **support**: error types

pub mod config;
pub mod http;
pub mod stats;
pub mod support;

pub use config::{default_config_path, AppConfig};
pub use http::create_router;
pub use stats::{stats_middleware, MetricsSink, StatsSink, StatsState, StatsTags};
