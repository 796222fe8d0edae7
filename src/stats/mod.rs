//! Request instrumentation core
//!
//! Wraps HTTP handlers so that every invocation emits a received counter
//! and a latency timer, tagged with request-derived dimensions:
//!
//! - **`browser`** / **`os`** — from the User-Agent header
//! - **`endpoint`** — last segment of the request path
//! - **`host`** — short hostname of the serving machine
//!
//! Emission is fire-and-forget: a missing or failing metrics backend never
//! surfaces into the request path.

pub mod host;
pub mod middleware;
pub mod sink;
pub mod tags;
pub mod user_agent;

pub use middleware::{stats_middleware, StatsState, LATENCY_TIMER, RECEIVED_COUNTER};
pub use sink::{MetricsSink, StatsSink};
pub use tags::StatsTags;
