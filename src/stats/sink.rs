//! Metrics backend seam.
//!
//! The middleware emits through [`StatsSink`] rather than calling the
//! `metrics` macros directly, so tests can observe emissions and the
//! backend stays swappable.

use std::time::Duration;

use crate::stats::tags::{StatsTags, TAG_BROWSER, TAG_ENDPOINT, TAG_HOST, TAG_OS};

/// Destination for stats emissions.
///
/// Both calls are best-effort and fire-and-forget: implementations must
/// never block the request path or surface a failure to the caller.
pub trait StatsSink: Send + Sync {
    /// Add `amount` to the counter `name`, tagged with `tags`.
    fn incr_counter(&self, name: &'static str, tags: &StatsTags, amount: u64);

    /// Record one duration sample for the timer `name`, tagged with `tags`.
    fn record_timer(&self, name: &'static str, tags: &StatsTags, duration: Duration);
}

/// Sink that forwards to the global `metrics` recorder.
///
/// With no recorder installed (or a failing exporter) the macros are
/// no-ops, which is exactly the degrade-silently contract.
pub struct MetricsSink;

impl StatsSink for MetricsSink {
    fn incr_counter(&self, name: &'static str, tags: &StatsTags, amount: u64) {
        metrics::counter!(
            name,
            TAG_BROWSER => tags.browser.clone(),
            TAG_OS => tags.os.clone(),
            TAG_ENDPOINT => tags.endpoint.clone(),
            TAG_HOST => tags.host.clone(),
        )
        .increment(amount);
    }

    fn record_timer(&self, name: &'static str, tags: &StatsTags, duration: Duration) {
        // Timers are recorded as a histogram of seconds.
        metrics::histogram!(
            name,
            TAG_BROWSER => tags.browser.clone(),
            TAG_OS => tags.os.clone(),
            TAG_ENDPOINT => tags.endpoint.clone(),
            TAG_HOST => tags.host.clone(),
        )
        .record(duration.as_secs_f64());
    }
}
