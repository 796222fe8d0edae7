//! HTTP request stats middleware
//!
//! Records `handler.received` (counter) and `handler.latency` (timer) for
//! every request passing through the wrapped routes.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::stats::sink::{MetricsSink, StatsSink};
use crate::stats::tags::StatsTags;

/// Counter incremented once per received request.
pub const RECEIVED_COUNTER: &str = "handler.received";

/// Timer recording the wrapped handler's wall-clock latency.
pub const LATENCY_TIMER: &str = "handler.latency";

/// State for the stats middleware: where emissions go.
#[derive(Clone)]
pub struct StatsState {
    sink: Arc<dyn StatsSink>,
}

impl StatsState {
    pub fn new(sink: Arc<dyn StatsSink>) -> Self {
        Self { sink }
    }
}

impl Default for StatsState {
    fn default() -> Self {
        Self::new(Arc::new(MetricsSink))
    }
}

/// Middleware that instruments the wrapped handler:
///
/// - **`handler.received`** — counter, incremented by 1 before the handler
///   runs
/// - **`handler.latency`** — timer, recorded after the handler returns
///
/// Both carry the tags `browser`, `os`, `endpoint`, `host`. The request
/// and response pass through untouched, and emission failures never reach
/// the caller.
///
/// Attach with `axum::middleware::from_fn_with_state`:
/// ```ignore
/// Router::new()
///     .route("/stats/report", get(handler))
///     .layer(middleware::from_fn_with_state(StatsState::default(), stats_middleware))
/// ```
pub async fn stats_middleware(
    State(state): State<StatsState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let tags = StatsTags::from_request(&request);
    state.sink.incr_counter(RECEIVED_COUNTER, &tags, 1);

    let response = next.run(request).await;

    state.sink.record_timer(LATENCY_TIMER, &tags, start.elapsed());
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    use super::*;

    const CHROME_ON_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    #[derive(Debug, Clone, PartialEq)]
    enum Emission {
        Counter {
            name: &'static str,
            tags: StatsTags,
            amount: u64,
        },
        Timer {
            name: &'static str,
            tags: StatsTags,
        },
    }

    #[derive(Default)]
    struct RecordingSink {
        emissions: Mutex<Vec<Emission>>,
    }

    impl StatsSink for RecordingSink {
        fn incr_counter(&self, name: &'static str, tags: &StatsTags, amount: u64) {
            self.emissions.lock().unwrap().push(Emission::Counter {
                name,
                tags: tags.clone(),
                amount,
            });
        }

        fn record_timer(&self, name: &'static str, tags: &StatsTags, _duration: Duration) {
            self.emissions.lock().unwrap().push(Emission::Timer {
                name,
                tags: tags.clone(),
            });
        }
    }

    /// Sink that drops every emission, standing in for an unreachable
    /// metrics backend.
    struct NullSink;

    impl StatsSink for NullSink {
        fn incr_counter(&self, _name: &'static str, _tags: &StatsTags, _amount: u64) {}
        fn record_timer(&self, _name: &'static str, _tags: &StatsTags, _duration: Duration) {}
    }

    fn instrumented(sink: Arc<RecordingSink>) -> Router {
        Router::new()
            .route("/api/v1/users", get(|| async { "alice,bob" }))
            .layer(middleware::from_fn_with_state(
                StatsState::new(sink),
                stats_middleware,
            ))
    }

    fn request(uri: &str, user_agent: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(ua) = user_agent {
            builder = builder.header("user-agent", ua);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn emits_received_then_latency() {
        let sink = Arc::new(RecordingSink::default());
        let app = instrumented(sink.clone());

        let response = app
            .oneshot(request("/api/v1/users", Some(CHROME_ON_WINDOWS)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let emissions = sink.emissions.lock().unwrap();
        assert_eq!(emissions.len(), 2);
        match &emissions[0] {
            Emission::Counter { name, tags, amount } => {
                assert_eq!(*name, RECEIVED_COUNTER);
                assert_eq!(*amount, 1);
                assert_eq!(tags.browser, "Chrome");
                assert_eq!(tags.os, "Windows 10");
                assert_eq!(tags.endpoint, "users");
            }
            other => panic!("expected counter first, got {:?}", other),
        }
        match &emissions[1] {
            Emission::Timer { name, tags } => {
                assert_eq!(*name, LATENCY_TIMER);
                assert_eq!(tags.endpoint, "users");
            }
            other => panic!("expected timer second, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn both_emissions_share_one_tag_set() {
        let sink = Arc::new(RecordingSink::default());
        let app = instrumented(sink.clone());

        app.oneshot(request("/api/v1/users", Some(CHROME_ON_WINDOWS)))
            .await
            .unwrap();

        let emissions = sink.emissions.lock().unwrap();
        let counter_tags = match &emissions[0] {
            Emission::Counter { tags, .. } => tags.clone(),
            other => panic!("expected counter, got {:?}", other),
        };
        let timer_tags = match &emissions[1] {
            Emission::Timer { tags, .. } => tags.clone(),
            other => panic!("expected timer, got {:?}", other),
        };
        assert_eq!(counter_tags, timer_tags);
    }

    #[tokio::test]
    async fn missing_user_agent_degrades_to_empty_tags() {
        let sink = Arc::new(RecordingSink::default());
        let app = instrumented(sink.clone());

        app.oneshot(request("/api/v1/users", None)).await.unwrap();

        let emissions = sink.emissions.lock().unwrap();
        match &emissions[0] {
            Emission::Counter { tags, .. } => {
                assert_eq!(tags.browser, "");
                assert_eq!(tags.os, "");
            }
            other => panic!("expected counter, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn host_tag_is_stable_across_requests() {
        let sink = Arc::new(RecordingSink::default());
        let app = instrumented(sink.clone());

        for _ in 0..3 {
            app.clone()
                .oneshot(request("/api/v1/users", None))
                .await
                .unwrap();
        }

        let emissions = sink.emissions.lock().unwrap();
        let hosts: Vec<&str> = emissions
            .iter()
            .map(|e| match e {
                Emission::Counter { tags, .. } | Emission::Timer { tags, .. } => {
                    tags.host.as_str()
                }
            })
            .collect();
        assert_eq!(hosts.len(), 6);
        assert!(hosts.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn response_passes_through_unchanged() {
        let handler = || async { ([("x-demo", "yes")], "payload-bytes") };

        let plain = Router::new().route("/p", get(handler));
        let wrapped = Router::new().route("/p", get(handler)).layer(
            middleware::from_fn_with_state(
                StatsState::new(Arc::new(RecordingSink::default())),
                stats_middleware,
            ),
        );

        let direct = plain.oneshot(request("/p", None)).await.unwrap();
        let instrumented = wrapped.oneshot(request("/p", None)).await.unwrap();

        assert_eq!(direct.status(), instrumented.status());
        assert_eq!(
            direct.headers().get("x-demo"),
            instrumented.headers().get("x-demo")
        );
        let direct_body = axum::body::to_bytes(direct.into_body(), usize::MAX)
            .await
            .unwrap();
        let instrumented_body = axum::body::to_bytes(instrumented.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(direct_body, instrumented_body);
    }

    #[tokio::test]
    async fn handler_unaffected_when_sink_drops_emissions() {
        let app = Router::new()
            .route("/ok", get(|| async { "still fine" }))
            .layer(middleware::from_fn_with_state(
                StatsState::new(Arc::new(NullSink)),
                stats_middleware,
            ));

        let response = app.oneshot(request("/ok", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"still fine");
    }
}
