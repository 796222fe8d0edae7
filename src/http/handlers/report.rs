//! Tag report endpoint
//!
//! Echoes the tag set the instrumentation derives for the calling request,
//! so the derivation can be inspected live from a browser or curl.

use axum::{
    http::{header, HeaderMap, Uri},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::stats::StatsTags;

/// What the instrumentation derived for the calling request.
#[derive(Debug, Serialize)]
pub struct TagReport {
    #[serde(flatten)]
    pub tags: StatsTags,
    pub generated_at: String,
}

/// `GET /stats/report`
pub async fn stats_report(headers: HeaderMap, uri: Uri) -> Json<TagReport> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Json(TagReport {
        tags: StatsTags::from_parts(user_agent, uri.path()),
        generated_at: Utc::now().to_rfc3339(),
    })
}
