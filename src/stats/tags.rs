//! Per-request tag derivation.
//!
//! The four tag keys (`browser`, `os`, `endpoint`, `host`) are a stable
//! contract for downstream dashboards and alerts.

use axum::{
    body::Body,
    http::{header, Request},
};
use serde::Serialize;

use crate::stats::host::host_label;
use crate::stats::user_agent::parse_user_agent;

/// Tag key for the client browser name.
pub const TAG_BROWSER: &str = "browser";
/// Tag key for the client operating system name.
pub const TAG_OS: &str = "os";
/// Tag key for the endpoint (last path segment).
pub const TAG_ENDPOINT: &str = "endpoint";
/// Tag key for the serving host label.
pub const TAG_HOST: &str = "host";

/// Tag set attached to both stats emissions for a request.
///
/// All fields are always present; values degrade to the empty string when
/// derivation yields nothing (unparseable agent, failed hostname lookup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsTags {
    pub browser: String,
    pub os: String,
    pub endpoint: String,
    pub host: String,
}

impl StatsTags {
    /// Derive the tag set for an incoming request.
    pub fn from_request(request: &Request<Body>) -> Self {
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self::from_parts(user_agent, request.uri().path())
    }

    /// Derive the tag set from the raw User-Agent value and request path.
    pub fn from_parts(user_agent: &str, path: &str) -> Self {
        let (browser, os) = parse_user_agent(user_agent);
        Self {
            browser,
            os,
            endpoint: endpoint(path).to_owned(),
            host: host_label().to_owned(),
        }
    }
}

/// Last path segment, with trailing slashes stripped first.
///
/// `/stats/report` → `report`, `/stats/` → `stats`, `/` → `/`.
pub(crate) fn endpoint(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        // "/" (or any run of slashes) reduces to the separator itself;
        // an empty path stays empty.
        return if path.is_empty() { "" } else { "/" };
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
