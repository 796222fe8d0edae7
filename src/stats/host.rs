//! Serving-host label, computed once per process.

use std::sync::OnceLock;

static HOST_LABEL: OnceLock<String> = OnceLock::new();

/// Short hostname of the serving machine.
///
/// Computed on first access and cached for the process lifetime. Lookup
/// failure (or a non-UTF-8 hostname) yields the empty string so that
/// instrumentation never stalls on it.
pub fn host_label() -> &'static str {
    HOST_LABEL.get_or_init(|| lookup_host().unwrap_or_default())
}

fn lookup_host() -> Option<String> {
    let host = hostname::get().ok()?.into_string().ok()?;
    Some(short_host(&host).to_owned())
}

/// Keep only the part before the first domain separator. A hostname with
/// no dot, or a leading dot, is kept whole.
fn short_host(host: &str) -> &str {
    match host.find('.') {
        Some(idx) if idx > 0 => &host[..idx],
        _ => host,
    }
}
