//! Optional instrumentation for diff collection, enabled via HUNKVIEW_METRICS=1.
//!
//! Each phase of a run reports one stderr line on completion: elapsed time
//! plus how much work the phase covered (bytes of diff text collected,
//! hunks split out).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static METRICS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Initialize metrics from environment. Call once at startup.
pub fn init() {
    let enabled = std::env::var("HUNKVIEW_METRICS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    METRICS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Check if metrics collection is enabled.
#[inline]
pub fn enabled() -> bool {
    METRICS_ENABLED.load(Ordering::Relaxed)
}

/// RAII phase timer that logs elapsed time, and optionally a work measure,
/// on drop.
pub struct Phase {
    label: &'static str,
    detail: Option<String>,
    start: Instant,
}

impl Phase {
    /// Begin a phase if metrics are enabled.
    #[inline]
    pub fn start(label: &'static str) -> Option<Self> {
        if enabled() {
            Some(Self {
                label,
                detail: None,
                start: Instant::now(),
            })
        } else {
            None
        }
    }

    /// Record how much work the phase covered, e.g. `"4096 bytes"` or
    /// `"12 hunks in 3 files"`.
    pub fn record(&mut self, detail: impl Into<String>) {
        self.detail = Some(detail.into());
    }
}

impl Drop for Phase {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        match &self.detail {
            Some(detail) => eprintln!("[metrics] {}: {:?} ({})", self.label, elapsed, detail),
            None => eprintln!("[metrics] {}: {:?}", self.label, elapsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        assert!(!enabled());
        assert!(Phase::start("collect_diff").is_none());
    }

    #[test]
    fn record_attaches_detail() {
        let mut phase = Phase {
            label: "parse_diff",
            detail: None,
            start: Instant::now(),
        };
        phase.record(format!("{} hunks in {} files", 12, 3));
        assert_eq!(phase.detail.as_deref(), Some("12 hunks in 3 files"));
        // Drop logs to stderr; nothing to assert beyond not panicking.
    }
}
