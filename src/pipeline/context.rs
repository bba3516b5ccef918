//! Request-scoped correlation for pipeline runs.

use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_REQUEST: AtomicU32 = AtomicU32::new(0);

/// Correlation data threaded through one pipeline invocation.
///
/// Every stage enters [`AnalysisContext::span`] so log lines from both
/// packages of a comparison carry the same `request_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisContext {
    pub request_id: String,
}

impl AnalysisContext {
    /// Context with a fresh, process-unique request id.
    #[must_use]
    pub fn new() -> Self {
        let seq = NEXT_REQUEST.fetch_add(1, Ordering::Relaxed);
        Self {
            request_id: format!("{:x}-{seq:04x}", Utc::now().timestamp_millis()),
        }
    }

    /// Context with a caller-supplied request id.
    #[must_use]
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Span for one pipeline stage.
    #[must_use]
    pub fn span(&self, stage: &'static str) -> tracing::Span {
        tracing::info_span!("pipeline", request_id = %self.request_id, stage)
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = AnalysisContext::new();
        let b = AnalysisContext::new();
        assert_ne!(a.request_id, b.request_id);
        assert_eq!(AnalysisContext::with_request_id("r-1").request_id, "r-1");
    }
}
