//! Generation Metrics
//!
//! Counters for one documentation run: calls issued, successes, soft
//! failures, skipped calls and token usage. Lock-free; cheap to share.
//!
//! ## Usage
//!
//! ```ignore
//! let metrics = create_shared_metrics();
//! metrics.record_success(&response);
//! info!("{}", metrics.summary().display());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Instant;

use crate::ai::provider::LlmResponse;

/// Thread-safe counters for text generation
pub struct GenerationMetrics {
    start_time: Instant,
    calls: AtomicU32,
    successes: AtomicU32,
    soft_failures: AtomicU32,
    skipped: AtomicU32,
    cache_hits: AtomicU32,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    total_latency_ms: AtomicU64,
}

/// Point-in-time view of [`GenerationMetrics`]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub total_duration_ms: u64,
    pub calls: u32,
    pub successes: u32,
    pub soft_failures: u32,
    pub skipped: u32,
    pub cache_hits: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub avg_latency_ms: f64,
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            calls: AtomicU32::new(0),
            successes: AtomicU32::new(0),
            soft_failures: AtomicU32::new(0),
            skipped: AtomicU32::new(0),
            cache_hits: AtomicU32::new(0),
            input_tokens: AtomicU64::new(0),
            output_tokens: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
        }
    }

    /// Count an outgoing provider call
    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a usable response and its token usage
    pub fn record_success(&self, response: &LlmResponse) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.input_tokens
            .fetch_add(response.usage.input_tokens as u64, Ordering::Relaxed);
        self.output_tokens
            .fetch_add(response.usage.output_tokens as u64, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(response.timing.total_ms, Ordering::Relaxed);
    }

    pub fn record_soft_failure(&self) {
        self.soft_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> GenerationSummary {
        let calls = self.calls.load(Ordering::Relaxed);
        let successes = self.successes.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency_ms = if successes > 0 {
            total_latency as f64 / successes as f64
        } else {
            0.0
        };

        GenerationSummary {
            total_duration_ms: self.start_time.elapsed().as_millis() as u64,
            calls,
            successes,
            soft_failures: self.soft_failures.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            input_tokens: self.input_tokens.load(Ordering::Relaxed),
            output_tokens: self.output_tokens.load(Ordering::Relaxed),
            avg_latency_ms,
        }
    }
}

impl GenerationSummary {
    /// Format summary for display
    pub fn display(&self) -> String {
        format!(
            "Duration: {:.1}s\n\
             Generation calls: {} ({} ok, {} failed, {} skipped, {} reused)\n\
             Tokens: {} (input: {}, output: {})\n\
             Avg Latency: {:.0}ms",
            self.total_duration_ms as f64 / 1000.0,
            self.calls,
            self.successes,
            self.soft_failures,
            self.skipped,
            self.cache_hits,
            self.input_tokens + self.output_tokens,
            self.input_tokens,
            self.output_tokens,
            self.avg_latency_ms
        )
    }
}

/// Shared metrics for a run
pub type SharedMetrics = Arc<GenerationMetrics>;

pub fn create_shared_metrics() -> SharedMetrics {
    Arc::new(GenerationMetrics::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{ResponseTiming, TokenUsage};

    #[test]
    fn test_record_success() {
        let metrics = GenerationMetrics::new();
        let mut response = LlmResponse::text_only("ok");
        response.usage = TokenUsage::new(100, 50);
        response.timing = ResponseTiming { total_ms: 400 };

        metrics.record_call();
        metrics.record_success(&response);

        let summary = metrics.summary();
        assert_eq!(summary.calls, 1);
        assert_eq!(summary.successes, 1);
        assert_eq!(summary.input_tokens, 100);
        assert_eq!(summary.output_tokens, 50);
        assert!((summary.avg_latency_ms - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_concurrent_recording() {
        let metrics = create_shared_metrics();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        m.record_call();
                        m.record_soft_failure();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let summary = metrics.summary();
        assert_eq!(summary.calls, 800);
        assert_eq!(summary.soft_failures, 800);
        assert_eq!(summary.successes, 0);
    }

    #[test]
    fn test_display() {
        let metrics = GenerationMetrics::new();
        metrics.record_skipped();
        let text = metrics.summary().display();
        assert!(text.contains("1 skipped"));
    }
}
