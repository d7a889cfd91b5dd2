//! Text Generator
//!
//! Rate-limited, failure-absorbing front for an [`LlmProvider`].
//!
//! Every call waits a fixed interval first. A call without a credential is
//! skipped outright. Any provider failure is logged and becomes `None`, so a
//! documentation run never aborts because of text generation.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::metrics::{SharedMetrics, create_shared_metrics};
use super::normalize::normalize_generated_text;
use super::prompt::PromptKind;
use super::provider::{GenerationRequest, SharedProvider};

/// Per-run store of generated text, keyed by method and prompt kind
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: DashMap<(String, PromptKind), String>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subject: &str, kind: PromptKind) -> Option<String> {
        self.entries
            .get(&(subject.to_string(), kind))
            .map(|entry| entry.value().clone())
    }

    pub fn insert(&self, subject: &str, kind: PromptKind, text: String) {
        self.entries.insert((subject.to_string(), kind), text);
    }
}

pub struct TextGenerator {
    provider: SharedProvider,
    min_interval: Duration,
    metrics: SharedMetrics,
    cache: Option<Arc<ContentCache>>,
}

impl TextGenerator {
    pub fn new(provider: SharedProvider, min_interval: Duration) -> Self {
        Self {
            provider,
            min_interval,
            metrics: create_shared_metrics(),
            cache: None,
        }
    }

    /// Reuse generated text across renderers within one run
    pub fn with_cache(mut self, cache: Arc<ContentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_metrics(mut self, metrics: SharedMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &SharedMetrics {
        &self.metrics
    }

    /// Generate text for a prompt, or `None` on any failure
    pub async fn generate(&self, prompt: &str, credential: &str) -> Option<String> {
        if credential.trim().is_empty() {
            debug!("No credential supplied, skipping generation");
            self.metrics.record_skipped();
            return None;
        }

        tokio::time::sleep(self.min_interval).await;

        let request = GenerationRequest::new(prompt, credential);
        self.metrics.record_call();

        match self.provider.generate(&request).await {
            Ok(response) => match normalize_generated_text(&response.text) {
                Some(text) => {
                    self.metrics.record_success(&response);
                    Some(text)
                }
                None => {
                    warn!(
                        "{} returned no usable text after normalization",
                        self.provider.name()
                    );
                    self.metrics.record_soft_failure();
                    None
                }
            },
            Err(e) => {
                warn!("Text generation failed ({}): {}", self.provider.name(), e);
                self.metrics.record_soft_failure();
                None
            }
        }
    }

    /// Like [`generate`](Self::generate), but consults the run cache first
    ///
    /// Only successful results are cached; a failed call is retried by the
    /// next renderer that asks.
    pub async fn generate_for(
        &self,
        subject: &str,
        kind: PromptKind,
        prompt: &str,
        credential: &str,
    ) -> Option<String> {
        if let Some(cache) = &self.cache
            && let Some(text) = cache.get(subject, kind)
        {
            debug!("Reusing {} for {}", kind, subject);
            self.metrics.record_cache_hit();
            return Some(text);
        }

        let text = self.generate(prompt, credential).await?;
        if let Some(cache) = &self.cache {
            cache.insert(subject, kind, text.clone());
        }
        Some(text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ai::provider::{LlmProvider, LlmResponse};
    use crate::types::{LlmError, Result};
    use crate::types::ErrorCategory;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    /// Provider double with a fixed reply (or a fixed failure) and a call counter
    pub(crate) struct MockProvider {
        reply: Option<String>,
        pub calls: AtomicU32,
    }

    impl MockProvider {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                calls: AtomicU32::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn generate(&self, _request: &GenerationRequest) -> Result<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(text) => Ok(LlmResponse::text_only(text.clone())),
                None => Err(LlmError::new(ErrorCategory::RateLimit, "quota exceeded").into()),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    fn generator(provider: Arc<MockProvider>) -> TextGenerator {
        TextGenerator::new(provider, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_empty_credential_skips_call() {
        let provider = Arc::new(MockProvider::replying("text"));
        let generator = generator(provider.clone());

        assert!(generator.generate("prompt", "").await.is_none());
        assert!(generator.generate("prompt", "   ").await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.metrics().summary().skipped, 2);
    }

    #[tokio::test]
    async fn test_filler_normalized() {
        let provider = Arc::new(MockProvider::replying("Okay, here is the answer."));
        let generator = generator(provider.clone());

        let text = generator.generate("prompt", "key").await;
        assert_eq!(text.as_deref(), Some("here is the answer."));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_soft() {
        let provider = Arc::new(MockProvider::failing());
        let generator = generator(provider.clone());

        assert!(generator.generate("prompt", "key").await.is_none());
        let summary = generator.metrics().summary();
        assert_eq!(summary.calls, 1);
        assert_eq!(summary.soft_failures, 1);
    }

    #[tokio::test]
    async fn test_blank_reply_is_soft_failure() {
        let provider = Arc::new(MockProvider::replying("  \n "));
        let generator = generator(provider);

        assert!(generator.generate("prompt", "key").await.is_none());
        assert_eq!(generator.metrics().summary().soft_failures, 1);
    }

    #[tokio::test]
    async fn test_interval_applied_before_each_call() {
        let provider = Arc::new(MockProvider::replying("text"));
        let generator = TextGenerator::new(provider, Duration::from_millis(20));

        let start = Instant::now();
        generator.generate("a", "key").await;
        generator.generate("b", "key").await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_cache_reuses_results() {
        let provider = Arc::new(MockProvider::replying("Lists files."));
        let cache = Arc::new(ContentCache::new());
        let generator = generator(provider.clone()).with_cache(cache.clone());

        let first = generator
            .generate_for("files.list", PromptKind::UseCases, "p", "key")
            .await;
        let second = generator
            .generate_for("files.list", PromptKind::UseCases, "p", "key")
            .await;
        let other_kind = generator
            .generate_for("files.list", PromptKind::CodeExample, "p", "key")
            .await;

        assert_eq!(first, second);
        assert!(other_kind.is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            cache.get("files.list", PromptKind::UseCases).as_deref(),
            Some("Lists files.")
        );
        assert!(cache.get("files.list", PromptKind::CodeExample).is_some());
        assert!(cache.get("files.get", PromptKind::UseCases).is_none());
        assert_eq!(generator.metrics().summary().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_without_cache_every_call_reaches_provider() {
        let provider = Arc::new(MockProvider::replying("text"));
        let generator = generator(provider.clone());

        for _ in 0..3 {
            generator
                .generate_for("files.list", PromptKind::UseCases, "p", "key")
                .await;
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }
}
