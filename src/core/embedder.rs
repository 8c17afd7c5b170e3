use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::EmbeddingSettings;

/// Errors that can occur while producing an embedding
///
/// None of these escape [`TextEmbedder::embed`]; they are logged and turned
/// into [`Embedding::Missing`].
#[derive(Debug, Error)]
pub enum EmbedderError {
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Embedding timed out after {0:?}")]
    Timeout(Duration),

    #[error("Text produced no embedding features")]
    Degenerate,

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding API error: {0}")]
    Api(String),

    #[error("Embedding task failed: {0}")]
    Task(String),
}

/// Semantic vector for one text, or the sentinel for empty/failed text
#[derive(Debug, Clone, PartialEq)]
pub enum Embedding {
    Missing,
    Vector(Arc<[f32]>),
}

impl Embedding {
    pub fn is_missing(&self) -> bool {
        matches!(self, Embedding::Missing)
    }

    pub fn as_slice(&self) -> Option<&[f32]> {
        match self {
            Embedding::Missing => None,
            Embedding::Vector(values) => Some(values),
        }
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Embedding::Vector(Arc::from(values))
    }
}

/// A model that maps text to a fixed-length vector
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;
}

/// Loads the embedding model on first use
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EmbedderError>;
}

/// Provider handing out an already constructed model
pub struct StaticModelProvider {
    model: Arc<dyn EmbeddingModel>,
}

impl StaticModelProvider {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl ModelProvider for StaticModelProvider {
    async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
        Ok(Arc::clone(&self.model))
    }
}

#[derive(Debug, Default)]
struct EmbedderCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    computations: AtomicU64,
    failures: AtomicU64,
}

/// Embedder statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderStats {
    pub hits: u64,
    pub misses: u64,
    pub computations: u64,
    pub failures: u64,
    pub entries: u64,
}

/// Text embedder with a process-wide, single-flight cache
///
/// The model is loaded lazily, at most once, and concurrent first calls
/// share that one load. Each distinct text (exact, case-sensitive) is
/// computed at most once while it stays cached; concurrent requests for the
/// same unseen text wait on the in-flight computation.
pub struct TextEmbedder {
    provider: Arc<dyn ModelProvider>,
    model: OnceCell<Arc<dyn EmbeddingModel>>,
    cache: Cache<String, Arc<[f32]>>,
    timeout: Duration,
    counters: Arc<EmbedderCounters>,
}

impl TextEmbedder {
    pub fn new(provider: Arc<dyn ModelProvider>, cache_capacity: u64, timeout: Duration) -> Self {
        let cache = moka::future::CacheBuilder::new(cache_capacity).build();

        Self {
            provider,
            model: OnceCell::new(),
            cache,
            timeout,
            counters: Arc::new(EmbedderCounters::default()),
        }
    }

    pub fn from_settings(provider: Arc<dyn ModelProvider>, settings: &EmbeddingSettings) -> Self {
        Self::new(
            provider,
            settings.cache_capacity,
            Duration::from_millis(settings.timeout_ms),
        )
    }

    /// Embed a text, returning [`Embedding::Missing`] for blank input or any failure
    pub async fn embed(&self, text: &str) -> Embedding {
        if text.trim().is_empty() {
            return Embedding::Missing;
        }

        if let Some(values) = self.cache.get(text).await {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Embedding cache hit ({} chars)", text.len());
            return Embedding::Vector(values);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        let model = match self.model().await {
            Ok(model) => model,
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Embedding model failed to load: {}", e);
                return Embedding::Missing;
            }
        };

        let init = self.compute(model, text.to_string());
        match self.cache.try_get_with(text.to_string(), init).await {
            Ok(values) => Embedding::Vector(values),
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Embedding failed, treating field as empty: {}", e);
                Embedding::Missing
            }
        }
    }

    /// Get embedder statistics
    pub fn stats(&self) -> EmbedderStats {
        EmbedderStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            computations: self.counters.computations.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }

    /// Loaded model, bounded by the embedding timeout
    ///
    /// A load that errors or times out leaves the cell empty, so the next
    /// call tries again.
    async fn model(&self) -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
        self.model
            .get_or_try_init(|| async {
                let model = tokio::time::timeout(self.timeout, self.provider.load())
                    .await
                    .map_err(|_| EmbedderError::Timeout(self.timeout))??;
                tracing::info!(
                    "Embedding model loaded: {} ({} dimensions)",
                    model.name(),
                    model.dimension()
                );
                Ok::<_, EmbedderError>(model)
            })
            .await
            .map(Arc::clone)
    }

    /// Cache fill for one text
    ///
    /// The computation runs on its own task and inserts its result itself.
    /// When the caller abandons `embed` mid-flight, `try_get_with` is dropped
    /// before it can insert, and the task's own insert is what lands the
    /// finished vector in the cache. When the caller stays, `try_get_with`
    /// writes the same value a second time, which is harmless.
    fn compute(
        &self,
        model: Arc<dyn EmbeddingModel>,
        text: String,
    ) -> impl Future<Output = Result<Arc<[f32]>, EmbedderError>> {
        let cache = self.cache.clone();
        let counters = Arc::clone(&self.counters);
        let timeout = self.timeout;

        async move {
            let task = tokio::spawn(async move {
                counters.computations.fetch_add(1, Ordering::Relaxed);

                let values = match tokio::time::timeout(timeout, model.embed(&text)).await {
                    Ok(result) => result?,
                    Err(_) => return Err(EmbedderError::Timeout(timeout)),
                };
                let values = check_vector(values, model.dimension())?;

                cache.insert(text, Arc::clone(&values)).await;
                Ok::<_, EmbedderError>(values)
            });

            task.await.map_err(|e| EmbedderError::Task(e.to_string()))?
        }
    }
}

fn check_vector(values: Vec<f32>, expected: usize) -> Result<Arc<[f32]>, EmbedderError> {
    if values.len() != expected {
        return Err(EmbedderError::DimensionMismatch {
            expected,
            actual: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) || values.iter().all(|v| *v == 0.0) {
        return Err(EmbedderError::Degenerate);
    }
    Ok(Arc::from(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hashed_model::HashedNgramModel;

    /// Model that counts calls and can be slowed down or made to fail
    struct CountingModel {
        calls: AtomicU64,
        delay: Duration,
        fail: bool,
    }

    impl CountingModel {
        fn new(delay: Duration, fail: bool) -> Self {
            Self {
                calls: AtomicU64::new(0),
                delay,
                fail,
            }
        }
    }

    #[async_trait]
    impl EmbeddingModel for CountingModel {
        fn name(&self) -> &str {
            "counting"
        }

        fn dimension(&self) -> usize {
            3
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(EmbedderError::Api("boom".to_string()));
            }
            Ok(vec![text.len() as f32, 1.0, 0.5])
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ModelProvider for FailingProvider {
        async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
            Err(EmbedderError::ModelUnavailable("no weights".to_string()))
        }
    }

    fn embedder_with(model: Arc<dyn EmbeddingModel>, timeout: Duration) -> TextEmbedder {
        TextEmbedder::new(Arc::new(StaticModelProvider::new(model)), 1_000, timeout)
    }

    #[tokio::test]
    async fn test_blank_text_is_missing() {
        let embedder = embedder_with(Arc::new(HashedNgramModel::new(64)), Duration::from_secs(1));

        assert!(embedder.embed("").await.is_missing());
        assert!(embedder.embed("   \n\t").await.is_missing());
        assert_eq!(embedder.stats().computations, 0);
    }

    #[tokio::test]
    async fn test_repeated_text_served_from_cache() {
        let model = Arc::new(CountingModel::new(Duration::ZERO, false));
        let embedder = embedder_with(model.clone(), Duration::from_secs(1));

        let first = embedder.embed("loves hiking").await;
        let second = embedder.embed("loves hiking").await;

        assert_eq!(first, second);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(embedder.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_cache_is_case_sensitive() {
        let model = Arc::new(CountingModel::new(Duration::ZERO, false));
        let embedder = embedder_with(model.clone(), Duration::from_secs(1));

        embedder.embed("Jazz").await;
        embedder.embed("jazz").await;

        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_requests_compute_once() {
        let model = Arc::new(CountingModel::new(Duration::from_millis(50), false));
        let embedder = Arc::new(embedder_with(model.clone(), Duration::from_secs(1)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let embedder = Arc::clone(&embedder);
                tokio::spawn(async move { embedder.embed("an unseen bio").await })
            })
            .collect();

        let results: Vec<Embedding> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|e| *e == results[0]));
        assert!(!results[0].is_missing());
    }

    #[tokio::test]
    async fn test_model_failure_yields_missing_and_is_not_cached() {
        let model = Arc::new(CountingModel::new(Duration::ZERO, true));
        let embedder = embedder_with(model.clone(), Duration::from_secs(1));

        assert!(embedder.embed("anything").await.is_missing());
        assert!(embedder.embed("anything").await.is_missing());

        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
        assert_eq!(embedder.stats().failures, 2);
    }

    #[tokio::test]
    async fn test_slow_model_times_out() {
        let model = Arc::new(CountingModel::new(Duration::from_millis(500), false));
        let embedder = embedder_with(model, Duration::from_millis(20));

        assert!(embedder.embed("slow text").await.is_missing());
    }

    #[tokio::test]
    async fn test_unavailable_model_yields_missing() {
        let embedder = TextEmbedder::new(Arc::new(FailingProvider), 100, Duration::from_secs(1));

        assert!(embedder.embed("hello there").await.is_missing());
        assert_eq!(embedder.stats().failures, 1);
    }

    /// Provider that counts loads, waits before answering, or never answers
    struct SlowProvider {
        loads: AtomicU64,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl ModelProvider for SlowProvider {
        async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => futures::future::pending::<()>().await,
            }
            Ok(Arc::new(HashedNgramModel::new(64)))
        }
    }

    #[tokio::test]
    async fn test_hanging_model_load_times_out() {
        let provider = Arc::new(SlowProvider {
            loads: AtomicU64::new(0),
            delay: None,
        });
        let embedder = TextEmbedder::new(provider.clone(), 100, Duration::from_millis(50));

        let result =
            tokio::time::timeout(Duration::from_secs(2), embedder.embed("stuck loading")).await;

        assert!(result
            .expect("embed must not hang on model load")
            .is_missing());
        assert_eq!(embedder.stats().failures, 1);

        // the failed load is not remembered
        let _ = tokio::time::timeout(Duration::from_secs(2), embedder.embed("stuck loading")).await;
        assert_eq!(provider.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_load_model_once() {
        let provider = Arc::new(SlowProvider {
            loads: AtomicU64::new(0),
            delay: Some(Duration::from_millis(50)),
        });
        let embedder = Arc::new(TextEmbedder::new(
            provider.clone(),
            100,
            Duration::from_secs(1),
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let embedder = Arc::clone(&embedder);
                tokio::spawn(async move { embedder.embed(&format!("first text {}", i)).await })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            assert!(!result.unwrap().is_missing());
        }
        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abandoned_embed_still_fills_cache() {
        let model = Arc::new(CountingModel::new(Duration::from_millis(100), false));
        let embedder = embedder_with(model.clone(), Duration::from_secs(1));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), embedder.embed("left behind")).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(250)).await;

        let again = embedder.embed("left behind").await;
        assert!(!again.is_missing());
        assert_eq!(embedder.stats().computations, 1);
        assert_eq!(embedder.stats().hits, 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_check_vector_rejects_bad_output() {
        assert!(matches!(
            check_vector(vec![1.0, 2.0], 3),
            Err(EmbedderError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            check_vector(vec![0.0; 3], 3),
            Err(EmbedderError::Degenerate)
        ));
        assert!(matches!(
            check_vector(vec![f32::NAN, 1.0, 1.0], 3),
            Err(EmbedderError::Degenerate)
        ));
        assert!(check_vector(vec![0.0, 1.0, 0.0], 3).is_ok());
    }
}
