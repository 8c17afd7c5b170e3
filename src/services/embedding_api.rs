use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{EmbeddingBackend, EmbeddingSettings, RemoteEmbeddingSettings};
use crate::core::embedder::{EmbedderError, EmbeddingModel, ModelProvider};
use crate::core::hashed_model::HashedNgramModel;

/// Errors that can occur when calling a remote embedding API
#[derive(Debug, Error)]
pub enum EmbeddingApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<EmbeddingApiError> for EmbedderError {
    fn from(value: EmbeddingApiError) -> Self {
        EmbedderError::Api(value.to_string())
    }
}

/// Embedding model served over HTTP
///
/// POSTs `{"model": ..., "input": ...}` and accepts either
/// `{"embedding": [...]}` or `{"data": [{"embedding": [...]}]}`.
pub struct RemoteEmbeddingModel {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
    client: Client,
}

impl RemoteEmbeddingModel {
    /// Create a new remote embedding client
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            model,
            api_key,
            dimension,
            client,
        })
    }

    pub fn from_settings(
        remote: &RemoteEmbeddingSettings,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingApiError> {
        Self::new(
            remote.endpoint.clone(),
            remote.model.clone(),
            remote.api_key.clone(),
            dimension,
            timeout,
        )
    }

    /// Request the embedding for one text
    pub async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingApiError> {
        let body = json!({
            "model": self.model,
            "input": text,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        tracing::debug!(
            "Requesting embedding from {} ({} chars)",
            self.endpoint,
            text.len()
        );

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(EmbeddingApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Embedding API returned {}: {}", status, body);
            return Err(EmbeddingApiError::ApiError(format!(
                "Failed to embed text: {}",
                status
            )));
        }

        let json: Value = response.json().await?;
        parse_embedding(&json)
    }
}

fn parse_embedding(json: &Value) -> Result<Vec<f32>, EmbeddingApiError> {
    let values = json
        .get("embedding")
        .or_else(|| {
            json.get("data")
                .and_then(|d| d.as_array())
                .and_then(|d| d.first())
                .and_then(|first| first.get("embedding"))
        })
        .and_then(|e| e.as_array())
        .ok_or_else(|| EmbeddingApiError::InvalidResponse("Missing embedding array".into()))?;

    values
        .iter()
        .map(|v| {
            v.as_f64().map(|f| f as f32).ok_or_else(|| {
                EmbeddingApiError::InvalidResponse("Non-numeric embedding value".into())
            })
        })
        .collect()
}

#[async_trait]
impl EmbeddingModel for RemoteEmbeddingModel {
    fn name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        Ok(self.request_embedding(text).await?)
    }
}

/// Loads whichever embedding model the settings select
pub struct ConfiguredModelProvider {
    settings: EmbeddingSettings,
}

impl ConfiguredModelProvider {
    pub fn new(settings: EmbeddingSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ModelProvider for ConfiguredModelProvider {
    async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EmbedderError> {
        match self.settings.backend {
            EmbeddingBackend::Hashed => {
                Ok(Arc::new(HashedNgramModel::new(self.settings.dimension)))
            }
            EmbeddingBackend::Remote => {
                let remote = self.settings.remote.as_ref().ok_or_else(|| {
                    EmbedderError::ModelUnavailable(
                        "remote backend selected but embedding.remote is not configured"
                            .to_string(),
                    )
                })?;
                let model = RemoteEmbeddingModel::from_settings(
                    remote,
                    self.settings.dimension,
                    Duration::from_millis(self.settings.timeout_ms),
                )
                .map_err(|e| EmbedderError::ModelUnavailable(e.to_string()))?;
                Ok(Arc::new(model))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_model(endpoint: String, dimension: usize) -> RemoteEmbeddingModel {
        RemoteEmbeddingModel::new(
            endpoint,
            "test-embed".to_string(),
            Some("test_key".to_string()),
            dimension,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_embedding_formats() {
        let flat = json!({"embedding": [0.5, -0.25, 1.0]});
        assert_eq!(parse_embedding(&flat).unwrap(), vec![0.5, -0.25, 1.0]);

        let wrapped = json!({"data": [{"embedding": [1.0, 2.0]}]});
        assert_eq!(parse_embedding(&wrapped).unwrap(), vec![1.0, 2.0]);

        assert!(parse_embedding(&json!({"result": []})).is_err());
        assert!(parse_embedding(&json!({"embedding": ["x"]})).is_err());
    }

    #[tokio::test]
    async fn test_remote_embedding_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embed")
            .match_header("authorization", "Bearer test_key")
            .match_body(mockito::Matcher::PartialJson(
                json!({"model": "test-embed", "input": "hello"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": [{"embedding": [0.1, 0.2, 0.3]}]}"#)
            .create_async()
            .await;

        let model = remote_model(format!("{}/embed", server.url()), 3);
        let vector = model.embed("hello").await.unwrap();

        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remote_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embed")
            .with_status(401)
            .create_async()
            .await;

        let model = remote_model(format!("{}/embed", server.url()), 3);
        let result = model.request_embedding("hello").await;

        assert!(matches!(result, Err(EmbeddingApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_remote_server_error_maps_to_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embed")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let model = remote_model(format!("{}/embed", server.url()), 3);
        let result = model.embed("hello").await;

        assert!(matches!(result, Err(EmbedderError::Api(_))));
    }

    #[tokio::test]
    async fn test_provider_loads_hashed_by_default() {
        let provider = ConfiguredModelProvider::new(EmbeddingSettings::default());
        let model = provider.load().await.unwrap();

        assert_eq!(model.name(), "hashed-ngram");
        assert_eq!(model.dimension(), 384);
    }

    #[tokio::test]
    async fn test_provider_requires_remote_settings() {
        let settings = EmbeddingSettings {
            backend: EmbeddingBackend::Remote,
            ..EmbeddingSettings::default()
        };
        let provider = ConfiguredModelProvider::new(settings);

        assert!(matches!(
            provider.load().await,
            Err(EmbedderError::ModelUnavailable(_))
        ));
    }
}
