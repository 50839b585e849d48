//! HTTP embedding client for OpenAI-compatible embedding endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{Embedder, DEFAULT_DIMENSIONS};
use crate::{Error, ErrorContext, Result};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

/// Embedder backed by an OpenAI-compatible `/v1/embeddings` endpoint.
///
/// Every failure mode (transport error, non-2xx status, malformed body,
/// wrong vector width) is reported as [`Error::EmbeddingUnavailable`], the
/// single signal callers use to degrade to exact-key matching.
pub struct HttpEmbedder {
    http_client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: String,
    dimensions: usize,
}

impl HttpEmbedder {
    pub fn builder() -> HttpEmbedderBuilder {
        HttpEmbedderBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn execute(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
            dimensions: self.dimensions,
        };
        let endpoint = format!("{}/v1/embeddings", self.base_url);
        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                Error::embedding_unavailable_with_context(
                    format!("Embedding request failed: {}", e),
                    ErrorContext::new().with_source("embeddings"),
                )
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::embedding_unavailable(format!("Failed to read embedding response: {}", e))
        })?;
        if !status.is_success() {
            return Err(Error::embedding_unavailable(format!(
                "Embedding API error ({}): {}",
                status, body
            )));
        }
        let parsed: EmbeddingResponse = serde_json::from_str(&body).map_err(|e| {
            Error::embedding_unavailable(format!("Malformed embedding response: {}", e))
        })?;
        let row = parsed.data.into_iter().next().ok_or_else(|| {
            Error::embedding_unavailable("Embedding response contained no vectors")
        })?;
        if row.embedding.len() != self.dimensions {
            return Err(Error::embedding_unavailable(format!(
                "Embedding width mismatch: expected {}, got {}",
                self.dimensions,
                row.embedding.len()
            )));
        }
        Ok(row.embedding)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.execute(text).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

pub struct HttpEmbedderBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    dimensions: usize,
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    std::env::var("GENCACHE_EMBED_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

impl HttpEmbedderBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
            dimensions: DEFAULT_DIMENSIONS,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Requested and enforced vector width. Sent as the `dimensions`
    /// parameter and validated against every response.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub async fn build(self) -> Result<HttpEmbedder> {
        let model = self
            .model
            .ok_or_else(|| Error::configuration("Model must be specified"))?;
        let api_key = self
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| Error::configuration("API key required"))?;
        if self.dimensions == 0 {
            return Err(Error::configuration(
                "Embedding dimensions must be at least 1",
            ));
        }
        let base_url = self
            .base_url
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(HttpEmbedder {
            http_client,
            model,
            base_url,
            api_key,
            dimensions: self.dimensions,
        })
    }
}

impl Default for HttpEmbedderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
