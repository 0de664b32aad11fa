use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::embedding_port::EmbeddingPort;
use crate::application::services::indexing::IndexingError;
use crate::bootstrap::config::Config;

/// Embedding client for an OpenAI-compatible deployments endpoint.
/// One shared `reqwest::Client`; constructed once at startup.
pub struct ReqwestEmbeddingClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl ReqwestEmbeddingClient {
    pub fn from_config(cfg: &Config) -> Self {
        let url = format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            cfg.embedding_endpoint.trim_end_matches('/'),
            cfg.embedding_deployment,
            cfg.embedding_api_version
        );
        Self {
            client: reqwest::Client::new(),
            url,
            api_key: cfg.embedding_api_key.clone(),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ProviderError {
    error: Option<ProviderErrorBody>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// Pulls `error.message` out of an upstream failure body, falling back to
/// the raw body when it does not match that shape.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ProviderError>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string())
}

/// A 2xx body missing `data[0].embedding` is rejected, not defaulted.
fn parse_embedding_body(body: &str) -> Result<Vec<f32>, IndexingError> {
    let parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| IndexingError::EmbeddingProvider(format!("malformed embedding response: {e}")))?;
    let first = parsed.data.into_iter().next().ok_or_else(|| {
        IndexingError::EmbeddingProvider("embedding response carried no data entries".into())
    })?;
    if first.embedding.is_empty() {
        return Err(IndexingError::EmbeddingProvider(
            "embedding response carried an empty vector".into(),
        ));
    }
    Ok(first.embedding)
}

#[async_trait]
impl EmbeddingPort for ReqwestEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexingError> {
        if text.trim().is_empty() {
            return Err(IndexingError::EmptyInput);
        }
        let resp = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&EmbeddingRequest { input: text })
            .send()
            .await
            .map_err(|e| IndexingError::EmbeddingProvider(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| IndexingError::EmbeddingProvider(e.to_string()))?;
        if !status.is_success() {
            return Err(IndexingError::EmbeddingProvider(provider_message(&body)));
        }
        parse_embedding_body(&body)
    }
}
