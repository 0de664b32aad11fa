use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::search_index_port::SearchIndexPort;
use crate::application::services::indexing::{IndexingError, PostIndexDocument, RagChunkDocument};
use crate::bootstrap::config::Config;

/// Upload client for the two external search indexes. Documents carry
/// their own `@search.action`; this adapter only wraps them in the batch
/// envelope and reports any non-2xx as a single aggregate failure, body
/// preserved verbatim for the outbox.
pub struct ReqwestSearchIndexClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    blog_index: String,
    rag_index: String,
    api_version: String,
}

impl ReqwestSearchIndexClient {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: cfg.search_endpoint.trim_end_matches('/').to_string(),
            api_key: cfg.search_api_key.clone(),
            blog_index: cfg.blog_index_name.clone(),
            rag_index: cfg.rag_index_name.clone(),
            api_version: cfg.search_api_version.clone(),
        }
    }

    fn docs_url(&self, index: &str) -> String {
        format!(
            "{}/indexes/{}/docs/index?api-version={}",
            self.endpoint, index, self.api_version
        )
    }

    async fn upload<T: Serialize + Sync>(
        &self,
        index: &str,
        docs: &[T],
    ) -> Result<(), IndexingError> {
        let resp = self
            .client
            .post(self.docs_url(index))
            .header("api-key", &self.api_key)
            .json(&IndexBatch { value: docs })
            .send()
            .await
            .map_err(|e| IndexingError::IndexUpload(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".into());
            return Err(IndexingError::IndexUpload(format!(
                "{index} returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct IndexBatch<'a, T> {
    value: &'a [T],
}

#[async_trait]
impl SearchIndexPort for ReqwestSearchIndexClient {
    async fn upload_post(&self, doc: &PostIndexDocument) -> Result<(), IndexingError> {
        self.upload(&self.blog_index, std::slice::from_ref(doc))
            .await
    }

    async fn upload_chunks(&self, docs: &[RagChunkDocument]) -> Result<(), IndexingError> {
        self.upload(&self.rag_index, docs).await
    }
}
