use std::sync::Arc;

use crate::application::ports::embedding_port::EmbeddingPort;
use crate::application::ports::index_outbox_repository::IndexOutboxRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::search_index_port::SearchIndexPort;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    post_repo: Arc<dyn PostRepository>,
    index_outbox: Arc<dyn IndexOutboxRepository>,
    embeddings: Arc<dyn EmbeddingPort>,
    search_index: Arc<dyn SearchIndexPort>,
}

impl AppServices {
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        index_outbox: Arc<dyn IndexOutboxRepository>,
        embeddings: Arc<dyn EmbeddingPort>,
        search_index: Arc<dyn SearchIndexPort>,
    ) -> Self {
        Self {
            post_repo,
            index_outbox,
            embeddings,
            search_index,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn post_repo(&self) -> Arc<dyn PostRepository> {
        self.services.post_repo.clone()
    }

    pub fn index_outbox(&self) -> Arc<dyn IndexOutboxRepository> {
        self.services.index_outbox.clone()
    }

    pub fn embeddings(&self) -> Arc<dyn EmbeddingPort> {
        self.services.embeddings.clone()
    }

    pub fn search_index(&self) -> Arc<dyn SearchIndexPort> {
        self.services.search_index.clone()
    }
}
