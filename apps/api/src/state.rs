use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Generation backend. Default: `LlmClient` against the configured Ollama endpoint.
    pub llm: Arc<dyn TextGenerator>,
    pub sessions: SessionStore,
}
