use std::sync::Arc;

use crate::config::{parse_llm_provider_model, Config};
use crate::llm::CompletionRequester;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Shared by every handler; implementations are stateless.
    pub requester: Arc<dyn CompletionRequester>,
}

impl AppState {
    pub fn new(config: Config, requester: Arc<dyn CompletionRequester>) -> Self {
        Self {
            config: Arc::new(config),
            requester,
        }
    }

    /// `(provider, model)` as configured, without contacting the upstream.
    pub fn llm_identity(&self) -> (&str, &str) {
        parse_llm_provider_model(&self.config.llm.model)
    }
}
