use async_trait::async_trait;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::Result;
use crate::llm::api::LlmApiClient;
use crate::llm::requester::CompletionRequester;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    Groq,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
}

impl LlmBackend {
    pub fn name(&self) -> &'static str {
        match self {
            LlmBackend::OpenAI => "openai",
            LlmBackend::Groq => "groq",
            LlmBackend::OpenRouter => "openrouter",
            LlmBackend::Ollama => "ollama",
            LlmBackend::LmStudio => "lmstudio",
            LlmBackend::OpenAICompatible { .. } => "openai-compatible",
        }
    }

    fn detect(config: &LlmConfig, client: &LlmApiClient) -> Self {
        let (provider, _) = parse_llm_provider_model(&config.model);

        match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "groq" => LlmBackend::Groq,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => LlmBackend::OpenAICompatible {
                base_url: client.base_url().to_string(),
            },
        }
    }
}

/// Turns a goal (or any instruction) into the model's answer.
///
/// The endpoint, credentials and model are resolved once in [`GoalRequester::new`];
/// a missing key fails there rather than on the first request.
#[derive(Clone)]
pub struct GoalRequester {
    backend: LlmBackend,
    client: LlmApiClient,
}

impl GoalRequester {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = LlmApiClient::new(config)?;
        let backend = LlmBackend::detect(config, &client);

        Ok(Self { backend, client })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl CompletionRequester for GoalRequester {
    async fn request_completion(&self, prompt: &str) -> Result<String> {
        self.client.complete(prompt).await
    }
}

impl std::fmt::Debug for GoalRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalRequester")
            .field("backend", &self.backend)
            .field("model", &self.model())
            .field("base_url", &self.base_url())
            .finish()
    }
}
