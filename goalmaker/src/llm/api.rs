use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{GoalsError, Result},
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: Option<u64>,
}

/// Thin wrapper over the async-openai chat client bound to one endpoint and
/// one model.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let (provider, _) = parse_llm_provider_model(&config.model);

        if provider.eq_ignore_ascii_case("local") && config.base_url.is_none() {
            return Err(GoalsError::Config(format!(
                "Model '{}' has no known provider prefix; set LLM_BASE_URL for an OpenAI-compatible endpoint",
                config.model
            )));
        }

        let api_config = ApiConfig::from_llm_config(config);

        if requires_api_key(provider) && api_config.api_key.is_none() {
            return Err(GoalsError::Upstream(format!(
                "API key required for provider '{provider}'; set LLM_API_KEY"
            )));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let mut http_client = reqwest::Client::builder();
        if let Some(timeout_secs) = api_config.timeout_secs {
            http_client = http_client.timeout(Duration::from_secs(timeout_secs));
        }
        let http_client = http_client.build().map_err(|error| {
            GoalsError::Internal(format!("Failed to create LLM HTTP client: {error}"))
        })?;

        // async-openai retries 429/5xx internally with exponential backoff.
        // A zero elapsed-time budget makes every call a single attempt.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends `prompt` as the only user message and returns the reply verbatim.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(prompt)?;

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending chat completion request"
        );

        match self.client.chat().create(request).await {
            Ok(response) => {
                let content = Self::extract_content(response)?;
                tracing::debug!(response_len = content.len(), "LLM response received");
                Ok(content)
            }
            Err(error) => {
                let mapped = Self::map_openai_error(error);
                tracing::warn!(model = %self.config.model, error = %mapped, "LLM request failed");
                Err(mapped)
            }
        }
    }

    fn build_request(&self, prompt: &str) -> Result<CreateChatCompletionRequest> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|error| GoalsError::Internal(format!("Invalid user prompt: {error}")))?
            .into()];

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(messages)
            .build()
            .map_err(|error| {
                GoalsError::Internal(format!("Invalid LLM completion request: {error}"))
            })
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GoalsError::Upstream("LLM response contained no choices".to_string()))?
            .message;

        Ok(message.content.unwrap_or_default())
    }

    fn map_openai_error(error: OpenAIError) -> GoalsError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => match reqwest_error.status() {
                Some(reqwest::StatusCode::UNAUTHORIZED) | Some(reqwest::StatusCode::FORBIDDEN) => {
                    GoalsError::Upstream(format!("LLM authentication failed: {reqwest_error}"))
                }
                Some(reqwest::StatusCode::TOO_MANY_REQUESTS) => {
                    GoalsError::Upstream(format!("LLM rate limit exceeded: {reqwest_error}"))
                }
                _ => GoalsError::Upstream(format!("LLM request failed: {reqwest_error}")),
            },
            OpenAIError::ApiError(api_error) if is_auth_api_error(&api_error) => {
                GoalsError::Upstream(format!("LLM authentication failed: {api_error}"))
            }
            OpenAIError::ApiError(api_error) if is_rate_limit_api_error(&api_error) => {
                GoalsError::Upstream(format!("LLM rate limit exceeded: {api_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                GoalsError::Upstream(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                GoalsError::Upstream(format!("Failed to parse LLM response: {err}"))
            }
            other => GoalsError::Upstream(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: model.to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

fn requires_api_key(provider: &str) -> bool {
    matches!(
        provider.to_lowercase().as_str(),
        "openai" | "groq" | "openrouter"
    )
}

fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
    let message = api_error.message.to_lowercase();
    let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
    let code = api_error.code.clone().unwrap_or_default().to_lowercase();

    message.contains("rate limit")
        || message.contains("too many requests")
        || error_type.contains("rate_limit")
        || code.contains("rate_limit")
        || code == "insufficient_quota"
}

fn is_auth_api_error(api_error: &ApiError) -> bool {
    let message = api_error.message.to_lowercase();
    let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
    let code = api_error.code.clone().unwrap_or_default().to_lowercase();

    message.contains("unauthorized")
        || message.contains("forbidden")
        || message.contains("invalid api key")
        || code.contains("invalid_api_key")
        || error_type.contains("authentication")
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "groq" => GROQ_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_llm_config(model: &str) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            api_key: Some("test-key".to_string()),
            base_url: None,
            timeout_secs: None,
        }
    }

    fn api_error(message: &str, error_type: Option<&str>, code: Option<&str>) -> ApiError {
        serde_json::from_value(serde_json::json!({
            "message": message,
            "type": error_type,
            "param": null,
            "code": code
        }))
        .expect("api error should deserialize")
    }

    #[test]
    fn test_build_request_has_single_user_message_and_bare_model() {
        let client = LlmApiClient::new(&test_llm_config("groq/llama3-8b-8192"))
            .expect("client should be created");

        let request = client
            .build_request("How do I boil an egg?")
            .expect("request should build");

        assert_eq!(request.model, "llama3-8b-8192");
        assert_eq!(request.messages.len(), 1);
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "How do I boil an egg?");
    }

    #[test]
    fn test_build_request_keeps_prompt_untouched() {
        let client =
            LlmApiClient::new(&test_llm_config("openai/gpt-4o-mini")).expect("client");

        let request = client.build_request("  padded  ").expect("request");
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["messages"][0]["content"], "  padded  ");
    }

    #[test]
    fn test_groq_default_base_url() {
        let client = LlmApiClient::new(&test_llm_config("groq/llama3-8b-8192")).expect("client");
        assert_eq!(client.base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(client.model(), "llama3-8b-8192");
    }

    #[test]
    fn test_base_url_override() {
        let mut config = test_llm_config("openai/gpt-4o-mini");
        config.base_url = Some("http://127.0.0.1:9999/v1".to_string());
        let client = LlmApiClient::new(&config).expect("client");
        assert_eq!(client.base_url(), "http://127.0.0.1:9999/v1");
    }

    #[test]
    fn test_missing_key_for_hosted_provider_is_upstream_error() {
        let mut config = test_llm_config("groq/llama3-8b-8192");
        config.api_key = None;

        match LlmApiClient::new(&config) {
            Err(GoalsError::Upstream(message)) => assert!(message.contains("API key required")),
            Err(other) => panic!("Expected Upstream error, got: {other:?}"),
            Ok(_) => panic!("Expected construction to fail without an API key"),
        }
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let mut config = test_llm_config("ollama/llama3.2");
        config.api_key = None;
        assert!(LlmApiClient::new(&config).is_ok());
    }

    #[test]
    fn test_unprefixed_model_without_base_url_is_config_error() {
        let config = test_llm_config("llama3-8b-8192");
        assert!(matches!(
            LlmApiClient::new(&config),
            Err(GoalsError::Config(_))
        ));
    }

    #[test]
    fn test_unprefixed_model_keeps_full_name() {
        let mut config = test_llm_config("my-org/custom-model");
        config.base_url = Some("http://localhost:8080/v1".to_string());
        let client = LlmApiClient::new(&config).expect("client");
        assert_eq!(client.model(), "my-org/custom-model");
    }

    #[test]
    fn test_auth_api_error_classification() {
        let error = OpenAIError::ApiError(api_error(
            "Invalid API Key",
            Some("invalid_request_error"),
            Some("invalid_api_key"),
        ));
        match LlmApiClient::map_openai_error(error) {
            GoalsError::Upstream(message) => assert!(message.contains("authentication failed")),
            other => panic!("Expected Upstream error, got: {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_api_error_classification() {
        let error = OpenAIError::ApiError(api_error(
            "Rate limit reached for model",
            Some("tokens"),
            Some("rate_limit_exceeded"),
        ));
        match LlmApiClient::map_openai_error(error) {
            GoalsError::Upstream(message) => assert!(message.contains("rate limit exceeded")),
            other => panic!("Expected Upstream error, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_model_is_plain_upstream_error() {
        let error = OpenAIError::ApiError(api_error(
            "The model `llama3-8b-8192` has been decommissioned",
            Some("invalid_request_error"),
            Some("model_decommissioned"),
        ));
        match LlmApiClient::map_openai_error(error) {
            GoalsError::Upstream(message) => assert!(message.starts_with("LLM API error")),
            other => panic!("Expected Upstream error, got: {other:?}"),
        }
    }
}
