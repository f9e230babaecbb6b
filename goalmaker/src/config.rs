use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// Reads a variable, treating an empty value the same as an unset one.
fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

pub const DEFAULT_LLM_MODEL: &str = "groq/llama3-8b-8192";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Chat-completion model settings. The model is fixed for the lifetime of the
/// process.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    // Unset means the transport default applies
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        let model = non_empty_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());
        let api_key = non_empty_env("LLM_API_KEY").or_else(|| {
            let (provider, _) = parse_llm_provider_model(&model);
            provider_api_key_var(provider).and_then(non_empty_env)
        });

        Self {
            server: ServerConfig {
                host: env::var("GOALS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: parse_env_or("GOALS_PORT", 8000),
            },
            llm: LlmConfig {
                model,
                api_key,
                base_url: non_empty_env("LLM_BASE_URL"),
                timeout_secs: parse_env_opt("LLM_TIMEOUT"),
            },
            logging: LoggingConfig::from_env(),
        }
    }
}

impl LoggingConfig {
    /// Loaded ahead of the rest of [`Config`] so the subscriber is installed
    /// before other variables are parsed. An unknown `LOG_FORMAT` is reported
    /// by [`crate::telemetry::init`].
    pub fn from_env() -> Self {
        let format = match env::var("LOG_FORMAT") {
            Ok(val) => val.parse().unwrap_or(LogFormat::Pretty),
            Err(_) => LogFormat::Pretty,
        };

        Self { format }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "groq", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

/// Provider-specific key variable consulted when `LLM_API_KEY` is unset.
pub fn provider_api_key_var(provider: &str) -> Option<&'static str> {
    match provider.to_lowercase().as_str() {
        "groq" => Some("GROQ_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_llm_env() {
        for var in [
            "LLM_MODEL",
            "LLM_API_KEY",
            "LLM_BASE_URL",
            "LLM_TIMEOUT",
            "GROQ_API_KEY",
            "OPENAI_API_KEY",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        env::remove_var("GOALS_HOST");
        env::remove_var("GOALS_PORT");

        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back_to_default() {
        env::set_var("GOALS_PORT", "not-a-port");
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        env::remove_var("GOALS_PORT");
    }

    #[test]
    #[serial]
    fn test_llm_config_defaults() {
        clear_llm_env();

        let config = Config::default();
        assert_eq!(config.llm.model, DEFAULT_LLM_MODEL);
        assert!(config.llm.api_key.is_none());
        assert!(config.llm.base_url.is_none());
        assert!(config.llm.timeout_secs.is_none());
    }

    #[test]
    #[serial]
    fn test_groq_key_fallback() {
        clear_llm_env();
        env::set_var("GROQ_API_KEY", "gsk-test");

        let config = Config::default();
        assert_eq!(config.llm.api_key.as_deref(), Some("gsk-test"));

        clear_llm_env();
    }

    #[test]
    #[serial]
    fn test_generic_key_wins_over_provider_key() {
        clear_llm_env();
        env::set_var("LLM_API_KEY", "generic");
        env::set_var("GROQ_API_KEY", "gsk-test");

        let config = Config::default();
        assert_eq!(config.llm.api_key.as_deref(), Some("generic"));

        clear_llm_env();
    }

    #[test]
    #[serial]
    fn test_provider_key_not_used_for_other_provider() {
        clear_llm_env();
        env::set_var("LLM_MODEL", "openai/gpt-4o-mini");
        env::set_var("GROQ_API_KEY", "gsk-test");

        let config = Config::default();
        assert!(config.llm.api_key.is_none());

        clear_llm_env();
    }

    #[test]
    #[serial]
    fn test_empty_api_key_is_unset() {
        clear_llm_env();
        env::set_var("LLM_API_KEY", "   ");

        let config = Config::default();
        assert!(config.llm.api_key.is_none());

        clear_llm_env();
    }

    #[test]
    #[serial]
    fn test_log_format_from_env() {
        env::set_var("LOG_FORMAT", "JSON");
        assert_eq!(Config::default().logging.format, LogFormat::Json);

        env::set_var("LOG_FORMAT", "fancy");
        assert_eq!(Config::default().logging.format, LogFormat::Pretty);

        env::remove_var("LOG_FORMAT");
    }

    #[test]
    #[serial]
    fn test_logging_config_loads_on_its_own() {
        env::set_var("LOG_FORMAT", "json");
        env::set_var("GOALS_PORT", "not-a-port");

        assert_eq!(LoggingConfig::from_env().format, LogFormat::Json);

        env::remove_var("LOG_FORMAT");
        assert_eq!(LoggingConfig::from_env().format, LogFormat::Pretty);
        env::remove_var("GOALS_PORT");
    }

    #[test]
    fn test_provider_api_key_var() {
        assert_eq!(provider_api_key_var("groq"), Some("GROQ_API_KEY"));
        assert_eq!(provider_api_key_var("OpenAI"), Some("OPENAI_API_KEY"));
        assert_eq!(provider_api_key_var("ollama"), None);
    }
}
