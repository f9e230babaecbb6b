use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

const DEFAULT_FILTER: &str = "goalmaker=info,tower_http=debug";

/// Installs the global subscriber. Output goes to stderr so `goalmaker ask`
/// keeps stdout for the completion alone.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let (pretty, json) = match config.format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();

    if let Ok(val) = std::env::var("LOG_FORMAT") {
        if let Err(e) = val.parse::<LogFormat>() {
            tracing::warn!("Invalid value '{}' for LOG_FORMAT: {}. Using default.", val, e);
        }
    }
}
