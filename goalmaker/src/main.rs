use std::sync::Arc;

use clap::{Parser, Subcommand};

use goalmaker::api::serve;
use goalmaker::config::{Config, LoggingConfig};
use goalmaker::llm::{CompletionRequester, GoalRequester};
use goalmaker::telemetry;

#[derive(Parser)]
#[command(name = "goalmaker")]
#[command(about = "Turns a goal into suggestions from a hosted language model")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Bind host, overrides GOALS_HOST
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides GOALS_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send one prompt and print the completion
    Ask {
        /// Prompt text, forwarded unchanged
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    telemetry::init(&LoggingConfig::from_env());
    let mut config = Config::from_env();

    tracing::info!("Initializing LLM provider: {}...", config.llm.model);
    let requester = GoalRequester::new(&config.llm)?;
    tracing::info!(
        provider = requester.backend().name(),
        base_url = requester.base_url(),
        "LLM provider ready"
    );

    match args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Ask { prompt } => {
            let completion = requester.request_completion(&prompt).await?;
            println!("{completion}");
            Ok(())
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, Arc::new(requester)).await?;
            Ok(())
        }
    }
}
