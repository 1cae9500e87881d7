mod gateway;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use sugarlady_channels::line::LineChannel;
use sugarlady_core::config::Config;
use sugarlady_core::prompt::{build_prompt, Persona};
use sugarlady_core::traits::Provider;
use sugarlady_memory::ConversationStore;
use sugarlady_providers::gemini::GeminiProvider;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "sugarlady",
    version,
    about = "蘇格拉底雞 — LINE mascot bot for 北一資研"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server.
    Start,
    /// Check configuration and provider availability.
    Status,
    /// Ask the bot a one-shot question (no server, no LINE).
    Ask {
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

/// Required environment variables, in the order `status` reports them.
const REQUIRED_VARS: [&str; 3] = [
    "LINE_CHANNEL_SECRET",
    "LINE_CHANNEL_ACCESS_TOKEN",
    "GOOGLE_API_KEY",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let cfg = Config::from_env()?;

            let provider = GeminiProvider::from_config(&cfg.gemini);
            if !provider.is_available().await {
                warn!(
                    "provider '{}' is not reachable; replies will carry error text until it recovers",
                    provider.name()
                );
            }

            let channel = LineChannel::new(&cfg.line);
            let state = gateway::AppState::new(
                Arc::new(provider),
                Arc::new(channel),
                ConversationStore::new(),
                Persona::default(),
                cfg.line.channel_secret.clone(),
            );

            println!("蘇格拉底雞 — starting webhook server...");
            gateway::serve(&cfg.server, state).await?;
        }
        Commands::Status => {
            println!("蘇格拉底雞 — Status Check\n");
            for var in REQUIRED_VARS {
                let set = std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false);
                println!("  {var}: {}", if set { "set" } else { "missing" });
            }
            println!();

            match Config::from_env() {
                Ok(cfg) => {
                    let provider = GeminiProvider::from_config(&cfg.gemini);
                    let available = provider.is_available().await;
                    println!(
                        "  gemini ({}): {}",
                        cfg.gemini.model,
                        if available { "available" } else { "not reachable" }
                    );
                }
                Err(e) => println!("  {e}"),
            }
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: sugarlady ask <message>");
            }

            let user_text = message.join(" ");
            let cfg = Config::from_env()?;
            let provider = GeminiProvider::from_config(&cfg.gemini);

            if !provider.is_available().await {
                anyhow::bail!(
                    "provider '{}' is not available. Is GOOGLE_API_KEY valid?",
                    provider.name()
                );
            }

            let prompt = build_prompt(&Persona::default(), &[], &user_text);
            let reply = provider.generate(&prompt).await?;
            println!("{reply}");
        }
    }

    Ok(())
}
