use std::sync::Arc;

use secrecy::ExposeSecret;

use career_quest::bot::{BotSettings, CareerBot};
use career_quest::career::{CommandRouter, DialogueController, SessionManager};
use career_quest::channels::{ChannelManager, CliChannel, TelegramChannel};
use career_quest::config::BotConfig;
use career_quest::llm::{GenerationGateway, create_provider};
use career_quest::store::{LibSqlBackend, ProfileStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install rustls crypto provider before any TLS usage
    let _ = rustls::crypto::ring::default_provider().install_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("  export GEMINI_API_KEY=...");
        std::process::exit(1);
    });

    eprintln!("🧭 CareerQuest v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);

    // ── Database ─────────────────────────────────────────────────────────
    let store: Arc<dyn ProfileStore> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .unwrap_or_else(|e| {
                eprintln!(
                    "Error: Failed to open database at {}: {}",
                    config.db_path.display(),
                    e
                );
                std::process::exit(1);
            }),
    );
    eprintln!("   Database: {}", config.db_path.display());

    // ── Generation ──────────────────────────────────────────────────────
    let llm = create_provider(&config.llm)?;
    let mut gateway = GenerationGateway::new(llm);
    if let Some(ref prompt) = config.system_prompt {
        gateway = gateway.with_system_instruction(prompt.clone());
    }
    let gateway = Arc::new(gateway);

    // ── Channels ────────────────────────────────────────────────────────
    let mut channels = ChannelManager::new();

    if config.cli_enabled {
        channels.add(Box::new(CliChannel::new()));
    }

    if let Some(ref telegram) = config.telegram {
        let users = &telegram.allowed_users;
        eprintln!(
            "   Telegram: enabled (allowed: {})",
            if users.iter().any(|u| u == "*") {
                "everyone".to_string()
            } else {
                users.join(", ")
            }
        );
        channels.add(Box::new(TelegramChannel::new(
            telegram.bot_token.expose_secret().to_string(),
            telegram.allowed_users.clone(),
        )));
    }

    eprintln!("   Channels: {}\n", channels.names().join(", "));

    // ── Bot ─────────────────────────────────────────────────────────────
    let sessions = Arc::new(SessionManager::new());
    let dialogue = DialogueController::new(
        Arc::clone(&store),
        Arc::clone(&gateway),
        Arc::clone(&sessions),
    );
    let router = CommandRouter::new(dialogue, store, gateway);

    let settings = BotSettings {
        session_idle_timeout: config.session_idle_timeout,
        prune_interval: config.prune_interval,
    };
    CareerBot::new(channels, router, sessions, settings)
        .run()
        .await?;

    Ok(())
}
