//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

/// Telegram channel settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    /// User ids or usernames allowed to talk to the bot; `*` allows everyone.
    pub allowed_users: Vec<String>,
}

/// Bot configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub llm: LlmConfig,
    /// Overrides the default career-consultant instruction.
    pub system_prompt: Option<String>,
    pub db_path: PathBuf,
    /// `None` disables the Telegram channel.
    pub telegram: Option<TelegramConfig>,
    /// Whether to read messages from stdin.
    pub cli_enabled: bool,
    /// Open dialogues idle for longer than this are dropped.
    pub session_idle_timeout: Duration,
    /// How often the pruning task runs.
    pub prune_interval: Duration,
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend: LlmBackend = match get("CAREER_QUEST_LLM_BACKEND") {
            Some(value) => value.parse()?,
            None => LlmBackend::Gemini,
        };
        let key_var = backend.api_key_var();
        let api_key = get(key_var).ok_or_else(|| ConfigError::MissingEnvVar(key_var.to_string()))?;
        let model = get("CAREER_QUEST_MODEL").unwrap_or_else(|| backend.default_model().to_string());

        let telegram = get("TELEGRAM_BOT_TOKEN").map(|token| TelegramConfig {
            bot_token: SecretString::from(token),
            allowed_users: parse_allowed_users(
                &get("TELEGRAM_ALLOWED_USERS").unwrap_or_else(|| "*".to_string()),
            ),
        });

        let cli_enabled = match get("CAREER_QUEST_CLI") {
            Some(value) => parse_flag("CAREER_QUEST_CLI", &value)?,
            None => telegram.is_none(),
        };

        let session_idle_timeout = match get("CAREER_QUEST_SESSION_IDLE_SECS") {
            Some(value) => Duration::from_secs(value.trim().parse().map_err(|_| {
                ConfigError::InvalidValue {
                    key: "CAREER_QUEST_SESSION_IDLE_SECS".to_string(),
                    message: format!("expected a number of seconds, got '{value}'"),
                }
            })?),
            None => Duration::from_secs(3600), // 1 hour
        };

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key: SecretString::from(api_key),
                model,
            },
            system_prompt: get("CAREER_QUEST_SYSTEM_PROMPT"),
            db_path: get("CAREER_QUEST_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/careerquest.db")),
            telegram,
            cli_enabled,
            session_idle_timeout,
            prune_interval: Duration::from_secs(600), // 10 minutes
        })
    }
}

fn parse_allowed_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected 1 or 0, got '{other}'"),
        }),
    }
}
