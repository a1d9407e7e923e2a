use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_LLM_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_IDENTITY_API_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub identity: IdentityConfig,
    pub port: u16,
    pub rust_log: String,
    /// Visits with no request for this long are evicted.
    pub visit_idle_timeout: Duration,
}

/// Everything the generation client needs. Passed explicitly, never read from globals.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_url: String,
    pub api_key: String,
    /// Provider id sent with federated sign-ins, e.g. `google.com`.
    pub federated_provider_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm: LlmConfig {
                api_url: env_or("LLM_API_URL", DEFAULT_LLM_API_URL),
                api_key: require_env("ANTHROPIC_API_KEY")?,
                model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
                max_tokens: env_or("LLM_MAX_TOKENS", "4096")
                    .parse::<u32>()
                    .context("LLM_MAX_TOKENS must be a positive integer")?,
            },
            identity: IdentityConfig {
                api_url: env_or("IDENTITY_API_URL", DEFAULT_IDENTITY_API_URL),
                api_key: require_env("IDENTITY_API_KEY")?,
                federated_provider_id: env_or("FEDERATED_PROVIDER_ID", "google.com"),
            },
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            visit_idle_timeout: Duration::from_secs(
                env_or("VISIT_IDLE_TIMEOUT_SECS", "1800")
                    .parse::<u64>()
                    .context("VISIT_IDLE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
