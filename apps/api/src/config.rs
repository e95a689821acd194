use anyhow::{Context, Result};

use crate::errors::AppError;
use crate::llm_client::DEFAULT_GATEWAY_URL;

const DEFAULT_KEY_VAR: &str = "LOVABLE_API_KEY";

/// Where the AI gateway credential comes from.
///
/// The credential is resolved on every request rather than at startup, so a
/// missing secret fails individual requests instead of the whole process.
#[derive(Debug, Clone)]
pub enum GatewayCredential {
    /// Read the named environment variable at request time.
    Env(String),
    /// A fixed key, used by tests and embedders that manage secrets themselves.
    Static(String),
}

impl GatewayCredential {
    pub fn resolve(&self) -> Result<String, AppError> {
        let key = match self {
            GatewayCredential::Env(var) => std::env::var(var)
                .map_err(|_| AppError::MissingCredential(format!("{var} is not configured")))?,
            GatewayCredential::Static(key) => key.clone(),
        };

        if key.trim().is_empty() {
            return Err(AppError::MissingCredential(
                "AI gateway credential is empty".to_string(),
            ));
        }
        Ok(key)
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub gateway_url: String,
    pub gateway_timeout_secs: u64,
    pub credential: GatewayCredential,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let key_var =
            std::env::var("AI_GATEWAY_KEY_VAR").unwrap_or_else(|_| DEFAULT_KEY_VAR.to_string());

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            gateway_url: std::env::var("AI_GATEWAY_URL")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string()),
            gateway_timeout_secs: std::env::var("AI_GATEWAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("AI_GATEWAY_TIMEOUT_SECS must be a whole number of seconds")?,
            credential: GatewayCredential::Env(key_var),
        })
    }
}
