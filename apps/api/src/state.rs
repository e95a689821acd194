use std::time::Duration;

use crate::config::Config;
use crate::llm_client::{LlmClient, LlmError};

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data: every invocation is independent.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, LlmError> {
        let llm = LlmClient::new(
            config.gateway_url.clone(),
            Duration::from_secs(config.gateway_timeout_secs),
        )?;
        Ok(Self { llm, config })
    }
}
