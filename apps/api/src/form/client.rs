//! Transport from the form to the relay function.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::profile::Profile;
use crate::recommendation::Recommendations;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/functions/v1/career-advisor";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered with an `{"error": ...}` body.
    #[error("{message}")]
    Relay { status: u16, message: String },

    /// Non-2xx without a readable error body.
    #[error("Relay returned status {0}")]
    Status(u16),

    /// 2xx whose body is not a recommendations object.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Anything that can turn a validated profile into recommendations.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(&self, profile: &Profile) -> Result<Recommendations, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the relay endpoint.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
    anon_key: Option<String>,
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            anon_key: None,
        }
    }

    /// Sends `apikey` and a bearer token with every request, as hosted
    /// function platforms expect from browser clients.
    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecommendationSource for RelayClient {
    async fn recommend(&self, profile: &Profile) -> Result<Recommendations, ClientError> {
        let mut request = self.client.post(&self.endpoint).json(profile);
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        interpret_response(status.as_u16(), &body)
    }
}

/// Maps a relay response to recommendations or a client error.
/// An `error` field wins over the status code.
pub fn interpret_response(status: u16, body: &str) -> Result<Recommendations, ClientError> {
    if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(body) {
        return Err(ClientError::Relay {
            status,
            message: error,
        });
    }

    if !(200..300).contains(&status) {
        return Err(ClientError::Status(status));
    }

    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}
