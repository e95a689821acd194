use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use career_advisor_api::config::{Config, GatewayCredential};
use career_advisor_api::llm_client;
use career_advisor_api::routes::build_router;
use career_advisor_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first. The gateway credential is resolved per request.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "career_advisor_api={0},tower_http={0}",
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Advisor API v{}", env!("CARGO_PKG_VERSION"));

    if let GatewayCredential::Env(var) = &config.credential {
        if std::env::var(var).is_err() {
            tracing::warn!("{var} is not set; recommendation requests will fail until it is");
        }
    }

    let state = AppState::new(config.clone())?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm_client::MODEL,
        state.llm.endpoint()
    );

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
