//! Relay — turns one profile into one gateway call and relays the tool-call
//! arguments back as `Recommendations`.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::profile::Profile;
use crate::recommendation::models::Recommendations;
use crate::recommendation::prompts::{recommendation_prompt, recommendation_tool, system_prompt};

/// Asks the gateway for recommendations for `profile`.
///
/// Exactly one outbound call is made. Upstream 429/402 surface as
/// `AppError::RateLimited`/`AppError::CreditsExhausted`, a response without a
/// tool call as `AppError::NoToolCall`, anything else as `AppError::Llm`.
pub async fn recommend(
    profile: &Profile,
    llm: &LlmClient,
    api_key: &str,
) -> Result<Recommendations, AppError> {
    let prompt = recommendation_prompt(profile);
    let tool = recommendation_tool();

    let recommendations: Recommendations = llm
        .call_tool_json(api_key, &system_prompt(), &prompt, &tool)
        .await?;

    let issues = recommendations.conformance_issues();
    if !issues.is_empty() {
        warn!("Recommendations deviate from schema: {}", issues.join("; "));
    }

    info!(
        careers = recommendations.careers.len(),
        skills = recommendations.skills.len(),
        "Recommendations relayed"
    );

    Ok(recommendations)
}
