// Recommendation relay: profile in, structured career recommendations out.
// All gateway calls go through llm_client; this module owns the prompt,
// the tool schema and the HTTP handler.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod relay;

pub use models::{Career, Recommendations, Relevance};
