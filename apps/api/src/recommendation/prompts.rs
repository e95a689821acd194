// All LLM prompt constants for the recommendation relay.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::json;

use crate::llm_client::prompts::tool_only_instruction;
use crate::llm_client::FunctionDefinition;
use crate::profile::Profile;
use crate::recommendation::models::{CAREER_COUNT, MAX_SKILLS, MIN_SKILLS};

pub const TOOL_NAME: &str = "provide_recommendations";

const ADVISOR_PERSONA: &str = "You are an expert career and education advisor.";

pub fn system_prompt() -> String {
    format!("{ADVISOR_PERSONA} {}", tool_only_instruction(TOOL_NAME))
}

/// Embeds the profile verbatim.
pub fn recommendation_prompt(profile: &Profile) -> String {
    format!(
        "You are a career and education advisor. A student has the following profile:
- Interests: {}
- Degree: {}
- CGPA: {}/4.0
- Career Goal: {}

Based on this profile, provide personalized career recommendations using the {TOOL_NAME} function.",
        profile.interests, profile.degree, profile.cgpa, profile.career_goal
    )
}

/// The function the model is forced to call. The upstream provider enforces
/// this schema; nothing here re-checks it.
pub fn recommendation_tool() -> FunctionDefinition {
    FunctionDefinition {
        name: TOOL_NAME,
        description: "Provide structured career recommendations for a student.",
        parameters: json!({
            "type": "object",
            "properties": {
                "careers": {
                    "type": "array",
                    "description": "Exactly 3 career suggestions",
                    "minItems": CAREER_COUNT,
                    "maxItems": CAREER_COUNT,
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "description": "Career title"
                            },
                            "description": {
                                "type": "string",
                                "description": "Brief description of why this career fits (1-2 sentences)"
                            },
                            "relevance": {
                                "type": "string",
                                "enum": ["High", "Medium", "Low"],
                                "description": "How relevant this career is to the student's profile"
                            }
                        },
                        "required": ["title", "description", "relevance"],
                        "additionalProperties": false
                    }
                },
                "skills": {
                    "type": "array",
                    "description": "5-8 skills the student should learn",
                    "minItems": MIN_SKILLS,
                    "maxItems": MAX_SKILLS,
                    "items": { "type": "string" }
                },
                "advice": {
                    "type": "string",
                    "description": "A short personalized paragraph of guidance (3-5 sentences)"
                }
            },
            "required": ["careers", "skills", "advice"],
            "additionalProperties": false
        }),
    }
}
