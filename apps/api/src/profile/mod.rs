//! The student profile: the four fields every recommendation request carries.
//!
//! Shared by the relay handler (server-side validation) and the terminal form
//! (client-side validation), so both sides enforce the same rules.

use serde::{Deserialize, Serialize};

pub mod validation;

pub use validation::{validate_profile, FieldError, ProfileField, ValidationErrors};

pub const MAX_INTERESTS_CHARS: usize = 500;
pub const MAX_CAREER_GOAL_CHARS: usize = 300;
pub const MIN_CGPA: f64 = 0.0;
pub const MAX_CGPA: f64 = 4.0;

/// Degrees a student may pick from.
pub const DEGREES: &[&str] = &[
    "Computer Science",
    "Information Technology",
    "Software Engineering",
    "Data Science",
    "Electrical Engineering",
    "Mechanical Engineering",
    "Civil Engineering",
    "Business Administration",
    "Finance",
    "Marketing",
    "Economics",
    "Psychology",
    "Biology",
    "Chemistry",
    "Physics",
    "Mathematics",
    "Arts & Design",
    "Communications",
    "Education",
    "Other",
];

/// Request-scoped academic profile. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub interests: String,
    pub degree: String,
    pub cgpa: f64,
    pub career_goal: String,
}

/// Case-sensitive membership in `DEGREES`.
pub fn is_known_degree(degree: &str) -> bool {
    DEGREES.contains(&degree)
}
