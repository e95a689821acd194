use std::fmt;

use super::{
    is_known_degree, Profile, MAX_CAREER_GOAL_CHARS, MAX_CGPA, MAX_INTERESTS_CHARS, MIN_CGPA,
};

/// The four profile fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Interests,
    Degree,
    Cgpa,
    CareerGoal,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Interests,
        ProfileField::Degree,
        ProfileField::Cgpa,
        ProfileField::CareerGoal,
    ];

    /// Wire name, as used in JSON bodies.
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Interests => "interests",
            ProfileField::Degree => "degree",
            ProfileField::Cgpa => "cgpa",
            ProfileField::CareerGoal => "careerGoal",
        }
    }

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Interests => "Skills & interests",
            ProfileField::Degree => "Degree",
            ProfileField::Cgpa => "CGPA (0.0 – 4.0)",
            ProfileField::CareerGoal => "Career goal",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: ProfileField,
    pub message: String,
}

/// Every failing field of one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, field: ProfileField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// The message for `field`, if it failed.
    pub fn message_for(&self, field: ProfileField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = ProfileField> + '_ {
        self.errors.iter().map(|e| e.field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn check_interests(value: &str) -> Option<String> {
    check_text(
        value,
        MAX_INTERESTS_CHARS,
        "Please enter your interests",
        "Interests",
    )
}

fn check_degree(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("Please select your degree".to_string())
    } else if !is_known_degree(value) {
        Some("Please select a degree from the list".to_string())
    } else {
        None
    }
}

fn check_cgpa(value: f64) -> Option<String> {
    if !value.is_finite() {
        Some("CGPA must be a number".to_string())
    } else if value < MIN_CGPA {
        Some("CGPA must be at least 0.0".to_string())
    } else if value > MAX_CGPA {
        Some("CGPA must be at most 4.0".to_string())
    } else {
        None
    }
}

fn check_career_goal(value: &str) -> Option<String> {
    check_text(
        value,
        MAX_CAREER_GOAL_CHARS,
        "Please enter your career goal",
        "Career goal",
    )
}

fn check_text(value: &str, max_chars: usize, empty_message: &str, name: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(empty_message.to_string())
    } else if trimmed.chars().count() > max_chars {
        Some(format!("{name} must be at most {max_chars} characters"))
    } else {
        None
    }
}

/// Checks every field of `profile`, collecting all failures.
pub fn validate_profile(profile: &Profile) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if let Some(msg) = check_interests(&profile.interests) {
        errors.push(ProfileField::Interests, msg);
    }
    if let Some(msg) = check_degree(&profile.degree) {
        errors.push(ProfileField::Degree, msg);
    }
    if let Some(msg) = check_cgpa(profile.cgpa) {
        errors.push(ProfileField::Cgpa, msg);
    }
    if let Some(msg) = check_career_goal(&profile.career_goal) {
        errors.push(ProfileField::CareerGoal, msg);
    }

    errors.into_result()
}
