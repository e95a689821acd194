//! Client side of the advisor: collects a profile, validates it locally,
//! submits it to the relay and renders whatever comes back.
//!
//! `FormController` owns the Idle → Submitting → Success/Failed cycle.
//! The `advisor` binary drives it from a terminal.

pub mod client;
pub mod controller;
pub mod render;

pub use client::{ClientError, RecommendationSource, RelayClient};
pub use controller::{FormController, FormState, Notification, SubmitOutcome};

use crate::profile::{validate_profile, Profile, ProfileField, ValidationErrors};

/// Raw, user-entered form values. Everything is text until `to_profile`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub interests: String,
    pub degree: String,
    pub cgpa: String,
    pub career_goal: String,
}

impl ProfileForm {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Interests => &self.interests,
            ProfileField::Degree => &self.degree,
            ProfileField::Cgpa => &self.cgpa,
            ProfileField::CareerGoal => &self.career_goal,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::Interests => self.interests = value,
            ProfileField::Degree => self.degree = value,
            ProfileField::Cgpa => self.cgpa = value,
            ProfileField::CareerGoal => self.career_goal = value,
        }
    }

    pub fn clear(&mut self, field: ProfileField) {
        self.set(field, String::new());
    }

    /// True once any field holds input.
    pub fn is_dirty(&self) -> bool {
        ProfileField::ALL
            .iter()
            .any(|&field| !self.get(field).is_empty())
    }

    /// Trims free text, coerces the CGPA and validates every field.
    /// A CGPA that does not parse becomes NaN, which validation rejects.
    pub fn to_profile(&self) -> Result<Profile, ValidationErrors> {
        let profile = Profile {
            interests: self.interests.trim().to_string(),
            degree: self.degree.trim().to_string(),
            cgpa: self.cgpa.trim().parse::<f64>().unwrap_or(f64::NAN),
            career_goal: self.career_goal.trim().to_string(),
        };
        validate_profile(&profile)?;
        Ok(profile)
    }
}
