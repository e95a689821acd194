//! Form Controller — the Idle → Submitting → Success/Failed cycle.
//!
//! Validation happens before any request. `submit` borrows the controller
//! mutably for the whole request, so a second submission cannot start while
//! one is in flight; `reset` is refused in `Submitting`. A failure leaves the form
//! values untouched, returns to `Idle` and raises a transient `Notification`.

use tracing::{debug, warn};

use crate::form::client::{ClientError, RecommendationSource};
use crate::form::ProfileForm;
use crate::profile::ValidationErrors;
use crate::recommendation::Recommendations;

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Submitting,
    Success(Recommendations),
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl From<&ClientError> for Notification {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Relay { message, .. } => Notification {
                title: "Error".to_string(),
                description: message.clone(),
            },
            ClientError::Status(status) => Notification {
                title: "Error".to_string(),
                description: format!("The advisor service returned status {status}"),
            },
            ClientError::Transport(_) | ClientError::Decode(_) => Notification {
                title: "Something went wrong".to_string(),
                description: "Please try again later.".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent.
    Invalid(ValidationErrors),
    Succeeded,
    Failed(Notification),
}

pub struct FormController<S> {
    source: S,
    form: ProfileForm,
    state: FormState,
    field_errors: ValidationErrors,
    notification: Option<Notification>,
}

impl<S: RecommendationSource> FormController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            form: ProfileForm::default(),
            state: FormState::Idle,
            field_errors: ValidationErrors::default(),
            notification: None,
        }
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProfileForm {
        &mut self.form
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn results(&self) -> Option<&Recommendations> {
        match &self.state {
            FormState::Success(r) => Some(r),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting)
    }

    /// Whether a "start over" action is offered: results shown or input typed.
    pub fn can_reset(&self) -> bool {
        !self.is_submitting() && (self.results().is_some() || self.form.is_dirty())
    }

    /// Takes the pending notification, if any. Notifications are shown once.
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let profile = match self.form.to_profile() {
            Ok(profile) => profile,
            Err(errors) => {
                debug!("Submission blocked: {errors}");
                self.field_errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };

        self.field_errors = ValidationErrors::default();
        self.notification = None;
        self.state = FormState::Submitting;

        match self.source.recommend(&profile).await {
            Ok(recommendations) => {
                self.state = FormState::Success(recommendations);
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                warn!("Recommendation request failed: {err}");
                let notification = Notification::from(&err);
                self.notification = Some(notification.clone());
                self.state = FormState::Idle;
                SubmitOutcome::Failed(notification)
            }
        }
    }

    /// Clears all fields and any displayed results. Refused while submitting.
    pub fn reset(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.form = ProfileForm::default();
        self.field_errors = ValidationErrors::default();
        self.notification = None;
        self.state = FormState::Idle;
        true
    }
}
