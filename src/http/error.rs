use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::draft::FieldError;

pub(crate) const GENERIC_FAILURE: &str = "request failed";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("post has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("post has {} media problem(s)", .0.len())]
    MediaConstraint(Vec<FieldError>),
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("submission cancelled")]
    Cancelled,
    #[error("no OTP has been requested")]
    OtpNotRequested,
    #[error("OTP can be resent in {remaining_seconds}s")]
    OtpCooldown { remaining_seconds: u64 },
    #[error("credential storage failed: {0}")]
    Storage(String),
}

impl AppError {
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Field errors carried by local validation failures.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) | Self::MediaConstraint(errors) => errors,
            _ => &[],
        }
    }

    /// Text suitable for a user-facing notification.
    ///
    /// Network failures read the same as API failures without a message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) | Self::MediaConstraint(errors) => errors
                .first()
                .map(|err| err.message.clone())
                .unwrap_or_else(|| "Please fix the highlighted fields".to_string()),
            Self::AuthenticationRequired => "Please log in to continue".to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Network(_) | Self::UnexpectedResponse(_) => GENERIC_FAILURE.to_string(),
            Self::SubmissionInFlight => "Your post is already being submitted".to_string(),
            Self::Cancelled => "Submission cancelled".to_string(),
            Self::OtpNotRequested => "Request an OTP first".to_string(),
            Self::OtpCooldown { remaining_seconds } => {
                format!("You can resend the OTP in {} seconds", remaining_seconds)
            }
            Self::Storage(_) => "Could not access saved credentials".to_string(),
        }
    }

    /// Whether the caller should send the user back to login.
    pub fn requires_login(&self) -> bool {
        match self {
            Self::AuthenticationRequired => true,
            Self::Api { status, .. } => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }
}
