use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub email: String,
}

/// OTP issuance token returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpIssued {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpVerification {
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedSession {
    pub user: VerifiedUser,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedUser {
    pub access_token: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    SignedOut,
    OtpPending,
    Authenticated,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}
