use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::instrument;

use crate::domain::user::{AuthStatus, OtpIssued, OtpRequest, OtpVerification, VerifiedSession};
use crate::http::{routes, ApiClient, AppError, Bearer};
use crate::infra::storage::{CredentialStore, AUTH_TOKEN_KEY, OTP_TOKEN_KEY};

const LOGIN_FAILED: &str = "Failed to send OTP";
const VERIFY_FAILED: &str = "OTP verification failed";

/// Owns the stored tokens and tells subscribers when the session changes.
#[derive(Clone)]
pub struct AuthState {
    store: Arc<dyn CredentialStore>,
    status: Arc<watch::Sender<AuthStatus>>,
}

impl AuthState {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let initial = initial_status(store.as_ref());
        let (status, _rx) = watch::channel(initial);
        Self {
            store,
            status: Arc::new(status),
        }
    }

    pub fn status(&self) -> AuthStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.bearer(), Ok(_))
    }

    /// The stored access token, or `AuthenticationRequired`.
    pub fn bearer(&self) -> Result<Bearer, AppError> {
        let token = self
            .store
            .get(AUTH_TOKEN_KEY)
            .map_err(AppError::storage)?
            .ok_or(AppError::AuthenticationRequired)?;
        Bearer::new(token)
    }

    /// [`bearer`](Self::bearer) run on the blocking pool, for async callers.
    /// File-backed stores hit the disk on every read.
    pub async fn load_bearer(&self) -> Result<Bearer, AppError> {
        let state = self.clone();
        tokio::task::spawn_blocking(move || state.bearer())
            .await
            .map_err(|err| AppError::storage(format!("credential read task failed: {}", err)))?
    }

    fn otp_bearer(&self) -> Result<Bearer, AppError> {
        let token = self
            .store
            .get(OTP_TOKEN_KEY)
            .map_err(AppError::storage)?
            .ok_or(AppError::OtpNotRequested)?;
        Bearer::new(token).map_err(|_| AppError::OtpNotRequested)
    }

    fn store_otp_token(&self, token: &str) -> Result<(), AppError> {
        self.store
            .set(OTP_TOKEN_KEY, token)
            .map_err(AppError::storage)?;
        self.publish(AuthStatus::OtpPending);
        Ok(())
    }

    fn store_access_token(&self, token: &str) -> Result<(), AppError> {
        self.store
            .set(AUTH_TOKEN_KEY, token)
            .map_err(AppError::storage)?;
        self.store
            .remove(OTP_TOKEN_KEY)
            .map_err(AppError::storage)?;
        self.publish(AuthStatus::Authenticated);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        self.store
            .remove(AUTH_TOKEN_KEY)
            .map_err(AppError::storage)?;
        self.store
            .remove(OTP_TOKEN_KEY)
            .map_err(AppError::storage)?;
        self.publish(AuthStatus::SignedOut);
        Ok(())
    }

    fn publish(&self, status: AuthStatus) {
        self.status.send_replace(status);
        tracing::debug!(status = ?status, "auth status changed");
    }
}

fn initial_status(store: &dyn CredentialStore) -> AuthStatus {
    let present = |key: &str| matches!(store.get(key), Ok(Some(token)) if !token.trim().is_empty());
    if present(AUTH_TOKEN_KEY) {
        AuthStatus::Authenticated
    } else if present(OTP_TOKEN_KEY) {
        AuthStatus::OtpPending
    } else {
        AuthStatus::SignedOut
    }
}

/// Email one-time-password login.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    state: AuthState,
    resend_cooldown: Duration,
    last_sent: Arc<Mutex<Option<Instant>>>,
}

impl AuthService {
    pub fn new(api: ApiClient, state: AuthState, resend_cooldown: Duration) -> Self {
        Self {
            api,
            state,
            resend_cooldown,
            last_sent: Arc::new(Mutex::new(None)),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Time left before another OTP may be requested.
    pub fn resend_available_in(&self) -> Duration {
        let last_sent = match self.last_sent.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        match last_sent {
            Some(sent) => self.resend_cooldown.saturating_sub(sent.elapsed()),
            None => Duration::ZERO,
        }
    }

    #[instrument(skip(self))]
    pub async fn request_otp(&self, email: &str) -> Result<(), AppError> {
        let remaining = self.resend_available_in();
        if !remaining.is_zero() {
            return Err(AppError::OtpCooldown {
                // Round up so "0 seconds" is never reported while still blocked.
                remaining_seconds: remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0),
            });
        }

        let body = OtpRequest {
            email: email.trim().to_string(),
        };
        let issued: OtpIssued = self
            .api
            .post_json(routes::AUTH_LOGIN, &body, None, LOGIN_FAILED)
            .await?;

        self.state.store_otp_token(&issued.token)?;
        if let Ok(mut last_sent) = self.last_sent.lock() {
            *last_sent = Some(Instant::now());
        }
        tracing::info!("otp requested");
        Ok(())
    }

    #[instrument(skip(self, otp))]
    pub async fn verify_otp(&self, otp: &str) -> Result<(), AppError> {
        let bearer = self.state.otp_bearer()?;
        let body = OtpVerification {
            otp: otp.trim().to_string(),
        };
        let session: VerifiedSession = self
            .api
            .post_json(routes::AUTH_VERIFY_OTP, &body, Some(&bearer), VERIFY_FAILED)
            .await?;

        // Validates the token shape before it is persisted.
        let access = Bearer::new(session.user.access_token)
            .map_err(|_| AppError::UnexpectedResponse("empty access token".to_string()))?;
        self.state.store_access_token(access.token())?;
        tracing::info!(email = ?session.user.email, "otp verified");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.state.clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}
