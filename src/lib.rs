pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::sync::Arc;
use std::time::Duration;

use crate::app::auth::{AuthService, AuthState};
use crate::app::feed::FeedService;
use crate::app::pets::PetService;
use crate::app::posts::PostService;
use crate::config::AppConfig;
use crate::http::ApiClient;
use crate::infra::storage::{CredentialStore, FileCredentialStore};

/// Services sharing one HTTP client and one credential store.
#[derive(Clone)]
pub struct ClientState {
    pub auth: AuthService,
    pub posts: PostService,
    pub pets: PetService,
    pub feed: FeedService,
}

impl ClientState {
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>, otp_resend_cooldown: Duration) -> Self {
        let auth_state = AuthState::new(store);
        Self {
            auth: AuthService::new(api.clone(), auth_state.clone(), otp_resend_cooldown),
            posts: PostService::new(api.clone(), auth_state.clone()),
            pets: PetService::new(api.clone(), auth_state.clone()),
            feed: FeedService::new(api, auth_state),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config.api_base_url, config.request_timeout())?;
        let store = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
        Ok(Self::new(api, store, config.otp_resend_cooldown()))
    }

    pub fn auth_state(&self) -> &AuthState {
        self.auth.state()
    }
}
