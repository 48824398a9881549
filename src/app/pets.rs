use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use crate::app::auth::AuthState;
use crate::domain::pet::Pet;
use crate::http::{routes, ApiClient, AppError};

const FETCH_PETS_FAILED: &str = "Failed to fetch pet data";

#[derive(Deserialize)]
struct PetFormsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<Pet>,
}

#[derive(Clone)]
pub struct PetService {
    api: ApiClient,
    auth: AuthState,
}

impl PetService {
    pub fn new(api: ApiClient, auth: AuthState) -> Self {
        Self { api, auth }
    }

    /// Every registered pet form, newest first.
    #[instrument(skip(self))]
    pub async fn list_pet_forms(&self) -> Result<Vec<Pet>, AppError> {
        let bearer = self.auth.load_bearer().await?;
        let response: PetFormsResponse = self
            .api
            .get_json(routes::PET_FORMS, &[], Some(&bearer), FETCH_PETS_FAILED)
            .await?;

        if !response.success {
            return Err(AppError::api(StatusCode::OK, FETCH_PETS_FAILED));
        }

        let mut pets = response.data;
        sort_newest_first(&mut pets);
        tracing::debug!(count = pets.len(), "fetched pet forms");
        Ok(pets)
    }
}

pub fn sort_newest_first(pets: &mut [Pet]) {
    pets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
