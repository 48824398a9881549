use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A pet registration form as listed by `GET /pets/allPetsForms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub owner_id: i64,
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub government_registered: bool,
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub sterilized: bool,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub meta_data: Option<PetMetaData>,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub documents: Option<PetDocuments>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub merged_pdf: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetMetaData {
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDocuments {
    #[serde(default)]
    pub owner_id_proof: Option<String>,
    #[serde(default)]
    pub image_with_owner: Option<String>,
    #[serde(default)]
    pub vaccination_card: Option<String>,
    #[serde(default)]
    pub sterilization_card: Option<String>,
    #[serde(default)]
    pub veterinary_health_card: Option<String>,
}
