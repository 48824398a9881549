use serde::Serialize;
use std::fmt;
use time::OffsetDateTime;

use crate::domain::media::{Attachment, MediaKind};
use crate::domain::post::{EmergencyType, PostType};

pub const DEFAULT_POLL_DURATION_HOURS: u32 = 24;
pub const MIN_POLL_OPTIONS: usize = 2;

/// The in-progress post being composed.
///
/// Every field is optional at this level. Which ones are required depends on
/// `post_type` and is decided by `app::validation`.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub post_type: PostType,
    pub content: String,
    pub image: Option<Attachment>,
    pub video: Option<Attachment>,

    pub poll_options: Vec<String>,
    pub poll_duration_hours: Option<u32>,

    pub link_url: Option<String>,

    pub campaign_title: Option<String>,
    pub campaign_goal: Option<f64>,
    pub deadline: Option<OffsetDateTime>,

    pub volunteer_role: Option<String>,
    pub event_date: Option<OffsetDateTime>,
    pub location: Option<String>,

    pub pet_profile_id: Option<String>,
    pub pet_name: Option<String>,
    pub pet_breed: Option<String>,
    pub custom_breed: Option<String>,
    pub pet_age: Option<f64>,

    pub sponsor_name: Option<String>,
    pub ad_link: Option<String>,
    pub ad_description: Option<String>,

    pub emergency_type: Option<EmergencyType>,
    pub last_seen: Option<String>,
    pub symptoms: Option<String>,
    pub contact_phone: Option<String>,
    pub is_critical: Option<bool>,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self {
            post_type: PostType::Standard,
            content: String::new(),
            image: None,
            video: None,
            poll_options: vec![String::new(); MIN_POLL_OPTIONS],
            poll_duration_hours: Some(DEFAULT_POLL_DURATION_HOURS),
            link_url: None,
            campaign_title: None,
            campaign_goal: None,
            deadline: None,
            volunteer_role: None,
            event_date: None,
            location: None,
            pet_profile_id: None,
            pet_name: None,
            pet_breed: None,
            custom_breed: None,
            pet_age: None,
            sponsor_name: None,
            ad_link: None,
            ad_description: None,
            emergency_type: None,
            last_seen: None,
            symptoms: None,
            contact_phone: None,
            is_critical: None,
        }
    }
}

impl PostDraft {
    pub fn new(post_type: PostType) -> Self {
        Self {
            post_type,
            ..Self::default()
        }
    }

    pub fn attachment(&self, kind: MediaKind) -> Option<&Attachment> {
        match kind {
            MediaKind::Image => self.image.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        }
    }

    pub fn attachment_mut(&mut self, kind: MediaKind) -> &mut Option<Attachment> {
        match kind {
            MediaKind::Image => &mut self.image,
            MediaKind::Video => &mut self.video,
        }
    }
}

/// Names a draft field the way the API and the form refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DraftField {
    #[serde(rename = "content")]
    Content,
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "postImage")]
    Image,
    #[serde(rename = "postVideo")]
    Video,
    #[serde(rename = "pollOptions")]
    PollOptions,
    #[serde(rename = "pollDuration")]
    PollDuration,
    #[serde(rename = "linkUrl")]
    LinkUrl,
    #[serde(rename = "campaignTitle")]
    CampaignTitle,
    #[serde(rename = "campaignGoal")]
    CampaignGoal,
    #[serde(rename = "deadline")]
    Deadline,
    #[serde(rename = "volunteerRole")]
    VolunteerRole,
    #[serde(rename = "eventDate")]
    EventDate,
    #[serde(rename = "location")]
    Location,
    #[serde(rename = "petProfileId")]
    PetProfileId,
    #[serde(rename = "petName")]
    PetName,
    #[serde(rename = "petBreed")]
    PetBreed,
    #[serde(rename = "customBreed")]
    CustomBreed,
    #[serde(rename = "petAge")]
    PetAge,
    #[serde(rename = "sponsorName")]
    SponsorName,
    #[serde(rename = "adLink")]
    AdLink,
    #[serde(rename = "adDescription")]
    AdDescription,
    #[serde(rename = "emergencyType")]
    EmergencyType,
    #[serde(rename = "lastSeen")]
    LastSeen,
    #[serde(rename = "symptoms")]
    Symptoms,
    #[serde(rename = "contactPhone")]
    ContactPhone,
    #[serde(rename = "isCritical")]
    IsCritical,
}

impl DraftField {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Type => "type",
            Self::Image => "postImage",
            Self::Video => "postVideo",
            Self::PollOptions => "pollOptions",
            Self::PollDuration => "pollDuration",
            Self::LinkUrl => "linkUrl",
            Self::CampaignTitle => "campaignTitle",
            Self::CampaignGoal => "campaignGoal",
            Self::Deadline => "deadline",
            Self::VolunteerRole => "volunteerRole",
            Self::EventDate => "eventDate",
            Self::Location => "location",
            Self::PetProfileId => "petProfileId",
            Self::PetName => "petName",
            Self::PetBreed => "petBreed",
            Self::CustomBreed => "customBreed",
            Self::PetAge => "petAge",
            Self::SponsorName => "sponsorName",
            Self::AdLink => "adLink",
            Self::AdDescription => "adDescription",
            Self::EmergencyType => "emergencyType",
            Self::LastSeen => "lastSeen",
            Self::Symptoms => "symptoms",
            Self::ContactPhone => "contactPhone",
            Self::IsCritical => "isCritical",
        }
    }

    pub fn for_media(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::Image,
            MediaKind::Video => Self::Video,
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_wire())
    }
}

/// A validation failure tied to one draft field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: DraftField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: DraftField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
