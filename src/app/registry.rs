//! Static description of the nine post types: which fields each one renders
//! and which media kinds it accepts.

use serde::Serialize;

use crate::domain::draft::{DraftField, PostDraft};
use crate::domain::media::MediaKind;
use crate::domain::post::{EmergencyType, PostType};

pub const OTHER_CUSTOM_BREED: &str = "other_custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: DraftField,
    pub label: &'static str,
    pub placeholder: &'static str,
}

const fn spec(field: DraftField, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        field,
        label,
        placeholder,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaAllowance {
    pub image: bool,
    pub video: bool,
}

impl MediaAllowance {
    pub fn allows(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Image => self.image,
            MediaKind::Video => self.video,
        }
    }

    pub fn any(&self) -> bool {
        self.image || self.video
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreedGroup {
    pub label: &'static str,
    pub breeds: &'static [&'static str],
}

/// Breeds offered by the new-profile form, besides `other_custom`.
pub const PET_BREEDS: [BreedGroup; 3] = [
    BreedGroup {
        label: "Dogs",
        breeds: &[
            "Labrador Retriever",
            "German Shepherd",
            "Golden Retriever",
            "French Bulldog",
            "Beagle",
            "Poodle",
            "Mixed Breed",
        ],
    },
    BreedGroup {
        label: "Cats",
        breeds: &[
            "Domestic Shorthair",
            "Siamese",
            "Maine Coon",
            "Persian",
            "Ragdoll",
            "Bengal",
            "Mixed Breed",
        ],
    },
    BreedGroup {
        label: "Other Pets",
        breeds: &["Rabbit", "Guinea Pig", "Hamster", "Bird", "Reptile", "Fish"],
    },
];

pub fn is_listed_breed(breed: &str) -> bool {
    PET_BREEDS
        .iter()
        .any(|group| group.breeds.iter().any(|listed| listed.eq_ignore_ascii_case(breed)))
}

const STANDARD_FIELDS: &[FieldSpec] = &[spec(
    DraftField::Content,
    "Content",
    "What's on your mind?",
)];

const STORY_FIELDS: &[FieldSpec] = &[spec(
    DraftField::Content,
    "Story Content",
    "Share your story...",
)];

const POLL_FIELDS: &[FieldSpec] = &[
    spec(DraftField::Content, "Poll Question", "Ask a question..."),
    spec(DraftField::PollOptions, "Poll Options", "Option"),
    spec(DraftField::PollDuration, "Poll Duration (hours)", "24"),
];

const LINK_FIELDS: &[FieldSpec] = &[
    spec(DraftField::LinkUrl, "Link URL", "https://example.com"),
    spec(DraftField::Content, "Description", "Describe this link..."),
];

const CAMPAIGN_FIELDS: &[FieldSpec] = &[
    spec(
        DraftField::CampaignTitle,
        "Campaign Title",
        "Give your campaign a name",
    ),
    spec(DraftField::CampaignGoal, "Fundraising Goal", "1000"),
    spec(DraftField::Deadline, "Campaign Deadline", "Pick a date"),
    spec(
        DraftField::Content,
        "Campaign Description",
        "Describe your campaign and its goals...",
    ),
];

const VOLUNTEER_FIELDS: &[FieldSpec] = &[
    spec(
        DraftField::VolunteerRole,
        "Volunteer Role",
        "e.g., Dog Walker, Event Helper",
    ),
    spec(DraftField::EventDate, "Event Date", "Pick a date"),
    spec(DraftField::Location, "Location", "Where volunteers will help"),
    spec(
        DraftField::Content,
        "Additional Details",
        "Describe what volunteers will be doing and any requirements...",
    ),
];

const NEW_PROFILE_FIELDS: &[FieldSpec] = &[
    spec(DraftField::PetName, "Pet Name", "Name of the pet"),
    spec(
        DraftField::PetBreed,
        "Pet Breed/Species",
        "Select breed or species",
    ),
    spec(
        DraftField::CustomBreed,
        "Custom Breed/Species",
        "Enter breed or species",
    ),
    spec(DraftField::PetAge, "Pet Age (Optional)", "Age in years"),
    spec(DraftField::Content, "Pet Bio", "Tell us about this pet..."),
];

const SPONSORED_FIELDS: &[FieldSpec] = &[
    spec(
        DraftField::SponsorName,
        "Sponsor Name",
        "Name of the sponsoring organization",
    ),
    spec(
        DraftField::AdLink,
        "Advertisement Link",
        "https://sponsor-website.com",
    ),
    spec(
        DraftField::Content,
        "Ad Description",
        "Describe the sponsored content...",
    ),
];

const EMERGENCY_FIELDS: &[FieldSpec] = &[
    spec(
        DraftField::EmergencyType,
        "Emergency Type",
        "Select emergency type",
    ),
    spec(
        DraftField::PetName,
        "Pet Name",
        "Name of the pet (if applicable)",
    ),
    spec(
        DraftField::LastSeen,
        "Last Seen Location",
        "Where was the pet last seen?",
    ),
    spec(
        DraftField::Symptoms,
        "Symptoms/Condition",
        "Describe the symptoms or condition...",
    ),
    spec(
        DraftField::ContactPhone,
        "Contact Phone",
        "Phone number for contact",
    ),
    spec(DraftField::IsCritical, "Critical Emergency", ""),
    spec(
        DraftField::Content,
        "Emergency Details",
        "Provide detailed information about the emergency...",
    ),
];

pub fn fields_for(post_type: PostType) -> &'static [FieldSpec] {
    match post_type {
        PostType::Standard => STANDARD_FIELDS,
        PostType::Story => STORY_FIELDS,
        PostType::Poll => POLL_FIELDS,
        PostType::Link => LINK_FIELDS,
        PostType::Campaign => CAMPAIGN_FIELDS,
        PostType::Volunteer => VOLUNTEER_FIELDS,
        PostType::NewProfile => NEW_PROFILE_FIELDS,
        PostType::Sponsored => SPONSORED_FIELDS,
        PostType::Emergency => EMERGENCY_FIELDS,
    }
}

/// Unknown type names render as a standard post.
pub fn fields_for_wire(post_type: &str) -> &'static [FieldSpec] {
    fields_for(PostType::from_wire(post_type).unwrap_or_default())
}

pub fn media_allowance(post_type: PostType) -> MediaAllowance {
    match post_type {
        PostType::Standard
        | PostType::NewProfile
        | PostType::Sponsored
        | PostType::Emergency => MediaAllowance {
            image: true,
            video: false,
        },
        PostType::Story | PostType::Campaign => MediaAllowance {
            image: true,
            video: true,
        },
        PostType::Poll | PostType::Link | PostType::Volunteer => MediaAllowance {
            image: false,
            video: false,
        },
    }
}

/// Fields the form should show for the draft as it currently stands.
pub fn visible_fields(draft: &PostDraft) -> Vec<DraftField> {
    fields_for(draft.post_type)
        .iter()
        .map(|spec| spec.field)
        .filter(|field| match field {
            DraftField::CustomBreed => draft.pet_breed.as_deref() == Some(OTHER_CUSTOM_BREED),
            // lastSeen is required for every emergency, so it is never hidden.
            DraftField::Symptoms => draft.emergency_type == Some(EmergencyType::MedicalEmergency),
            _ => true,
        })
        .collect()
}
