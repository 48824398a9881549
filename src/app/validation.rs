use time::OffsetDateTime;
use url::Url;

use crate::app::registry::OTHER_CUSTOM_BREED;
use crate::domain::draft::{DraftField, FieldError, PostDraft, MIN_POLL_OPTIONS};
use crate::domain::post::PostType;

pub const MIN_POLL_DURATION_HOURS: u32 = 1;
pub const MAX_POLL_DURATION_HOURS: u32 = 168;

/// Checks the draft against the rules of its own post type.
pub fn validate(draft: &PostDraft) -> Result<(), Vec<FieldError>> {
    validate_at(draft, OffsetDateTime::now_utc())
}

/// Same as [`validate`] with an explicit clock for the date rules.
pub fn validate_at(draft: &PostDraft, now: OffsetDateTime) -> Result<(), Vec<FieldError>> {
    let mut errors = Violations::default();

    match draft.post_type {
        PostType::Standard => standard(draft, &mut errors),
        PostType::Story => story(draft, &mut errors),
        PostType::Poll => poll(draft, &mut errors),
        PostType::Link => link(draft, &mut errors),
        PostType::Campaign => campaign(draft, now, &mut errors),
        PostType::Volunteer => volunteer(draft, now, &mut errors),
        PostType::NewProfile => new_profile(draft, &mut errors),
        PostType::Sponsored => sponsored(draft, &mut errors),
        PostType::Emergency => emergency(draft, &mut errors),
    }

    errors.finish()
}

#[derive(Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn require(&mut self, ok: bool, field: DraftField, message: &str) {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
    }

    fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn filled_opt(value: Option<&String>) -> bool {
    value.is_some_and(|value| filled(value))
}

fn is_url(value: Option<&String>) -> bool {
    value.is_some_and(|value| Url::parse(value.trim()).is_ok())
}

fn is_positive(value: Option<f64>) -> bool {
    value.is_some_and(|value| value.is_finite() && value > 0.0)
}

fn standard(draft: &PostDraft, errors: &mut Violations) {
    errors.require(
        filled(&draft.content) || draft.image.is_some(),
        DraftField::Content,
        "Standard posts require either content or an image",
    );
}

fn story(draft: &PostDraft, errors: &mut Violations) {
    errors.require(
        draft.image.is_some() || draft.video.is_some(),
        DraftField::Image,
        "Story posts require either an image or video",
    );
}

fn poll(draft: &PostDraft, errors: &mut Violations) {
    errors.require(
        filled(&draft.content),
        DraftField::Content,
        "Poll posts require a question",
    );

    let answered = draft
        .poll_options
        .iter()
        .filter(|option| filled(option))
        .count();
    errors.require(
        answered >= MIN_POLL_OPTIONS,
        DraftField::PollOptions,
        "Poll posts require at least 2 options",
    );

    errors.require(
        draft
            .poll_duration_hours
            .is_some_and(|hours| (MIN_POLL_DURATION_HOURS..=MAX_POLL_DURATION_HOURS).contains(&hours)),
        DraftField::PollDuration,
        "Poll posts require a duration between 1 and 168 hours",
    );
}

fn link(draft: &PostDraft, errors: &mut Violations) {
    errors.require(
        is_url(draft.link_url.as_ref()),
        DraftField::LinkUrl,
        "Link posts require a valid URL",
    );
}

fn campaign(draft: &PostDraft, now: OffsetDateTime, errors: &mut Violations) {
    errors.require(
        filled_opt(draft.campaign_title.as_ref()),
        DraftField::CampaignTitle,
        "Campaign posts require a title",
    );
    errors.require(
        is_positive(draft.campaign_goal),
        DraftField::CampaignGoal,
        "Campaign posts require a positive goal amount",
    );
    match draft.deadline {
        None => errors.require(false, DraftField::Deadline, "Campaign posts require a deadline"),
        Some(deadline) => errors.require(
            deadline > now,
            DraftField::Deadline,
            "Campaign deadline must be in the future",
        ),
    }
}

fn volunteer(draft: &PostDraft, now: OffsetDateTime, errors: &mut Violations) {
    errors.require(
        filled_opt(draft.volunteer_role.as_ref()),
        DraftField::VolunteerRole,
        "Volunteer posts require a role",
    );
    match draft.event_date {
        None => errors.require(
            false,
            DraftField::EventDate,
            "Volunteer posts require an event date",
        ),
        Some(event_date) => errors.require(
            event_date > now,
            DraftField::EventDate,
            "Volunteer event date must be in the future",
        ),
    }
    errors.require(
        filled_opt(draft.location.as_ref()),
        DraftField::Location,
        "Volunteer posts require a location",
    );
}

fn new_profile(draft: &PostDraft, errors: &mut Violations) {
    errors.require(
        filled_opt(draft.pet_name.as_ref()),
        DraftField::PetName,
        "New profile posts require a pet name",
    );

    let listed_breed = draft
        .pet_breed
        .as_deref()
        .is_some_and(|breed| filled(breed) && breed != OTHER_CUSTOM_BREED);
    errors.require(
        listed_breed || filled_opt(draft.custom_breed.as_ref()),
        DraftField::PetBreed,
        "New profile posts require a pet breed",
    );

    errors.require(
        draft.image.is_some(),
        DraftField::Image,
        "New profile posts require a pet image",
    );

    // Age is optional, but must make sense when given.
    if draft.pet_age.is_some() {
        errors.require(
            is_positive(draft.pet_age),
            DraftField::PetAge,
            "Pet age must be a positive number",
        );
    }
}

fn sponsored(draft: &PostDraft, errors: &mut Violations) {
    errors.require(
        filled_opt(draft.sponsor_name.as_ref()),
        DraftField::SponsorName,
        "Sponsored posts require a sponsor name",
    );
    errors.require(
        is_url(draft.ad_link.as_ref()),
        DraftField::AdLink,
        "Sponsored posts require an ad link",
    );
}

fn emergency(draft: &PostDraft, errors: &mut Violations) {
    errors.require(
        draft.emergency_type.is_some(),
        DraftField::EmergencyType,
        "Emergency posts require an emergency type",
    );
    errors.require(
        filled_opt(draft.pet_name.as_ref()),
        DraftField::PetName,
        "Emergency posts require a pet name",
    );
    errors.require(
        filled_opt(draft.last_seen.as_ref()),
        DraftField::LastSeen,
        "Emergency posts require a last seen location",
    );
    errors.require(
        filled_opt(draft.contact_phone.as_ref()),
        DraftField::ContactPhone,
        "Emergency posts require a contact phone",
    );
}
