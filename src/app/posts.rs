use futures::future::{AbortRegistration, Abortable};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::instrument;

use crate::app::auth::AuthState;
use crate::domain::draft::{DraftField, PostDraft};
use crate::domain::media::{Attachment, MediaKind};
use crate::domain::post::ServerPost;
use crate::http::{routes, ApiClient, AppError};

const CREATE_POST_FAILED: &str = "Failed to create post";

/// A named file part of the upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub name: &'static str,
    pub attachment: Attachment,
}

/// Flat multipart field set for `POST /feed/posts`, in send order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl PostPayload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn into_form(self) -> Result<Form, AppError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = Part::bytes(file.attachment.bytes.to_vec())
                .file_name(file.attachment.file_name.clone())
                .mime_str(&file.attachment.content_type)
                .map_err(|err| {
                    AppError::UnexpectedResponse(format!(
                        "invalid content type {:?}: {}",
                        file.attachment.content_type, err
                    ))
                })?;
            form = form.part(file.name, part);
        }
        Ok(form)
    }
}

/// Flattens a draft into multipart fields.
///
/// Every scalar that is set is sent as text. Filled poll options become
/// `pollOptions[i]` entries in order, re-indexed past any blank ones, and
/// attachments become file parts. With no filled option the poll section
/// is left out entirely.
pub fn encode(draft: &PostDraft) -> PostPayload {
    let mut payload = PostPayload::default();
    let poll_options: Vec<&str> = draft
        .poll_options
        .iter()
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .collect();
    let mut push = |field: DraftField, value: String| {
        payload.fields.push((field.as_wire().to_string(), value));
    };

    push(DraftField::Content, draft.content.clone());
    push(DraftField::Type, draft.post_type.as_wire().to_string());

    if let Some(hours) = draft.poll_duration_hours.filter(|_| !poll_options.is_empty()) {
        push(DraftField::PollDuration, hours.to_string());
    }
    push_url(&mut push, DraftField::LinkUrl, &draft.link_url);
    push_text(&mut push, DraftField::CampaignTitle, &draft.campaign_title);
    if let Some(goal) = draft.campaign_goal {
        push(DraftField::CampaignGoal, format_number(goal));
    }
    if let Some(deadline) = draft.deadline {
        push(DraftField::Deadline, format_date(deadline));
    }
    push_text(&mut push, DraftField::VolunteerRole, &draft.volunteer_role);
    if let Some(event_date) = draft.event_date {
        push(DraftField::EventDate, format_date(event_date));
    }
    push_text(&mut push, DraftField::Location, &draft.location);
    push_text(&mut push, DraftField::PetProfileId, &draft.pet_profile_id);
    push_text(&mut push, DraftField::PetName, &draft.pet_name);
    push_text(&mut push, DraftField::PetBreed, &draft.pet_breed);
    push_text(&mut push, DraftField::CustomBreed, &draft.custom_breed);
    if let Some(age) = draft.pet_age {
        push(DraftField::PetAge, format_number(age));
    }
    push_text(&mut push, DraftField::SponsorName, &draft.sponsor_name);
    push_url(&mut push, DraftField::AdLink, &draft.ad_link);
    push_text(&mut push, DraftField::AdDescription, &draft.ad_description);
    if let Some(emergency_type) = draft.emergency_type {
        push(DraftField::EmergencyType, emergency_type.as_wire().to_string());
    }
    push_text(&mut push, DraftField::LastSeen, &draft.last_seen);
    push_text(&mut push, DraftField::Symptoms, &draft.symptoms);
    push_text(&mut push, DraftField::ContactPhone, &draft.contact_phone);
    if let Some(is_critical) = draft.is_critical {
        push(DraftField::IsCritical, is_critical.to_string());
    }

    for (index, option) in poll_options.into_iter().enumerate() {
        payload.fields.push((
            format!("{}[{}]", DraftField::PollOptions.as_wire(), index),
            option.to_string(),
        ));
    }

    for kind in [MediaKind::Image, MediaKind::Video] {
        if let Some(attachment) = draft.attachment(kind) {
            payload.files.push(FilePart {
                name: kind.part_name(),
                attachment: attachment.clone(),
            });
        }
    }

    payload
}

fn push_text<F>(push: &mut F, field: DraftField, value: &Option<String>)
where
    F: FnMut(DraftField, String),
{
    if let Some(value) = value {
        push(field, value.clone());
    }
}

// URLs are validated trimmed, so they are sent trimmed.
fn push_url<F>(push: &mut F, field: DraftField, value: &Option<String>)
where
    F: FnMut(DraftField, String),
{
    if let Some(value) = value {
        push(field, value.trim().to_string());
    }
}

fn format_number(value: f64) -> String {
    // f64's Display already drops a trailing ".0" for whole numbers.
    value.to_string()
}

fn format_date(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CreatePostResponse {
    Wrapped { post: ServerPost },
    Bare(ServerPost),
}

#[derive(Clone)]
pub struct PostService {
    api: ApiClient,
    auth: AuthState,
}

impl PostService {
    pub fn new(api: ApiClient, auth: AuthState) -> Self {
        Self { api, auth }
    }

    /// Sends the payload to the post-creation endpoint.
    ///
    /// Fails with `AuthenticationRequired` before touching the network when no
    /// bearer token is stored.
    #[instrument(skip(self, payload), fields(fields = payload.fields.len(), files = payload.files.len()))]
    pub async fn submit(&self, payload: PostPayload) -> Result<ServerPost, AppError> {
        let bearer = self.auth.load_bearer().await?;
        let form = payload.into_form()?;
        let response: CreatePostResponse = self
            .api
            .post_multipart(routes::FEED_POSTS, form, Some(&bearer), CREATE_POST_FAILED)
            .await?;

        let post = match response {
            CreatePostResponse::Wrapped { post } => post,
            CreatePostResponse::Bare(post) => post,
        };
        tracing::info!(post_id = %post.id, post_type = %post.post_type, "post created");
        Ok(post)
    }

    /// Like [`PostService::submit`], but stops early when the matching
    /// `AbortHandle` fires.
    pub async fn submit_abortable(
        &self,
        payload: PostPayload,
        registration: AbortRegistration,
    ) -> Result<ServerPost, AppError> {
        match Abortable::new(self.submit(payload), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                tracing::info!("post submission cancelled");
                Err(AppError::Cancelled)
            }
        }
    }
}
