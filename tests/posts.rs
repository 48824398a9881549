//! Post Submission Tests
//!
//! Covers multipart encoding of drafts and the create-post request against a
//! stub API.

mod common;

use axum::http::StatusCode;
use common::{mp4, png, stub, unreachable_base_url, ACCESS_TOKEN};
use fourpaws::app::posts::{encode, PostService};
use fourpaws::app::validation::validate;
use fourpaws::domain::draft::PostDraft;
use fourpaws::domain::post::{EmergencyType, PostType};
use fourpaws::http::{ApiClient, AppError};
use fourpaws::infra::storage::MemoryCredentialStore;
use fourpaws::ClientState;
use futures::future::AbortHandle;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

// ===========================================================================
// Encoding
// ===========================================================================

#[test]
fn encode_starts_with_content_and_type() {
    let mut draft = PostDraft::new(PostType::Standard);
    draft.content = "Good boy".into();
    let payload = encode(&draft);

    assert_eq!(payload.fields[0], ("content".to_string(), "Good boy".to_string()));
    assert_eq!(payload.fields[1], ("type".to_string(), "standard".to_string()));
    assert!(payload.files.is_empty());
}

#[test]
fn encode_poll_options_are_indexed() {
    let mut draft = PostDraft::new(PostType::Poll);
    draft.content = "Best treat?".into();
    draft.poll_options = vec!["Chicken".into(), "Salmon".into(), "Cheese".into()];
    draft.poll_duration_hours = Some(48);
    let payload = encode(&draft);

    assert_eq!(payload.field("pollOptions[0]"), Some("Chicken"));
    assert_eq!(payload.field("pollOptions[1]"), Some("Salmon"));
    assert_eq!(payload.field("pollOptions[2]"), Some("Cheese"));
    assert_eq!(payload.field("pollDuration"), Some("48"));
    assert_eq!(payload.field("pollOptions"), None);
}

#[test]
fn encode_drops_blank_poll_options_and_reindexes() {
    let mut draft = PostDraft::new(PostType::Poll);
    draft.content = "Best treat?".into();
    draft.poll_options = vec!["Chicken".into(), "   ".into(), " Salmon ".into(), "".into()];
    assert!(validate(&draft).is_ok());

    let payload = encode(&draft);
    let options: Vec<(&str, &str)> = payload
        .fields
        .iter()
        .filter(|(name, _)| name.starts_with("pollOptions"))
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    assert_eq!(
        options,
        vec![("pollOptions[0]", "Chicken"), ("pollOptions[1]", "Salmon")]
    );
}

#[test]
fn link_draft_validates_and_encodes() {
    let mut draft = PostDraft::new(PostType::Link);
    draft.link_url = Some("https://example.com".into());
    draft.content = "check this out".into();
    assert!(validate(&draft).is_ok());

    let payload = encode(&draft);
    let mut fields = payload.fields.clone();
    fields.sort();
    assert_eq!(
        fields,
        vec![
            ("content".to_string(), "check this out".to_string()),
            ("linkUrl".to_string(), "https://example.com".to_string()),
            ("type".to_string(), "link".to_string()),
        ]
    );
    assert!(payload.files.is_empty());
}

#[test]
fn encode_sends_urls_trimmed() {
    let mut draft = PostDraft::new(PostType::Sponsored);
    draft.link_url = Some(" https://x.test ".into());
    draft.ad_link = Some("\thttps://ads.test/paws\n".into());
    let payload = encode(&draft);

    assert_eq!(payload.field("linkUrl"), Some("https://x.test"));
    assert_eq!(payload.field("adLink"), Some("https://ads.test/paws"));
}

#[test]
fn encode_numbers_dates_and_flags() {
    let deadline = OffsetDateTime::UNIX_EPOCH + Duration::from_secs(1_900_000_000);
    let mut draft = PostDraft::new(PostType::Campaign);
    draft.campaign_title = Some("Shelter roof".into());
    draft.campaign_goal = Some(2500.0);
    draft.deadline = Some(deadline);
    draft.pet_age = Some(1.5);
    draft.is_critical = Some(true);
    draft.emergency_type = Some(EmergencyType::MedicalEmergency);
    let payload = encode(&draft);

    assert_eq!(payload.field("campaignGoal"), Some("2500"));
    assert_eq!(payload.field("deadline"), Some("2030-03-17T17:46:40Z"));
    assert_eq!(payload.field("petAge"), Some("1.5"));
    assert_eq!(payload.field("isCritical"), Some("true"));
    assert_eq!(payload.field("emergencyType"), Some("medical_emergency"));
}

#[test]
fn encode_skips_unset_fields() {
    let draft = PostDraft::new(PostType::Link);
    let payload = encode(&draft);
    assert_eq!(payload.field("linkUrl"), None);
    assert_eq!(payload.field("campaignGoal"), None);
    assert_eq!(payload.field("isCritical"), None);
}

#[test]
fn encode_attachments_as_named_parts() {
    let mut draft = PostDraft::new(PostType::Story);
    draft.image = Some(png(64));
    draft.video = Some(mp4(128));
    let payload = encode(&draft);

    let names: Vec<&str> = payload.files.iter().map(|file| file.name).collect();
    assert_eq!(names, vec!["postImage", "postVideo"]);
    assert_eq!(payload.files[1].attachment.file_name, "walk.mp4");
}

#[test]
fn encode_keeps_values_from_other_types() {
    let mut draft = PostDraft::new(PostType::Link);
    draft.link_url = Some("https://fourpaws.test".into());
    draft.post_type = PostType::Standard;
    let payload = encode(&draft);

    assert_eq!(payload.field("type"), Some("standard"));
    assert_eq!(payload.field("linkUrl"), Some("https://fourpaws.test"));
}

// ===========================================================================
// Submission
// ===========================================================================

fn standard_draft(content: &str) -> PostDraft {
    let mut draft = PostDraft::new(PostType::Standard);
    draft.content = content.into();
    draft
}

#[tokio::test]
async fn submit_sends_multipart_with_bearer() {
    let api = stub().await;
    let state = api.signed_in();

    let mut draft = standard_draft("Park day");
    draft.image = Some(png(2048));
    let post = state.posts.submit(encode(&draft)).await.unwrap();

    assert_eq!(post.id, "post-1");
    assert_eq!(post.post_type, "standard");
    assert_eq!(post.content, "Park day");
    assert_eq!(post.comments_count, 0);

    let requests = api.requests_to("feed/posts:create");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {}", ACCESS_TOKEN).as_str())
    );
    assert_eq!(request.field_names()[..2], ["content", "type"]);
    assert_eq!(request.files.len(), 1);
    assert_eq!(request.files[0].name, "postImage");
    assert_eq!(request.files[0].file_name.as_deref(), Some("buddy.png"));
    assert_eq!(request.files[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(request.files[0].size, 2048);
}

#[tokio::test]
async fn submit_accepts_a_bare_post_body() {
    let api = stub().await;
    api.return_bare_post();
    let state = api.signed_in();

    let post = state.posts.submit(encode(&standard_draft("hi"))).await.unwrap();
    assert_eq!(post.id, "post-1");
}

#[tokio::test]
async fn submit_without_token_never_hits_the_network() {
    let api = stub().await;
    let state = api.signed_out();

    let err = state
        .posts
        .submit(encode(&standard_draft("hello")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AuthenticationRequired));
    assert!(err.requires_login());
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn submit_surfaces_server_message() {
    let api = stub().await;
    api.fail_create_post(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "message": "Content flagged for review" }),
    );
    let state = api.signed_in();

    let err = state
        .posts
        .submit(encode(&standard_draft("hello")))
        .await
        .unwrap_err();

    match &err {
        AppError::Api { status, message } => {
            assert_eq!(*status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(message, "Content flagged for review");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.user_message(), "Content flagged for review");
}

#[tokio::test]
async fn submit_falls_back_to_generic_message() {
    let api = stub().await;
    api.fail_create_post(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let state = api.signed_in();

    let err = state
        .posts
        .submit(encode(&standard_draft("hello")))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Failed to create post");
}

#[tokio::test]
async fn submit_rejected_token_requires_login() {
    let api = stub().await;
    let state = api.state_with_store(Arc::new(MemoryCredentialStore::with_auth_token(
        "expired-token",
    )));

    let err = state
        .posts
        .submit(encode(&standard_draft("hello")))
        .await
        .unwrap_err();
    assert!(err.requires_login());
}

#[tokio::test]
async fn submit_network_failure_reads_as_generic_failure() {
    let base_url = unreachable_base_url().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(2)).unwrap();
    let state = ClientState::new(
        client,
        Arc::new(MemoryCredentialStore::with_auth_token(ACCESS_TOKEN)),
        Duration::from_secs(120),
    );

    let err = state
        .posts
        .submit(encode(&standard_draft("hello")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(err.user_message(), "request failed");
}

#[tokio::test]
async fn abort_handle_cancels_a_slow_submission() {
    let api = stub().await;
    api.delay_create_post(Duration::from_secs(10));
    let state = api.signed_in();
    let posts: PostService = state.posts.clone();

    let (handle, registration) = AbortHandle::new_pair();
    let task = tokio::spawn(async move {
        posts
            .submit_abortable(encode(&standard_draft("slow")), registration)
            .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.abort();

    let err = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("cancellation should resolve promptly")
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, AppError::Cancelled));
}
