#![allow(dead_code)]

use axum::extract::{DefaultBodyLimit, Multipart, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fourpaws::domain::media::Attachment;
use fourpaws::http::ApiClient;
use fourpaws::infra::storage::{CredentialStore, MemoryCredentialStore};
use fourpaws::ClientState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const OTP_TOKEN: &str = "otp-token";
pub const VALID_OTP: &str = "123456";
pub const ACCESS_TOKEN: &str = "access-token";
pub const API_PREFIX: &str = "/api/v1";

// ---------------------------------------------------------------------------
// Recorded traffic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedFile {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub route: &'static str,
    pub authorization: Option<String>,
    pub query: Option<String>,
    pub body: Option<Value>,
    pub fields: Vec<(String, String)>,
    pub files: Vec<RecordedFile>,
}

impl RecordedRequest {
    fn new(route: &'static str, headers: &HeaderMap) -> Self {
        Self {
            route,
            authorization: headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            query: None,
            body: None,
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(key, _)| key.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Stub behaviour
// ---------------------------------------------------------------------------

struct Behaviour {
    create_post_failure: Option<(StatusCode, Value)>,
    create_post_delay: Option<Duration>,
    wrap_created_post: bool,
    pets: Value,
    feed: Value,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            create_post_failure: None,
            create_post_delay: None,
            wrap_created_post: true,
            pets: json!({ "success": true, "data": [] }),
            feed: json!({ "success": true, "posts": [] }),
        }
    }
}

#[derive(Clone, Default)]
struct Shared {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    behaviour: Arc<Mutex<Behaviour>>,
}

impl Shared {
    fn record(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

fn bearer_is(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {}", token))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn login(State(shared): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut request = RecordedRequest::new("auth/login", &headers);
    request.body = Some(body.clone());
    shared.record(request);

    let email = body["email"].as_str().unwrap_or("");
    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Email is required" })),
        )
            .into_response();
    }
    Json(json!({ "token": OTP_TOKEN })).into_response()
}

async fn verify_otp(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut request = RecordedRequest::new("auth/verify-otp", &headers);
    request.body = Some(body.clone());
    shared.record(request);

    if !bearer_is(&headers, OTP_TOKEN) {
        return unauthorized();
    }
    if body["otp"].as_str() != Some(VALID_OTP) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid OTP" })),
        )
            .into_response();
    }
    Json(json!({
        "user": { "accessToken": ACCESS_TOKEN, "email": "owner@fourpaws.test" }
    }))
    .into_response()
}

async fn pet_forms(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    shared.record(RecordedRequest::new("pets/allPetsForms", &headers));
    if !bearer_is(&headers, ACCESS_TOKEN) {
        return unauthorized();
    }
    let pets = shared.behaviour.lock().unwrap().pets.clone();
    Json(pets).into_response()
}

async fn list_posts(
    State(shared): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let mut request = RecordedRequest::new("feed/posts", &headers);
    request.query = query;
    shared.record(request);
    if !bearer_is(&headers, ACCESS_TOKEN) {
        return unauthorized();
    }
    let feed = shared.behaviour.lock().unwrap().feed.clone();
    Json(feed).into_response()
}

async fn create_post(
    State(shared): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut request = RecordedRequest::new("feed/posts:create", &headers);
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();
        if file_name.is_some() {
            request.files.push(RecordedFile {
                name,
                file_name,
                content_type,
                size: data.len(),
            });
        } else {
            request
                .fields
                .push((name, String::from_utf8_lossy(&data).into_owned()));
        }
    }
    let post_type = request.field("type").unwrap_or("standard").to_string();
    let content = request.field("content").unwrap_or("").to_string();
    shared.record(request);

    let (failure, delay, wrap) = {
        let behaviour = shared.behaviour.lock().unwrap();
        (
            behaviour.create_post_failure.clone(),
            behaviour.create_post_delay,
            behaviour.wrap_created_post,
        )
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if !bearer_is(&headers, ACCESS_TOKEN) {
        return unauthorized();
    }
    if let Some((status, body)) = failure {
        return (status, Json(body)).into_response();
    }

    let post = json!({
        "_id": "post-1",
        "authorName": "Owner",
        "content": content,
        "type": post_type,
        "likesCount": 0,
        "commentsCount": "0",
        "isLiked": false,
        "media": []
    });
    if wrap {
        Json(json!({ "success": true, "post": post })).into_response()
    } else {
        Json(post).into_response()
    }
}

// ---------------------------------------------------------------------------
// StubApi: one fresh server per test
// ---------------------------------------------------------------------------

pub struct StubApi {
    pub base_url: String,
    shared: Shared,
}

pub async fn stub() -> StubApi {
    let shared = Shared::default();
    let routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/pets/allPetsForms", get(pet_forms))
        .route("/feed/posts", get(list_posts).post(create_post))
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .with_state(shared.clone());
    let router = Router::new().nest(API_PREFIX, routes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    StubApi {
        base_url: format!("http://{}{}", addr, API_PREFIX),
        shared,
    }
}

impl StubApi {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    pub fn state_with_store(&self, store: Arc<dyn CredentialStore>) -> ClientState {
        ClientState::new(self.client(), store, Duration::from_secs(120))
    }

    /// Client state that already holds a valid access token.
    pub fn signed_in(&self) -> ClientState {
        self.state_with_store(Arc::new(MemoryCredentialStore::with_auth_token(
            ACCESS_TOKEN,
        )))
    }

    pub fn signed_out(&self) -> ClientState {
        self.state_with_store(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, route: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.route == route)
            .collect()
    }

    pub fn fail_create_post(&self, status: StatusCode, body: Value) {
        self.shared.behaviour.lock().unwrap().create_post_failure = Some((status, body));
    }

    pub fn delay_create_post(&self, delay: Duration) {
        self.shared.behaviour.lock().unwrap().create_post_delay = Some(delay);
    }

    pub fn return_bare_post(&self) {
        self.shared.behaviour.lock().unwrap().wrap_created_post = false;
    }

    pub fn set_pets(&self, body: Value) {
        self.shared.behaviour.lock().unwrap().pets = body;
    }

    pub fn set_feed(&self, body: Value) {
        self.shared.behaviour.lock().unwrap().feed = body;
    }
}

/// Base URL of a port nobody is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, API_PREFIX)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub fn png(size: usize) -> Attachment {
    let mut bytes = vec![0u8; size.max(PNG_MAGIC.len())];
    bytes[..PNG_MAGIC.len()].copy_from_slice(&PNG_MAGIC);
    Attachment::new("buddy.png", "image/png", bytes)
}

pub fn mp4(size: usize) -> Attachment {
    Attachment::new("walk.mp4", "video/mp4", vec![0u8; size])
}

pub const MB: usize = 1024 * 1024;
