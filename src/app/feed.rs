use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::app::auth::AuthState;
use crate::domain::post::ServerPost;
use crate::http::{routes, ApiClient, AppError};

const FETCH_POSTS_FAILED: &str = "Failed to fetch posts";

pub const FIRST_PAGE_CURSOR: &str = "0";

#[derive(Deserialize)]
struct FeedResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    posts: Vec<ServerPost>,
}

/// Posts of one type, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostGroup {
    pub post_type: String,
    pub title: String,
    pub posts: Vec<ServerPost>,
}

#[derive(Clone)]
pub struct FeedService {
    api: ApiClient,
    auth: AuthState,
}

impl FeedService {
    pub fn new(api: ApiClient, auth: AuthState) -> Self {
        Self { api, auth }
    }

    #[instrument(skip(self))]
    pub async fn list_posts(&self, cursor: &str, limit: u32) -> Result<Vec<ServerPost>, AppError> {
        let bearer = self.auth.load_bearer().await?;
        let query = [("cursor", cursor.to_string()), ("limit", limit.to_string())];
        let response: FeedResponse = self
            .api
            .get_json(routes::FEED_POSTS, &query, Some(&bearer), FETCH_POSTS_FAILED)
            .await?;

        if !response.success {
            return Err(AppError::api(StatusCode::OK, FETCH_POSTS_FAILED));
        }
        tracing::debug!(count = response.posts.len(), "fetched posts");
        Ok(response.posts)
    }
}

/// Tab title for a raw post type name.
pub fn type_title(post_type: &str) -> String {
    match post_type {
        "standard" => "Standard Posts",
        "emergency" => "Emergency Posts",
        "volunteer" => "Volunteer Posts",
        "campaign" => "Campaigns",
        "link" => "Link Posts",
        "poll" => "Polls",
        other => other,
    }
    .to_string()
}

/// Groups posts by type. Groups appear in the order their type is first seen.
pub fn group_by_type(posts: Vec<ServerPost>) -> Vec<PostGroup> {
    let mut groups: Vec<PostGroup> = Vec::new();
    for post in posts {
        match groups.iter_mut().find(|group| group.post_type == post.post_type) {
            Some(group) => group.posts.push(post),
            None => groups.push(PostGroup {
                post_type: post.post_type.clone(),
                title: type_title(&post.post_type),
                posts: vec![post],
            }),
        }
    }
    groups
}
