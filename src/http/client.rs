use anyhow::{anyhow, Result};
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::http::auth::{authorize, Bearer};
use crate::http::error::GENERIC_FAILURE;
use crate::http::AppError;

/// Thin wrapper over `reqwest` that knows the API base URL and how the API
/// reports failures.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| anyhow!("failed to build http client: {}", err))?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url =
            Url::parse(&normalized).map_err(|err| anyhow!("invalid API base url: {}", err))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| AppError::network(format!("invalid request path {}: {}", path, err)))
    }

    #[instrument(skip(self, bearer))]
    pub async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        bearer: Option<&Bearer>,
        failure_message: &str,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let builder = self.client.get(self.url(path)?).query(query);
        let builder = authorize(builder, bearer)?;
        self.execute(builder, failure_message).await
    }

    #[instrument(skip(self, body, bearer))]
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&Bearer>,
        failure_message: &str,
    ) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.client.post(self.url(path)?).json(body);
        let builder = authorize(builder, bearer)?;
        self.execute(builder, failure_message).await
    }

    /// reqwest sets the multipart boundary header itself.
    #[instrument(skip(self, form, bearer))]
    pub async fn post_multipart<T>(
        &self,
        path: &str,
        form: Form,
        bearer: Option<&Bearer>,
        failure_message: &str,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let builder = self.client.post(self.url(path)?).multipart(form);
        let builder = authorize(builder, bearer)?;
        self.execute(builder, failure_message).await
    }

    async fn execute<T>(&self, builder: RequestBuilder, failure_message: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await.map_err(|err| {
            tracing::error!(error = ?err, "request failed before a response arrived");
            AppError::network(err.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            tracing::error!(error = ?err, status = %status, "failed to read response body");
            AppError::network(err.to_string())
        })?;

        if !status.is_success() {
            let message = server_message(&body).unwrap_or_else(|| fallback(failure_message));
            tracing::warn!(status = %status, message = %message, "api returned an error");
            return Err(AppError::api(status, message));
        }

        serde_json::from_slice(&body).map_err(|err| {
            tracing::error!(error = ?err, status = %status, "failed to decode response body");
            AppError::UnexpectedResponse(err.to_string())
        })
    }
}

fn server_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

fn fallback(failure_message: &str) -> String {
    if failure_message.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        failure_message.to_string()
    }
}
