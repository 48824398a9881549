use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;
use std::fmt;

use crate::http::AppError;

/// A bearer credential ready to be attached to a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Bearer(String);

impl Bearer {
    pub fn new(token: impl Into<String>) -> Result<Self, AppError> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::AuthenticationRequired);
        }
        Ok(Self(token.to_string()))
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub(crate) fn header_value(&self) -> Result<HeaderValue, AppError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))
            .map_err(|_| AppError::AuthenticationRequired)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Bearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Bearer(***)")
    }
}

pub(crate) fn authorize(
    builder: RequestBuilder,
    bearer: Option<&Bearer>,
) -> Result<RequestBuilder, AppError> {
    match bearer {
        Some(bearer) => Ok(builder.header(AUTHORIZATION, bearer.header_value()?)),
        None => Ok(builder),
    }
}
