//! ClickUp v2 REST client
//!
//! [`ClickUpClient`] is the rate-limited fetcher every remote call goes through.
//! A single attempt maps the response to:
//!
//! - any 2xx: the parsed JSON body
//! - 429: [`Error::RateLimited`], retried with backoff
//! - other statuses: [`Error::Http`], returned immediately
//! - 2xx with a body that is not JSON: [`Error::Decode`], returned immediately
//! - network failure: [`Error::Transport`], retried without sleeping
//!
//! Hierarchy walking and task enumeration live in [`hierarchy`], per-task
//! endpoints in [`tasks`].

pub mod hierarchy;
pub mod model;
pub mod tasks;

use crate::config::{ClickUpConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::retry::with_backoff;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Query parameters for one request
pub type Query = Vec<(&'static str, String)>;

/// HTTP client for the ClickUp API with retry/backoff on every GET
#[derive(Clone, Debug)]
pub struct ClickUpClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl ClickUpClient {
    /// Create a client sending the configured token on every request
    ///
    /// # Errors
    /// Returns error if the token is not a valid header value or the HTTP
    /// client cannot be built
    pub fn new(config: &ClickUpConfig, retry: RetryConfig) -> Result<Self> {
        let mut token = HeaderValue::from_str(config.api_token.trim()).map_err(|_| Error::Config {
            message: "API token contains characters not allowed in a header".into(),
            key: Some("clickup.api_token".into()),
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .user_agent(concat!("clickup-sheets-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
                key: None,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Retry policy applied to every request
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Absolute URL for an API path such as `task/123/time`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a path and return the parsed JSON body, retrying per the policy
    pub async fn get_json(&self, path: &str, query: &Query) -> Result<Value> {
        let url = self.url(path);
        with_backoff(&self.retry, &url, || self.get_once(&url, query)).await
    }

    /// GET a path and decode the body into `T`
    ///
    /// A body that does not match `T` is a [`Error::Decode`] and is not retried.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T> {
        let body = self.get_json(path, query).await?;
        serde_json::from_value(body).map_err(|e| Error::decode(path, e))
    }

    async fn get_once(&self, url: &str, query: &Query) -> Result<Value> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        tracing::debug!(url, status = status.as_u16(), "request succeeded");
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::decode(url, e))
    }
}

/// Percent-encode an id for use as a path segment
pub(crate) fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
