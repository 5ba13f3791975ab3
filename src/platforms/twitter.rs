//! Twitter v2 API adapter
//!
//! Publishes via `POST /2/tweets` with bearer authentication. The v2 media
//! upload flow is a separate multi-step protocol, so an attached image is
//! carried as its URL appended to the tweet text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::{HttpConfig, PlatformEndpoints};
use crate::error::{PlatformError, Result};
use crate::platforms::{build_http_client, remote_error_detail, transport_error, PlatformClient};
use crate::types::{Content, Platform};

pub struct TwitterClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct TweetResponse {
    data: Option<TweetData>,
}

#[derive(Deserialize)]
struct TweetData {
    id: Option<String>,
}

impl TwitterClient {
    pub fn new(endpoints: &PlatformEndpoints, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(http)?,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlatformClient for TwitterClient {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn verify_identity(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/2/users/me", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(Platform::Twitter, "identity check", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Authentication(format!(
                "Twitter identity check failed: {}",
                remote_error_detail(status, &body, "/detail")
            ))
            .into());
        }
        Ok(())
    }

    async fn publish(&self, access_token: &str, content: &Content) -> Result<String> {
        let text = match &content.image_url {
            Some(image_url) => format!("{} {}", content.text, image_url),
            None => content.text.clone(),
        };

        let response = self
            .http
            .post(format!("{}/2/tweets", self.api_base))
            .bearer_auth(access_token)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| transport_error(Platform::Twitter, "publish", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(Platform::Twitter, "publish", e))?;

        if !status.is_success() {
            return Err(PlatformError::Publishing(format!(
                "Twitter publishing failed: {}",
                remote_error_detail(status, &body, "/detail")
            ))
            .into());
        }

        let parsed: TweetResponse =
            serde_json::from_str(&body).unwrap_or(TweetResponse { data: None });
        parsed
            .data
            .and_then(|d| d.id)
            .ok_or_else(|| {
                PlatformError::Publishing("Twitter response missing tweet id".to_string()).into()
            })
    }
}
