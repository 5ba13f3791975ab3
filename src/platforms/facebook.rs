//! Facebook Graph API adapter
//!
//! Text posts go to `/me/feed`; posts with an image go to `/me/photos` with
//! the text as the caption. The Graph API authenticates via an
//! `access_token` field in the payload rather than a bearer header.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::{HttpConfig, PlatformEndpoints};
use crate::error::{PlatformError, Result};
use crate::platforms::{build_http_client, remote_error_detail, transport_error, PlatformClient};
use crate::types::{Content, Platform};

pub struct FacebookClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct GraphPostResponse {
    id: Option<String>,
}

impl FacebookClient {
    pub fn new(endpoints: &PlatformEndpoints, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(http)?,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlatformClient for FacebookClient {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn verify_identity(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/me", self.api_base))
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| transport_error(Platform::Facebook, "identity check", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Authentication(format!(
                "Facebook identity check failed: {}",
                remote_error_detail(status, &body, "/error/message")
            ))
            .into());
        }
        Ok(())
    }

    async fn publish(&self, access_token: &str, content: &Content) -> Result<String> {
        // Image posts use the photos endpoint with the text as caption
        let (url, payload) = match &content.image_url {
            Some(image_url) => (
                format!("{}/me/photos", self.api_base),
                json!({
                    "url": image_url.as_str(),
                    "caption": content.text,
                    "access_token": access_token,
                }),
            ),
            None => (
                format!("{}/me/feed", self.api_base),
                json!({
                    "message": content.text,
                    "access_token": access_token,
                }),
            ),
        };

        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(Platform::Facebook, "publish", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(Platform::Facebook, "publish", e))?;

        if !status.is_success() {
            return Err(PlatformError::Publishing(format!(
                "Facebook publishing failed: {}",
                remote_error_detail(status, &body, "/error/message")
            ))
            .into());
        }

        let parsed: GraphPostResponse = serde_json::from_str(&body).unwrap_or(GraphPostResponse {
            id: None,
        });
        parsed.id.ok_or_else(|| {
            PlatformError::Publishing("Facebook response missing post id".to_string()).into()
        })
    }
}
