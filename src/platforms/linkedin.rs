//! LinkedIn v2 API adapter
//!
//! Publishing is two calls: the member's profile id is fetched first (the
//! UGC payload needs an author URN), then the share is created via
//! `POST /v2/ugcPosts`. An image is attached by reference to its URL with
//! `shareMediaCategory` set to `IMAGE`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::{HttpConfig, PlatformEndpoints};
use crate::error::{PlatformError, Result};
use crate::platforms::{build_http_client, remote_error_detail, transport_error, PlatformClient};
use crate::types::{Content, Platform};

pub struct LinkedinClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct ProfileResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct UgcPostResponse {
    id: Option<String>,
}

impl LinkedinClient {
    pub fn new(endpoints: &PlatformEndpoints, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(http)?,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_profile_id(&self, access_token: &str) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/v2/people/~", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(Platform::Linkedin, "profile lookup", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(Platform::Linkedin, "profile lookup", e))?;

        if !status.is_success() {
            return Err(PlatformError::Publishing(format!(
                "LinkedIn publishing failed: {}",
                remote_error_detail(status, &body, "/message")
            ))
            .into());
        }

        let parsed: ProfileResponse =
            serde_json::from_str(&body).unwrap_or(ProfileResponse { id: None });
        parsed.id.ok_or_else(|| {
            PlatformError::Publishing("LinkedIn profile response missing member id".to_string())
                .into()
        })
    }
}

#[async_trait]
impl PlatformClient for LinkedinClient {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    async fn verify_identity(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/v2/people/~", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(Platform::Linkedin, "identity check", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Authentication(format!(
                "LinkedIn identity check failed: {}",
                remote_error_detail(status, &body, "/message")
            ))
            .into());
        }
        Ok(())
    }

    async fn publish(&self, access_token: &str, content: &Content) -> Result<String> {
        let author_id = self.fetch_profile_id(access_token).await?;

        let mut share_content = json!({
            "shareCommentary": { "text": content.text },
            "shareMediaCategory": if content.image_url.is_some() { "IMAGE" } else { "NONE" },
        });
        if let Some(image_url) = &content.image_url {
            share_content["media"] = json!([{
                "status": "READY",
                "originalUrl": image_url.as_str(),
            }]);
        }

        let payload = json!({
            "author": format!("urn:li:person:{}", author_id),
            "lifecycleState": "PUBLISHED",
            "specificContent": { "com.linkedin.ugc.ShareContent": share_content },
            "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" },
        });

        let response = self
            .http
            .post(format!("{}/v2/ugcPosts", self.api_base))
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(Platform::Linkedin, "publish", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(Platform::Linkedin, "publish", e))?;

        if !status.is_success() {
            return Err(PlatformError::Publishing(format!(
                "LinkedIn publishing failed: {}",
                remote_error_detail(status, &body, "/message")
            ))
            .into());
        }

        let parsed: UgcPostResponse =
            serde_json::from_str(&body).unwrap_or(UgcPostResponse { id: None });
        parsed.id.ok_or_else(|| {
            PlatformError::Publishing("LinkedIn response missing share id".to_string()).into()
        })
    }
}
