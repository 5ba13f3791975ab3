//! Instagram Graph API adapter
//!
//! Instagram only accepts media posts, so content without an image is
//! rejected locally before any network call. Publishing is a two-step
//! protocol: a media container is created first, then made live with a
//! separate publish call. The two steps form one atomic logical operation:
//! if the publish step fails after the container was created, the whole
//! operation is reported as failed.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::{HttpConfig, PlatformEndpoints};
use crate::error::{PlatformError, Result};
use crate::platforms::{build_http_client, remote_error_detail, transport_error, PlatformClient};
use crate::types::{Content, Platform};

pub struct InstagramClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct MediaResponse {
    id: Option<String>,
}

impl InstagramClient {
    pub fn new(endpoints: &PlatformEndpoints, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(http)?,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn post_media(
        &self,
        path: &str,
        payload: &serde_json::Value,
        context: &str,
    ) -> Result<String> {
        let response = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .json(payload)
            .send()
            .await
            .map_err(|e| transport_error(Platform::Instagram, context, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(Platform::Instagram, context, e))?;

        if !status.is_success() {
            return Err(PlatformError::Publishing(format!(
                "Instagram publishing failed: {}",
                remote_error_detail(status, &body, "/error/message")
            ))
            .into());
        }

        let parsed: MediaResponse =
            serde_json::from_str(&body).unwrap_or(MediaResponse { id: None });
        parsed.id.ok_or_else(|| {
            PlatformError::Publishing(format!(
                "Instagram {} response missing media id",
                context
            ))
            .into()
        })
    }
}

#[async_trait]
impl PlatformClient for InstagramClient {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn verify_identity(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/me", self.api_base))
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| transport_error(Platform::Instagram, "identity check", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Authentication(format!(
                "Instagram identity check failed: {}",
                remote_error_detail(status, &body, "/error/message")
            ))
            .into());
        }
        Ok(())
    }

    async fn publish(&self, access_token: &str, content: &Content) -> Result<String> {
        // Local precondition, checked before any network traffic
        let image_url = content.image_url.as_ref().ok_or_else(|| {
            PlatformError::Publishing("Instagram requires an image to post".to_string())
        })?;

        let creation_id = self
            .post_media(
                "/me/media",
                &json!({
                    "image_url": image_url.as_str(),
                    "caption": content.text,
                    "access_token": access_token,
                }),
                "media creation",
            )
            .await?;

        // Make the container live. A failure here fails the whole publish;
        // the dangling container is never reported as a success.
        self.post_media(
            "/me/media_publish",
            &json!({
                "creation_id": creation_id,
                "access_token": access_token,
            }),
            "media publish",
        )
        .await
    }
}
