//! Platform adapters
//!
//! One adapter per social network, all behind the [`PlatformClient`] trait.
//! An adapter owns every wire-format difference of its platform: the
//! identity-check endpoint, the publish endpoint(s), payload shaping for
//! text-only versus media posts, and extraction of the platform's error
//! message. The dispatcher sees none of that: it looks adapters up in a
//! [`PlatformRegistry`] and calls `verify_identity` and `publish`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{Config, HttpConfig};
use crate::error::{PlatformError, Result};
use crate::types::{Content, Platform};

pub mod facebook;
pub mod instagram;
pub mod linkedin;
pub mod twitter;

// Mock adapter is compiled for all builds so integration tests and demos
// can exercise the dispatcher without network access.
pub mod mock;

/// Capability set every platform adapter provides.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Which platform this adapter speaks for.
    fn platform(&self) -> Platform;

    /// Cheap read-only identity check ("whoami") against the platform.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` when the platform rejects the
    /// token and `PlatformError::Network` on transport problems. Callers
    /// gating a publish treat any error as an invalid token.
    async fn verify_identity(&self, access_token: &str) -> Result<()>;

    /// Publish the content and return the platform-assigned post id.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Publishing` with the platform's own error
    /// message when the remote call fails, when the response is missing the
    /// expected identifier, or when a local precondition is not met;
    /// `PlatformError::Network` on transport problems.
    async fn publish(&self, access_token: &str, content: &Content) -> Result<String>;
}

/// Lookup table of adapters, one per platform.
///
/// Adding a platform is additive: implement [`PlatformClient`] and register
/// the new adapter; nothing in the dispatcher changes.
#[derive(Default)]
pub struct PlatformRegistry {
    clients: HashMap<Platform, Arc<dyn PlatformClient>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters for all four platforms from the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(facebook::FacebookClient::new(
            &config.facebook,
            &config.http,
        )?));
        registry.register(Arc::new(twitter::TwitterClient::new(
            &config.twitter,
            &config.http,
        )?));
        registry.register(Arc::new(linkedin::LinkedinClient::new(
            &config.linkedin,
            &config.http,
        )?));
        registry.register(Arc::new(instagram::InstagramClient::new(
            &config.instagram,
            &config.http,
        )?));
        Ok(registry)
    }

    pub fn register(&mut self, client: Arc<dyn PlatformClient>) {
        self.clients.insert(client.platform(), client);
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformClient>> {
        self.clients.get(&platform).cloned()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Build the HTTP client an adapter uses for its platform calls.
///
/// The per-call timeout lives here, so a slow platform times out on its own
/// without affecting the other platforms in the same dispatch.
pub(crate) fn build_http_client(http: &HttpConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .map_err(|e| PlatformError::Network(format!("Failed to build HTTP client: {}", e)).into())
}

/// Map a reqwest transport error to a `PlatformError::Network`.
pub(crate) fn transport_error(platform: Platform, context: &str, err: reqwest::Error) -> PlatformError {
    if err.is_timeout() {
        PlatformError::Network(format!(
            "{} request timed out ({}): {}",
            platform, context, err
        ))
    } else {
        PlatformError::Network(format!("{} request failed ({}): {}", platform, context, err))
    }
}

/// Pull the platform's human-readable error message out of a response body.
///
/// `pointer` is a JSON pointer to the message field (e.g. `/error/message`
/// for the Graph APIs, `/detail` for Twitter v2, `/message` for LinkedIn).
/// Falls back to the raw body, then to the HTTP status, so the detail string
/// is never empty.
pub(crate) fn remote_error_detail(status: reqwest::StatusCode, body: &str, pointer: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.pointer(pointer).and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::mock::MockClient;

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = PlatformRegistry::new();
        registry.register(Arc::new(MockClient::success(Platform::Facebook, "fb-1")));
        registry.register(Arc::new(MockClient::success(Platform::Twitter, "tw-1")));

        assert_eq!(registry.len(), 2);
        assert!(registry.get(Platform::Facebook).is_some());
        assert!(registry.get(Platform::Linkedin).is_none());
    }

    #[test]
    fn test_registry_from_config_covers_all_platforms() {
        let config = Config::default_config();
        let registry = PlatformRegistry::from_config(&config).unwrap();

        for platform in Platform::ALL {
            assert!(registry.get(platform).is_some(), "missing {}", platform);
        }
    }

    #[test]
    fn test_remote_error_detail_json_pointer() {
        let body = r#"{"error":{"message":"rate limited","code":32}}"#;
        let detail = remote_error_detail(reqwest::StatusCode::FORBIDDEN, body, "/error/message");
        assert_eq!(detail, "rate limited");
    }

    #[test]
    fn test_remote_error_detail_falls_back_to_body() {
        let detail = remote_error_detail(
            reqwest::StatusCode::BAD_GATEWAY,
            "upstream unavailable",
            "/error/message",
        );
        assert_eq!(detail, "upstream unavailable");
    }

    #[test]
    fn test_remote_error_detail_falls_back_to_status() {
        let detail =
            remote_error_detail(reqwest::StatusCode::BAD_GATEWAY, "  ", "/error/message");
        assert_eq!(detail, "HTTP 502 Bad Gateway");
    }
}
