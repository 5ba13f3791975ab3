//! Mock platform adapter for testing
//!
//! A configurable adapter that simulates identity checks and publishes
//! without network access. Call counters and captured content let tests
//! assert not only on outcomes but on which remote operations were (or were
//! not) attempted.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::{PlatformError, Result};
use crate::platforms::PlatformClient;
use crate::types::{Content, Platform};

/// Configuration for mock adapter behavior
#[derive(Clone)]
pub struct MockConfig {
    pub platform: Platform,

    /// Whether the identity check should pass
    pub identity_valid: bool,

    /// Remote id returned on a successful publish
    pub remote_id: String,

    /// Error message to return from publish instead of succeeding
    pub publish_error: Option<String>,

    /// Delay before completing operations (simulates network latency)
    pub delay: Duration,

    /// Number of identity checks performed
    pub verify_calls: Arc<Mutex<usize>>,

    /// Number of publish attempts performed
    pub publish_calls: Arc<Mutex<usize>>,

    /// Content that reached publish (for verification)
    pub published: Arc<Mutex<Vec<Content>>>,
}

impl MockConfig {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            identity_valid: true,
            remote_id: format!("{}-post-1", platform),
            publish_error: None,
            delay: Duration::from_millis(0),
            verify_calls: Arc::new(Mutex::new(0)),
            publish_calls: Arc::new(Mutex::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock adapter for dispatcher and aggregation tests
pub struct MockClient {
    config: MockConfig,
}

impl MockClient {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Adapter whose identity check passes and whose publish succeeds.
    pub fn success(platform: Platform, remote_id: &str) -> Self {
        Self::new(MockConfig {
            remote_id: remote_id.to_string(),
            ..MockConfig::new(platform)
        })
    }

    /// Adapter whose identity check rejects the token.
    pub fn expired_token(platform: Platform) -> Self {
        Self::new(MockConfig {
            identity_valid: false,
            ..MockConfig::new(platform)
        })
    }

    /// Adapter whose publish fails with the given remote error message.
    pub fn publish_failure(platform: Platform, error: &str) -> Self {
        Self::new(MockConfig {
            publish_error: Some(error.to_string()),
            ..MockConfig::new(platform)
        })
    }

    /// Adapter that succeeds after simulated latency.
    pub fn with_delay(platform: Platform, delay: Duration) -> Self {
        Self::new(MockConfig {
            delay,
            ..MockConfig::new(platform)
        })
    }

    pub fn verify_calls(&self) -> usize {
        *self.config.verify_calls.lock().unwrap()
    }

    pub fn publish_calls(&self) -> usize {
        *self.config.publish_calls.lock().unwrap()
    }

    /// Handles to the shared counters, usable after the client has been
    /// moved into a registry.
    pub fn counters(&self) -> (Arc<Mutex<usize>>, Arc<Mutex<usize>>) {
        (
            Arc::clone(&self.config.verify_calls),
            Arc::clone(&self.config.publish_calls),
        )
    }

    pub fn published(&self) -> Vec<Content> {
        self.config.published.lock().unwrap().clone()
    }

    /// Handle to the captured publishes, usable after the client has been
    /// moved into a registry.
    pub fn published_handle(&self) -> Arc<Mutex<Vec<Content>>> {
        Arc::clone(&self.config.published)
    }
}

#[async_trait]
impl PlatformClient for MockClient {
    fn platform(&self) -> Platform {
        self.config.platform
    }

    async fn verify_identity(&self, _access_token: &str) -> Result<()> {
        *self.config.verify_calls.lock().unwrap() += 1;

        if self.config.delay > Duration::from_millis(0) {
            sleep(self.config.delay).await;
        }

        if self.config.identity_valid {
            Ok(())
        } else {
            Err(PlatformError::Authentication(format!(
                "{} identity check failed: token rejected",
                self.config.platform
            ))
            .into())
        }
    }

    async fn publish(&self, _access_token: &str, content: &Content) -> Result<String> {
        *self.config.publish_calls.lock().unwrap() += 1;

        if self.config.delay > Duration::from_millis(0) {
            sleep(self.config.delay).await;
        }

        if let Some(error) = &self.config.publish_error {
            return Err(PlatformError::Publishing(error.clone()).into());
        }

        self.config.published.lock().unwrap().push(content.clone());
        Ok(self.config.remote_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_mock_counts_calls() {
        let client = MockClient::success(Platform::Facebook, "fb-99");

        client.verify_identity("token").await.unwrap();
        let id = client
            .publish("token", &Content::text_only("hello"))
            .await
            .unwrap();

        assert_eq!(id, "fb-99");
        assert_eq!(client.verify_calls(), 1);
        assert_eq!(client.publish_calls(), 1);
        assert_eq!(client.published().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_mock() {
        let client = MockClient::expired_token(Platform::Twitter);
        let result = client.verify_identity("stale").await;
        assert!(result.is_err());
        assert_eq!(client.verify_calls(), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_mock_keeps_message() {
        let client = MockClient::publish_failure(Platform::Facebook, "rate limited");
        let result = client.publish("token", &Content::text_only("hi")).await;

        match result {
            Err(crate::error::CrosscastError::Platform(PlatformError::Publishing(msg))) => {
                assert_eq!(msg, "rate limited");
            }
            other => panic!("Expected publishing error, got {:?}", other.map(|_| ())),
        }
    }
}
