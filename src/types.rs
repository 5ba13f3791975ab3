//! Core types for Crosscast

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CrosscastError, Result};

/// The social networks Crosscast can publish to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Twitter,
    Linkedin,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Instagram,
    ];

    /// Lowercase identifier used in config keys, logs, and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Instagram => "instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CrosscastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "twitter" => Ok(Platform::Twitter),
            "linkedin" => Ok(Platform::Linkedin),
            "instagram" => Ok(Platform::Instagram),
            _ => Err(CrosscastError::InvalidInput(format!(
                "Unsupported platform: '{}'. Valid options: facebook, twitter, linkedin, instagram",
                s
            ))),
        }
    }
}

/// Stored OAuth access material for one principal on one platform.
///
/// At most one active credential exists per (principal, platform) pair;
/// connecting a new account for a platform replaces the prior one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub platform: Platform,
    pub platform_user_id: String,
    pub display_name: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub active: bool,
    pub connected_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(platform: Platform, platform_user_id: &str, access_token: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            platform,
            platform_user_id: platform_user_id.to_string(),
            display_name: platform_user_id.to_string(),
            access_token: access_token.to_string(),
            refresh_token: None,
            token_expiry: None,
            active: true,
            connected_at: Utc::now(),
            last_used_at: None,
        }
    }
}

/// The content of one post, shared across all target platforms.
///
/// Each adapter shapes this into its own wire payload; platforms that
/// require media (Instagram) reject content without `image_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    pub image_url: Option<Url>,
}

impl Content {
    pub fn text_only(text: &str) -> Self {
        Self {
            text: text.to_string(),
            image_url: None,
        }
    }

    pub fn with_image(text: &str, image_url: Url) -> Self {
        Self {
            text: text.to_string(),
            image_url: Some(image_url),
        }
    }
}

/// One publish operation targeting a set of platforms. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub content: Content,
    pub target_platforms: Vec<Platform>,
}

impl PublishRequest {
    pub fn new(content: Content, target_platforms: Vec<Platform>) -> Self {
        Self {
            content,
            target_platforms,
        }
    }

    /// Structural validation. The only condition that aborts a dispatch
    /// before any platform is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.content.text.trim().is_empty() {
            return Err(CrosscastError::InvalidInput(
                "Content text cannot be empty".to_string(),
            ));
        }
        if self.target_platforms.is_empty() {
            return Err(CrosscastError::InvalidInput(
                "At least one target platform is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Target platforms with duplicates collapsed to their first occurrence,
    /// preserving request order. Keeps every platform accounted for exactly
    /// once in the outcome set.
    pub fn unique_targets(&self) -> Vec<Platform> {
        let mut seen = Vec::with_capacity(self.target_platforms.len());
        for platform in &self.target_platforms {
            if !seen.contains(platform) {
                seen.push(*platform);
            }
        }
        seen
    }
}

/// Why a platform ended up in the failed bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No active credential for the requested platform. Decided locally,
    /// no network call is made.
    NotConnected,
    /// The platform's identity endpoint rejected the stored token.
    TokenExpired,
    /// The publish call was attempted and failed, or a local precondition
    /// (missing required image) was not met.
    PublishRejected,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotConnected => write!(f, "not_connected"),
            FailureReason::TokenExpired => write!(f, "token_expired"),
            FailureReason::PublishRejected => write!(f, "publish_rejected"),
        }
    }
}

/// A successful publish on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSuccess {
    pub platform: Platform,
    /// Platform-assigned identifier of the created post.
    pub remote_id: String,
}

/// A failed publish on one platform. The detail message is preserved
/// verbatim from the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishFailure {
    pub platform: Platform,
    pub reason: FailureReason,
    pub detail: String,
}

/// Terminal result of one platform's publish attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PublishOutcome {
    Success(PublishSuccess),
    Failure(PublishFailure),
}

impl PublishOutcome {
    pub fn success(platform: Platform, remote_id: String) -> Self {
        PublishOutcome::Success(PublishSuccess {
            platform,
            remote_id,
        })
    }

    pub fn failure(platform: Platform, reason: FailureReason, detail: impl Into<String>) -> Self {
        PublishOutcome::Failure(PublishFailure {
            platform,
            reason,
            detail: detail.into(),
        })
    }

    pub fn platform(&self) -> Platform {
        match self {
            PublishOutcome::Success(s) => s.platform,
            PublishOutcome::Failure(f) => f.platform,
        }
    }
}
