//! Token validation
//!
//! A point-in-time check that a stored credential is still accepted by its
//! platform, performed through the adapter's identity-check call. The check
//! is fail-closed: any transport error, non-2xx response, or malformed
//! payload counts as invalid. One attempt, no retries; a passing check does
//! not guarantee the subsequent publish will succeed (scope differences can
//! still reject it).

use tracing::debug;

use crate::platforms::PlatformClient;
use crate::types::Credential;

pub struct TokenValidator;

impl TokenValidator {
    /// Whether the platform still accepts this credential's access token.
    pub async fn is_valid(client: &dyn PlatformClient, credential: &Credential) -> bool {
        match client.verify_identity(&credential.access_token).await {
            Ok(()) => true,
            Err(e) => {
                debug!(
                    platform = %credential.platform,
                    credential_id = %credential.id,
                    "Token validation failed: {}",
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::mock::MockClient;
    use crate::types::Platform;

    #[tokio::test]
    async fn test_valid_token() {
        let client = MockClient::success(Platform::Facebook, "fb-1");
        let credential = Credential::new(Platform::Facebook, "user", "good-token");

        assert!(TokenValidator::is_valid(&client, &credential).await);
        assert_eq!(client.verify_calls(), 1);
    }

    #[tokio::test]
    async fn test_rejected_token_is_invalid() {
        let client = MockClient::expired_token(Platform::Twitter);
        let credential = Credential::new(Platform::Twitter, "user", "stale-token");

        assert!(!TokenValidator::is_valid(&client, &credential).await);
    }

    #[tokio::test]
    async fn test_single_attempt_no_retries() {
        let client = MockClient::expired_token(Platform::Linkedin);
        let credential = Credential::new(Platform::Linkedin, "user", "stale-token");

        TokenValidator::is_valid(&client, &credential).await;
        assert_eq!(client.verify_calls(), 1);
    }
}
