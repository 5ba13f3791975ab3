//! Publish dispatch orchestration
//!
//! One dispatch covers all requested platforms for one publish request:
//! partition targets by connectedness, gate connected credentials through
//! the token validator, fan the publish calls out concurrently, and fold
//! every terminal outcome into a single `PublishResult`. No platform's
//! failure aborts the others; partial failure is an expected outcome, not
//! an exceptional path.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::aggregate::{aggregate, PublishResult};
use crate::error::Result;
use crate::platforms::{PlatformClient, PlatformRegistry};
use crate::store::CredentialStore;
use crate::types::{Credential, FailureReason, Platform, PublishOutcome, PublishRequest};
use crate::validator::TokenValidator;

pub struct Dispatcher {
    registry: Arc<PlatformRegistry>,
    store: Arc<dyn CredentialStore>,
    max_concurrency: Option<usize>,
}

impl Dispatcher {
    pub fn new(registry: Arc<PlatformRegistry>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            registry,
            store,
            max_concurrency: None,
        }
    }

    /// Build a dispatcher with adapters for all supported platforms,
    /// honoring the configured concurrency ceiling if one is set.
    pub fn from_config(config: &crate::config::Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let registry = PlatformRegistry::from_config(config)?;
        let mut dispatcher = Self::new(Arc::new(registry), store);
        if let Some(limit) = config.http.max_concurrent_requests {
            dispatcher = dispatcher.with_max_concurrency(limit);
        }
        Ok(dispatcher)
    }

    /// Cap the number of simultaneous in-flight platform calls per dispatch.
    /// Without a cap, every requested platform gets its own in-flight call.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    /// Dispatch using the principal's stored credentials.
    pub async fn dispatch_for_principal(
        &self,
        principal: &str,
        request: &PublishRequest,
    ) -> Result<PublishResult> {
        let credentials = self.store.list_active(principal).await?;
        self.dispatch(Some(credentials.as_slice()), request).await
    }

    /// The sole orchestration entry point.
    ///
    /// `credentials: None` means no principal was supplied: every target is
    /// trivially marked successful with a synthetic id and no credential
    /// store or network traffic occurs (unauthenticated/demo calls).
    ///
    /// # Errors
    ///
    /// Only a structurally invalid request (empty text, empty target set)
    /// aborts the whole operation. Per-platform failures are returned as
    /// data in the `PublishResult`.
    pub async fn dispatch(
        &self,
        credentials: Option<&[Credential]>,
        request: &PublishRequest,
    ) -> Result<PublishResult> {
        request.validate()?;
        let targets = request.unique_targets();

        let credentials = match credentials {
            Some(credentials) => credentials,
            None => return Ok(self.dispatch_demo(&targets)),
        };

        let tasks = targets.iter().map(|&platform| {
            let credential = credentials
                .iter()
                .find(|c| c.platform == platform && c.active);
            async move {
                match credential {
                    // No credential for a requested platform: decided
                    // locally, no network call is made.
                    None => PublishOutcome::failure(
                        platform,
                        FailureReason::NotConnected,
                        format!("{} account not connected", platform),
                    ),
                    Some(credential) => self.publish_one(platform, credential, request).await,
                }
            }
        });

        // Futures are built in request order and collected with an ordered
        // buffer, so outcomes stay deterministic regardless of which
        // platform finishes first. The join point waits for every call to
        // reach a terminal state.
        let in_flight = self.max_concurrency.unwrap_or(targets.len()).max(1);
        let outcomes: Vec<PublishOutcome> = stream::iter(tasks).buffered(in_flight).collect().await;

        Ok(aggregate(outcomes))
    }

    /// Validate-then-publish for one connected platform.
    async fn publish_one(
        &self,
        platform: Platform,
        credential: &Credential,
        request: &PublishRequest,
    ) -> PublishOutcome {
        let client: Arc<dyn PlatformClient> = match self.registry.get(platform) {
            Some(client) => client,
            None => {
                return PublishOutcome::failure(
                    platform,
                    FailureReason::PublishRejected,
                    format!("No adapter registered for {}", platform),
                )
            }
        };

        if !TokenValidator::is_valid(client.as_ref(), credential).await {
            // Credential is left intact; refresh is the caller's concern.
            return PublishOutcome::failure(
                platform,
                FailureReason::TokenExpired,
                "Access token expired. Please reconnect your account.",
            );
        }

        info!(platform = %platform, "Publishing");
        match client.publish(&credential.access_token, &request.content).await {
            Ok(remote_id) => {
                info!(platform = %platform, remote_id = %remote_id, "Published");
                self.touch_credential(credential).await;
                PublishOutcome::success(platform, remote_id)
            }
            Err(e) => {
                warn!(platform = %platform, "Publish failed: {}", e);
                let detail = match &e {
                    crate::error::CrosscastError::Platform(pe) => pe.detail().to_string(),
                    other => other.to_string(),
                };
                PublishOutcome::failure(platform, FailureReason::PublishRejected, detail)
            }
        }
    }

    /// Best-effort `last_used_at` stamp. A failed write never demotes a
    /// successful publish.
    async fn touch_credential(&self, credential: &Credential) {
        if let Err(e) = self.store.touch(&credential.id, chrono::Utc::now()).await {
            warn!(
                credential_id = %credential.id,
                "Failed to update last-used timestamp: {}",
                e
            );
        }
    }

    fn dispatch_demo(&self, targets: &[Platform]) -> PublishResult {
        let outcomes = targets
            .iter()
            .map(|&platform| {
                info!(platform = %platform, "Demo dispatch, no remote call");
                PublishOutcome::success(platform, format!("demo-{}", uuid::Uuid::new_v4()))
            })
            .collect();
        aggregate(outcomes)
    }
}
