//! Result aggregation
//!
//! Folds the per-platform outcomes of one dispatch into a single
//! `PublishResult`. Pure and idempotent: the same outcome sequence always
//! produces the same result, and the summary message is derived only from
//! which platforms landed in which bucket, never from error internals.

use serde::{Deserialize, Serialize};

use crate::types::{Platform, PublishFailure, PublishOutcome, PublishSuccess};

/// Net effect of one dispatch across all requested platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    AllSucceeded,
    PartialSuccess,
    AllFailed,
    /// Only reachable when the outcome sequence was empty; upstream request
    /// validation rejects empty target sets before dispatch.
    NothingAttempted,
}

/// The aggregated response for one publish request. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub succeeded: Vec<PublishSuccess>,
    pub failed: Vec<PublishFailure>,
    pub overall: OverallStatus,
    pub message: String,
}

impl PublishResult {
    pub fn succeeded_platforms(&self) -> Vec<Platform> {
        self.succeeded.iter().map(|s| s.platform).collect()
    }

    pub fn failed_platforms(&self) -> Vec<Platform> {
        self.failed.iter().map(|f| f.platform).collect()
    }
}

/// Fold outcomes into a `PublishResult`, preserving their order within each
/// bucket.
pub fn aggregate(outcomes: Vec<PublishOutcome>) -> PublishResult {
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for outcome in outcomes {
        match outcome {
            PublishOutcome::Success(success) => succeeded.push(success),
            PublishOutcome::Failure(failure) => failed.push(failure),
        }
    }

    let overall = match (succeeded.is_empty(), failed.is_empty()) {
        (false, true) => OverallStatus::AllSucceeded,
        (false, false) => OverallStatus::PartialSuccess,
        (true, false) => OverallStatus::AllFailed,
        (true, true) => OverallStatus::NothingAttempted,
    };

    let message = summary_message(overall, &succeeded, &failed);

    PublishResult {
        succeeded,
        failed,
        overall,
        message,
    }
}

fn platform_list(platforms: impl Iterator<Item = Platform>) -> String {
    platforms
        .map(|p| p.as_str().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary_message(
    overall: OverallStatus,
    succeeded: &[PublishSuccess],
    failed: &[PublishFailure],
) -> String {
    match overall {
        OverallStatus::AllSucceeded => format!(
            "Posted successfully to {}!",
            platform_list(succeeded.iter().map(|s| s.platform))
        ),
        OverallStatus::PartialSuccess => format!(
            "Partially successful. Posted to {}, but failed for {}.",
            platform_list(succeeded.iter().map(|s| s.platform)),
            platform_list(failed.iter().map(|f| f.platform))
        ),
        OverallStatus::AllFailed => {
            "All posts failed. Please check your connections and try again.".to_string()
        }
        OverallStatus::NothingAttempted => "No posts were attempted.".to_string(),
    }
}
