//! Crosscast - publish one post to many social networks
//!
//! This library is the multi-platform publish orchestration core: given a
//! principal's stored OAuth credentials and one piece of content, it
//! validates each credential, fans out platform-specific publish calls
//! concurrently, and folds the per-platform outcomes into a single result.

pub mod aggregate;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod platforms;
pub mod store;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use aggregate::{aggregate, OverallStatus, PublishResult};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{CrosscastError, Result};
pub use platforms::{PlatformClient, PlatformRegistry};
pub use store::{CredentialStore, MemoryCredentialStore};
pub use types::{
    Content, Credential, FailureReason, Platform, PublishFailure, PublishOutcome, PublishRequest,
    PublishSuccess,
};
