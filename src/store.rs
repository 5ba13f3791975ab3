//! Credential store boundary
//!
//! Persistence of user and credential records lives outside this crate; the
//! dispatcher only needs to list a principal's active credentials and stamp
//! `last_used_at` after a successful publish. `MemoryCredentialStore` is a
//! reference implementation of that boundary, used by tests and demos.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{CrosscastError, Result};
use crate::types::{Credential, Platform};

/// Access to one principal's stored platform credentials.
///
/// `touch` is advisory telemetry: concurrent dispatches for the same
/// principal may race on it and last-writer-wins is acceptable.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// All active credentials for the principal, at most one per platform.
    async fn list_active(&self, principal: &str) -> Result<Vec<Credential>>;

    /// Record that a credential was just used for a successful publish.
    async fn touch(&self, credential_id: &str, at: DateTime<Utc>) -> Result<()>;
}

/// In-memory credential store keyed by principal.
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<String, Vec<Credential>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential for a principal, deactivating any prior active
    /// credential for the same platform. Returns the stored credential id.
    pub fn connect(&self, principal: &str, credential: Credential) -> String {
        let mut accounts = self.accounts.lock().unwrap();
        let entries = accounts.entry(principal.to_string()).or_default();
        for existing in entries.iter_mut() {
            if existing.platform == credential.platform {
                existing.active = false;
            }
        }
        let id = credential.id.clone();
        entries.push(credential);
        id
    }

    /// Remove every credential the principal holds for a platform.
    pub fn disconnect(&self, principal: &str, platform: Platform) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(entries) = accounts.get_mut(principal) {
            entries.retain(|c| c.platform != platform);
        }
    }

    /// Every credential for a principal, including deactivated ones.
    pub fn list_all(&self, principal: &str) -> Vec<Credential> {
        let accounts = self.accounts.lock().unwrap();
        accounts.get(principal).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn list_active(&self, principal: &str) -> Result<Vec<Credential>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .get(principal)
            .map(|entries| entries.iter().filter(|c| c.active).cloned().collect())
            .unwrap_or_default())
    }

    async fn touch(&self, credential_id: &str, at: DateTime<Utc>) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        for entries in accounts.values_mut() {
            if let Some(credential) = entries.iter_mut().find(|c| c.id == credential_id) {
                credential.last_used_at = Some(at);
                return Ok(());
            }
        }
        Err(CrosscastError::Store(format!(
            "No credential with id {}",
            credential_id
        )))
    }
}
