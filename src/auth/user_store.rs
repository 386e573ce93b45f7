//! Credential Storage
//! Mission: Hold the seed credential records, built once at bootstrap

use crate::auth::{models::CredentialRecord, password};
use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::info;

/// In-memory credential store.
///
/// Filled through `register_seed_identity*` during startup and then shared
/// read-only (usually behind an `Arc`).
pub struct CredentialStore {
    records: HashMap<String, CredentialRecord>,
    bcrypt_cost: u32,
    // Verified against when the identifier is unknown so a miss costs as much as a hit
    decoy_verifier: String,
}

impl CredentialStore {
    pub fn new(bcrypt_cost: u32) -> Result<Self> {
        let decoy_verifier = password::hash_password("decoy-password", bcrypt_cost)?;

        Ok(Self {
            records: HashMap::new(),
            bcrypt_cost,
            decoy_verifier,
        })
    }

    /// Register an identity whose token subject is its login name
    pub fn register_seed_identity(&mut self, identifier: &str, plaintext_password: &str) -> Result<()> {
        self.register_seed_identity_as(identifier, identifier, plaintext_password)
    }

    /// Register an identity that logs in as `identifier` and is issued tokens for `subject`
    pub fn register_seed_identity_as(
        &mut self,
        identifier: &str,
        subject: &str,
        plaintext_password: &str,
    ) -> Result<()> {
        if identifier.is_empty() || subject.is_empty() {
            bail!("Seed identity needs a non-empty identifier and subject");
        }
        if self.records.contains_key(identifier) {
            bail!("Identity already registered: {}", identifier);
        }

        let verifier = password::hash_password(plaintext_password, self.bcrypt_cost)?;

        self.records.insert(
            identifier.to_string(),
            CredentialRecord {
                identifier: identifier.to_string(),
                subject: subject.to_string(),
                verifier,
            },
        );

        info!("🔐 Seed identity registered: {} (subject: {})", identifier, subject);
        Ok(())
    }

    /// Get record by identifier
    pub fn get(&self, identifier: &str) -> Option<&CredentialRecord> {
        self.records.get(identifier)
    }

    pub fn decoy_verifier(&self) -> &str {
        &self.decoy_verifier
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
