//! Credential Authority
//! Mission: Trade verified credentials for signed tokens, and tokens back for identities

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    models::{AccessToken, Identity},
    password,
    user_store::CredentialStore,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Issues and validates access tokens.
///
/// Holds no mutable state: the store is frozen after bootstrap and the signing
/// key never changes, so it is shared freely across request tasks.
pub struct CredentialAuthority {
    store: Arc<CredentialStore>,
    jwt: JwtHandler,
}

impl CredentialAuthority {
    pub fn new(store: Arc<CredentialStore>, jwt: JwtHandler) -> Self {
        Self { store, jwt }
    }

    /// Verify a username/password pair and issue a token valid from now
    pub fn authenticate(&self, identifier: &str, plaintext_password: &str) -> Result<AccessToken, AuthError> {
        self.authenticate_at(identifier, plaintext_password, Utc::now())
    }

    pub fn authenticate_at(
        &self,
        identifier: &str,
        plaintext_password: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AuthError> {
        let Some(record) = self.store.get(identifier) else {
            // Burn the same bcrypt work as a real check before refusing
            let _ = password::verify_password(plaintext_password, self.store.decoy_verifier());
            warn!("❌ Failed login attempt: {}", identifier);
            return Err(AuthError::InvalidCredentials);
        };

        let valid = password::verify_password(plaintext_password, &record.verifier).map_err(|e| {
            error!("Password verification failed for {}: {:#}", identifier, e);
            AuthError::Internal
        })?;

        if !valid {
            warn!("❌ Failed login attempt: {}", identifier);
            return Err(AuthError::InvalidCredentials);
        }

        self.jwt.generate_token_at(&record.subject, now).map_err(|e| {
            error!("Token issuance failed for {}: {:#}", identifier, e);
            AuthError::Internal
        })
    }

    /// Check signature and expiry of a presented token
    pub fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        self.jwt
            .validate_token_at(token, now)
            .map(|claims| Identity(claims.sub))
            .map_err(|e| {
                debug!("Rejected token: {:#}", e);
                AuthError::InvalidToken
            })
    }
}
