//! Password Hashing
//! Mission: Turn plaintext passwords into bcrypt verifiers of bounded-length input
//!
//! bcrypt only looks at the first 72 bytes of its input, so every password is
//! first reduced to the hex SHA-256 digest (64 bytes) and that digest is what
//! gets hashed. Changing the digest step invalidates every stored verifier.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Reduce a password of any length to its lowercase hex SHA-256 digest
pub fn normalize_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Hash a plaintext password into a verifier
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(normalize_password(password), cost).context("Failed to hash password")
}

/// Check a plaintext password against a stored verifier.
///
/// Comparison is done by bcrypt's own verify routine.
pub fn verify_password(password: &str, verifier: &str) -> Result<bool> {
    bcrypt::verify(normalize_password(password), verifier).context("Failed to verify password")
}
