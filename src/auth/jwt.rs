//! JWT Token Handler
//! Mission: Generate and validate JWT tokens securely

use crate::auth::models::{AccessToken, Claims};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Default token lifetime
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key and the default 30 minute lifetime
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is compared against the caller's clock in validate_token_at
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a JWT token for a subject, expiring `ttl` after `now`
    pub fn generate_token_at(&self, subject: &str, now: DateTime<Utc>) -> Result<AccessToken> {
        let exp = now
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?
            .timestamp();

        let claims = Claims {
            sub: subject.to_string(),
            exp,
        };

        debug!(
            "Generating JWT for {}, expires in {}m",
            subject,
            self.ttl.num_minutes()
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")?;

        Ok(AccessToken { token, claims })
    }

    /// Validate a JWT token as of `now` and extract claims.
    ///
    /// Accepted iff the HS256 signature verifies and `now < exp`.
    ///
    /// `exp` has one-second resolution: it is the issue time truncated to the
    /// whole second plus the TTL, so a token issued at 12:00:00.900 with a 30
    /// minute TTL stops being accepted at 12:30:00.000, up to a second before
    /// the full TTL has elapsed.
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .context("Invalid token")?;

        if now.timestamp() >= decoded.claims.exp {
            bail!("Token expired at {}", decoded.claims.exp);
        }

        debug!("Validated JWT for {}", decoded.claims.sub);

        Ok(decoded.claims)
    }
}

/// Decode claims WITHOUT checking signature or expiry.
///
/// For display only (e.g. showing a user when their token runs out). Never
/// use the result to make an authorization decision.
pub fn parse_claims_unverified(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let decoded = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .context("Malformed token")?;

    Ok(decoded.claims)
}
