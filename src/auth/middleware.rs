//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::auth::{authority::CredentialAuthority, error::AuthError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Auth middleware that validates bearer tokens.
///
/// On success the caller's `Identity` is stored in the request extensions for
/// handlers to pick up with `Extension<Identity>`.
pub async fn auth_middleware(
    State(authority): State<Arc<CredentialAuthority>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let identity = authority.validate(token)?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively, as RFC 6750 allows.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}
