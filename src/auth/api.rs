//! Authentication API Endpoints
//! Mission: Provide the login endpoint

use crate::auth::{
    authority::CredentialAuthority,
    error::AuthError,
    models::{LoginForm, LoginResponse},
};
use axum::{extract::State, Form, Json};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Login endpoint - POST /login
///
/// bcrypt is deliberately slow, so the check runs on the blocking pool.
pub async fn login(
    State(authority): State<Arc<CredentialAuthority>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, AuthError> {
    debug!("🔐 Login attempt: {}", form.username);

    let username = form.username.clone();
    let issued = tokio::task::spawn_blocking(move || {
        authority.authenticate(&form.username, &form.password)
    })
    .await
    .map_err(|e| {
        error!("Login task failed: {}", e);
        AuthError::Internal
    })??;

    info!("✅ Login successful: {} (subject: {})", username, issued.claims.sub);

    Ok(Json(LoginResponse::bearer(issued.token)))
}
