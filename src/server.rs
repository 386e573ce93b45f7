//! HTTP server wiring
//! Mission: Bootstrap the credential authority and expose login, calculate and health routes

use crate::{
    api,
    auth::{api as auth_api, auth_middleware, CredentialAuthority, CredentialStore, JwtHandler},
    config::Config,
    middleware::request_logging,
};
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Build the credential store and authority from configuration.
///
/// This is the only place seed identities are hashed; it runs once at startup.
pub fn bootstrap(config: &Config) -> Result<Arc<CredentialAuthority>> {
    if config.uses_dev_secret() {
        warn!("⚠️  Using the built-in development JWT secret. SET JWT_SECRET IN PRODUCTION!");
    } else if config.secret_too_short() {
        warn!("⚠️  JWT secret is shorter than 32 bytes");
    }

    let mut store = CredentialStore::new(config.bcrypt_cost)?;
    store
        .register_seed_identity_as(
            &config.seed_username,
            config.seed_subject(),
            &config.seed_password,
        )
        .context("Failed to register seed identity")?;

    let ttl = chrono::Duration::try_minutes(config.token_ttl_minutes)
        .filter(|ttl| *ttl > chrono::Duration::zero())
        .context("Token lifetime out of range")?;
    let jwt = JwtHandler::with_ttl(config.jwt_secret.as_bytes(), ttl);

    info!(
        "🔐 Credential authority ready ({} identities, {}m token lifetime)",
        store.len(),
        jwt.ttl().num_minutes()
    );

    Ok(Arc::new(CredentialAuthority::new(Arc::new(store), jwt)))
}

/// Assemble the application router around an authority
pub fn build_router(authority: Arc<CredentialAuthority>) -> Router {
    let protected_routes = Router::new()
        .route("/calculate", get(api::calculate))
        .route_layer(middleware::from_fn_with_state(
            authority.clone(),
            auth_middleware,
        ));

    let auth_router = Router::new()
        .route("/login", post(auth_api::login))
        .with_state(authority);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Bind, serve until Ctrl-C, then drain in-flight requests
pub async fn run(config: Config) -> Result<()> {
    let authority = bootstrap(&config)?;
    let app = build_router(authority);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("🎯 API server listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
