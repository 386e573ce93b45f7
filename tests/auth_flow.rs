//! Integration tests for the login → calculate flow
//!
//! These drive the full router in-process (no socket) the same way an HTTP
//! client would: form-encoded login, then bearer-authenticated calculate.

use authgate::{
    auth::{parse_claims_unverified, CredentialAuthority, CredentialStore, JwtHandler},
    server::build_router,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

fn authority() -> Arc<CredentialAuthority> {
    let mut store = CredentialStore::new(4).expect("store");
    store
        .register_seed_identity("vinod", "password123")
        .expect("seed identity");
    Arc::new(CredentialAuthority::new(
        Arc::new(store),
        JwtHandler::new(SECRET),
    ))
}

fn app() -> Router {
    build_router(authority())
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let body = format!("username={}&password={}", username, password);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    split(response).await
}

async fn calculate(app: &Router, query: &str, auth: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(format!("/calculate?{}", query));
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    split(response).await
}

async fn split(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_login_then_calculate() {
    let app = app();

    let (status, body) = login(&app, "vinod", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().expect("access_token").to_string();

    let claims = parse_claims_unverified(&token).unwrap();
    assert_eq!(claims.sub, "vinod");
    let lifetime = claims.exp - Utc::now().timestamp();
    assert!(lifetime > 29 * 60 && lifetime <= 30 * 60, "lifetime {}s", lifetime);

    let (status, body) = calculate(&app, "a=5&b=10", Some(&format!("Bearer {}", token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 15);
    assert_eq!(body["user"], "vinod");
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = app();

    let (wrong_status, wrong_body) = login(&app, "vinod", "password124").await;
    let (unknown_status, unknown_body) = login(&app, "nobody", "password123").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let authority = authority();
    let app = build_router(authority.clone());

    let expired = authority
        .authenticate_at("vinod", "password123", Utc::now() - Duration::minutes(45))
        .unwrap();

    let (status, body) = calculate(&app, "a=5&b=10", Some(&format!("Bearer {}", expired.token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid token");
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let app = app();
    let forged = JwtHandler::new(b"attacker-secret")
        .generate_token_at("vinod", Utc::now())
        .unwrap();

    let (status, _) = calculate(&app, "a=1&b=1", Some(&format!("Bearer {}", forged.token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shared_secret_instances_accept_each_others_tokens() {
    let issuer = app();
    let other = app();

    let (_, body) = login(&issuer, "vinod", "password123").await;
    let token = body["access_token"].as_str().unwrap();

    let (status, body) = calculate(&other, "a=3&b=4", Some(&format!("Bearer {}", token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 7);
}

#[tokio::test]
async fn test_missing_or_malformed_authorization() {
    let app = app();

    for auth in [None, Some("Bearer"), Some("Basic dmlub2Q6cGFzc3dvcmQxMjM="), Some("Bearer not.a.jwt")] {
        let (status, _) = calculate(&app, "a=1&b=2", auth).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "auth header {:?}", auth);
    }
}

#[tokio::test]
async fn test_bad_operands_rejected_after_auth() {
    let app = app();
    let (_, body) = login(&app, "vinod", "password123").await;
    let bearer = format!("Bearer {}", body["access_token"].as_str().unwrap());

    let (status, _) = calculate(&app, "a=5", Some(&bearer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = calculate(&app, "a=five&b=10", Some(&bearer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = calculate(&app, &format!("a={}&b=1", i64::MAX), Some(&bearer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("64-bit"));

    let (status, body) = calculate(&app, "a=-7&b=2", Some(&bearer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], -5);
}
