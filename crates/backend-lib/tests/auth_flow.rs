// ==========================
// crates/backend-lib/tests/auth_flow.rs
// ==========================
//! End-to-end tests for registration, login, and the identity/policy
//! pipeline, driving the full router.
use std::time::{Duration, SystemTime};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use backend_lib::auth::TokenService;
use backend_lib::config::Settings;
use backend_lib::router::create_router;
use backend_lib::AppState;

const SECRET: &str = "integration-test-secret";
const PASSWORD: &str = "Str0ng-enough!";

fn test_state() -> AppState {
    let settings = Settings {
        token_secret: SECRET.to_string(),
        token_ttl_secs: 3600,
        ..Settings::default()
    };
    AppState::new(settings)
}

fn test_app() -> (Router, AppState) {
    let state = test_state();
    (create_router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };

    (status, value)
}

async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await
}

#[tokio::test]
async fn test_register_then_login_same_identity() {
    let (app, _) = test_app();

    let (status, body) = register(&app, "alice@x.com", PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "alice@x.com");
    assert_eq!(body["username"], "alice@x.com");
    assert!(body["token"].as_str().unwrap().split('.').count() == 3);
    let registered_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = login(&app, "alice@x.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().unwrap(), registered_id);
}

#[tokio::test]
async fn test_duplicate_register_matches_failed_login() {
    let (app, _) = test_app();
    register(&app, "alice@x.com", PASSWORD).await;

    let (dup_status, dup_body) = register(&app, "alice@x.com", "Other-passw0rd!").await;
    let (bad_status, bad_body) = login(&app, "alice@x.com", "Wrong-passw0rd!").await;
    let (unknown_status, unknown_body) = login(&app, "nobody@x.com", PASSWORD).await;

    // all three are the same observable outcome
    assert_eq!(dup_status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(dup_body, bad_body);
    assert_eq!(bad_body, unknown_body);
}

#[tokio::test]
async fn test_malformed_register_input_rejected() {
    let (app, _) = test_app();

    let (status, _) = register(&app, "not-an-email", PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "alice@x.com", "weak").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_routes_without_token() {
    let (app, _) = test_app();

    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/v1/books", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_without_token() {
    let (app, _) = test_app();

    let (status, _) = send(&app, "GET", "/api/v1/private/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/ratings",
        None,
        Some(json!({"book_id": "00000000-0000-0000-0000-000000000000", "value": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, _) = test_app();
    let (_, body) = register(&app, "alice@x.com", PASSWORD).await;
    let token = body["token"].as_str().unwrap();

    let (status, profile) =
        send(&app, "GET", "/api/v1/private/user", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "alice@x.com");
    assert_eq!(profile["role"], "USER");
    assert_eq!(profile["is_from_dataset"], false);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized_not_a_crash() {
    let (app, _) = test_app();
    let (_, body) = register(&app, "alice@x.com", PASSWORD).await;
    let user_id = body["id"].as_str().unwrap().parse().unwrap();

    // same secret, but issued two TTLs in the past
    let tokens = TokenService::new(SECRET, Duration::from_secs(3600));
    let issued_at = SystemTime::now() - Duration::from_secs(7200);
    let expired = tokens.issue_at(user_id, issued_at).unwrap();

    let (status, _) =
        send(&app, "GET", "/api/v1/private/user", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_behaves_like_no_token() {
    let (app, _) = test_app();

    let (status, _) =
        send(&app, "GET", "/api/v1/private/user", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // a bad token does not break public routes
    let (status, _) = send(&app, "GET", "/api/v1/books", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_from_other_key_rejected() {
    let (app, _) = test_app();
    let (_, body) = register(&app, "alice@x.com", PASSWORD).await;
    let user_id = body["id"].as_str().unwrap().parse().unwrap();

    let other = TokenService::new("a-different-secret", Duration::from_secs(3600));
    let forged = other.issue(user_id).unwrap();

    let (status, _) =
        send(&app, "GET", "/api/v1/private/user", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_lockout_after_repeated_failures() {
    let settings = Settings {
        token_secret: SECRET.to_string(),
        auth_rate_limit: backend_lib::config::AuthRateLimitSettings {
            max_attempts: 2,
            lockout_secs: 60,
        },
        ..Settings::default()
    };
    let app = create_router(AppState::new(settings));

    register(&app, "alice@x.com", PASSWORD).await;

    for _ in 0..2 {
        let (status, _) = login(&app, "alice@x.com", "Wrong-passw0rd!").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = login(&app, "alice@x.com", PASSWORD).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}
