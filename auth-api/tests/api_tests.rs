mod common;

use chrono::Utc;
use common::TestApp;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let (app, store) = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "nicola",
            "email": "nicola@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (app, store) = TestApp::spawn().await;

    app.register("nicola", "pass_word!").await;
    let response = app.register("nicola", "another_password").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_duplicate_username_different_case() {
    let (app, store) = TestApp::spawn().await;

    let first = app.register("Nicola", "pass_word!").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let response = app.register("nICOLA", "pass_word!").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_invalid_username() {
    let (app, store) = TestApp::spawn().await;

    let too_long = "x".repeat(33);
    for username in ["ab", "has space", "semi;colon", too_long.as_str()] {
        let response = app.register(username, "pass_word!").await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username {:?} should be rejected",
            username
        );
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let (app, _store) = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "nicola",
            "email": "not-an-email",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_password_too_short() {
    let (app, store) = TestApp::spawn().await;

    let response = app.register("nicola", "short").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_register_missing_field() {
    let (app, _store) = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "nicola",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_login_success() {
    let (app, _store) = TestApp::spawn().await;

    app.register("nicola", "pass_word!").await;
    let response = app.login("nicola", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["token"].as_str().expect("token is a string");
    assert!(body["data"]["expiration"].is_string());

    let identity = app
        .token_validator
        .validate(token, Utc::now())
        .expect("Issued token should validate");
    assert_eq!(identity.username, "nicola");
    assert!(!identity.token_id.is_empty());
    assert!(identity.expires_at > Utc::now());
    assert!(identity.expires_at <= Utc::now() + chrono::Duration::hours(3));
}

#[tokio::test]
async fn test_login_case_insensitive_keeps_registered_spelling() {
    let (app, _store) = TestApp::spawn().await;

    app.register("Nicola", "pass_word!").await;
    let response = app.login("NICOLA", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let identity = app
        .token_validator
        .validate(body["data"]["token"].as_str().unwrap(), Utc::now())
        .unwrap();
    assert_eq!(identity.username, "Nicola");
}

#[tokio::test]
async fn test_login_issues_distinct_token_ids() {
    let (app, _store) = TestApp::spawn().await;

    let first = app.register_and_login("nicola", "pass_word!").await;
    let second = app.register_and_login("nicola", "pass_word!").await;

    let first = app.token_validator.validate(&first, Utc::now()).unwrap();
    let second = app.token_validator.validate(&second, Utc::now()).unwrap();
    assert_ne!(first.token_id, second.token_id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (app, _store) = TestApp::spawn().await;

    app.register("nicola", "pass_word!").await;

    let wrong_password = app.login("nicola", "wrong_password").await;
    let unknown_user = app.login("nobody", "pass_word!").await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_user: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(
        wrong_password["data"]["message"],
        "Username or password wrong"
    );
}

#[tokio::test]
async fn test_login_with_malformed_username_is_invalid_credentials() {
    let (app, _store) = TestApp::spawn().await;

    let response = app.login("not a username!", "pass_word!").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, _store) = TestApp::spawn().await;

    let token = app.register_and_login("nicola", "pass_word!").await;

    let response = app
        .get_authenticated("/api/test", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(
        body["data"]["message"],
        "Hello, nicola! You are authenticated."
    );

    let identity = app.token_validator.validate(&token, Utc::now()).unwrap();
    assert_eq!(body["data"]["token_id"], identity.token_id.as_str());
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _store) = TestApp::spawn().await;

    let response = app
        .get("/api/test")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_tampered_token() {
    let (app, _store) = TestApp::spawn().await;

    let token = app.register_and_login("nicola", "pass_word!").await;
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[2] = parts[2].chars().rev().collect();
    let tampered = parts.join(".");

    let response = app
        .get_authenticated("/api/test", &tampered)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get_authenticated("/api/test", "invalid.token.here")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_registration_same_username() {
    let (app, store) = TestApp::spawn().await;
    let attempts = 8;

    let responses = join_all((0..attempts).map(|_| app.register("nicola", "pass_word!"))).await;

    let created = responses
        .iter()
        .filter(|r| r.status() == StatusCode::CREATED)
        .count();
    let conflicts = responses
        .iter()
        .filter(|r| r.status() == StatusCode::CONFLICT)
        .count();

    assert_eq!(created, 1);
    assert_eq!(conflicts, attempts - 1);
    assert_eq!(store.len().await, 1);
}
