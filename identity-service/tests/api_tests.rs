mod common;

use auth::Claims;
use common::TestApp;
use identity_service::user::models::GithubProfile;
use reqwest::StatusCode;
use serde_json::json;

fn register_body() -> serde_json::Value {
    json!({
        "name": "Ana",
        "lastName": "Lopez",
        "email": "ana@x.com",
        "password": "Abcdef1!",
        "confirmPassword": "Abcdef1!"
    })
}

fn octocat_profile() -> GithubProfile {
    GithubProfile {
        id: "42".to_string(),
        email: Some(String::new()),
        name: None,
        login: Some("octocat".to_string()),
    }
}

async fn register_and_login(app: &TestApp) -> String {
    let response = app
        .post("/api/register")
        .json(&register_body())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post("/api/login")
        .json(&json!({
            "email": "ana@x.com",
            "password": "Abcdef1!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/register")
        .json(&register_body())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["name"], "Ana");
    assert_eq!(body["data"]["user"]["lastName"], "Lopez");
    assert_eq!(body["data"]["user"]["email"], "ana@x.com");
    assert!(body["data"]["user"]["id"].is_string());
    assert!(body["data"]["user"]["createdAt"].is_string());

    // The public projection never carries credential fields
    let user = body["data"]["user"].as_object().unwrap();
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("passwordHash"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/register")
        .json(&register_body())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same email, different other fields: still a conflict
    let response = app
        .post("/api/register")
        .json(&json!({
            "name": "Otra",
            "lastName": "Persona",
            "email": "ana@x.com",
            "password": "Distint1!",
            "confirmPassword": "Distint1!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already registered"));
    assert!(body["taskId"].is_string());
    assert!(body["time"].is_string());
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let app = TestApp::spawn().await;

    let mut body = register_body();
    body["password"] = json!("short1!");
    body["confirmPassword"] = json!("short1!");

    let response = app
        .post("/api/register")
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("at least 8 characters"));
}

#[tokio::test]
async fn test_register_mismatched_confirmation_rejected() {
    let app = TestApp::spawn().await;

    let mut body = register_body();
    body["confirmPassword"] = json!("Different1!");

    let response = app
        .post("/api/register")
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Passwords do not match.");
}

#[tokio::test]
async fn test_register_missing_fields_reports_all_errors() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/register")
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("first name"));
    assert!(message.contains("last name"));
    assert!(message.contains("email"));
    assert!(message.contains("password"));
}

#[tokio::test]
async fn test_login_returns_verifiable_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/register")
        .json(&register_body())
        .send()
        .await
        .expect("Failed to execute request");
    let register_response: serde_json::Value =
        response.json().await.expect("Failed to parse response");
    let user_id = register_response["data"]["user"]["id"].as_str().unwrap();

    let response = app
        .post("/api/login")
        .json(&json!({
            "email": "ana@x.com",
            "password": "Abcdef1!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(body["data"]["user"]["email"], "ana@x.com");

    // The token verifies and carries the identity claims
    let claims = app.jwt_handler.decode(token).expect("token did not verify");
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "ana@x.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    app.post("/api/register")
        .json(&register_body())
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/api/login")
        .json(&json!({
            "email": "ana@x.com",
            "password": "Wrongpw1!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login")
        .json(&json!({
            "email": "nobody@x.com",
            "password": "Abcdef1!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_validation_rejects_malformed_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login")
        .json(&json!({
            "email": "not-an-email",
            "password": "Abcdef1!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_me_success() {
    let app = TestApp::spawn().await;
    let token = register_and_login(&app).await;

    let response = app
        .get_authenticated("/api/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["user"]["email"], "ana@x.com");
    assert_eq!(body["data"]["user"]["name"], "Ana");
}

#[tokio::test]
async fn test_get_me_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Missing authentication token");
}

#[tokio::test]
async fn test_get_me_wrong_scheme() {
    let app = TestApp::spawn().await;
    let token = register_and_login(&app).await;

    let response = app
        .get("/api/me")
        .header("Authorization", format!("Basic {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Missing authentication token");
}

#[tokio::test]
async fn test_get_me_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/api/me", "not.a.token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_get_me_expired_token() {
    let app = TestApp::spawn().await;
    let token = register_and_login(&app).await;

    let claims = app.jwt_handler.decode(&token).expect("token did not verify");

    // Re-issue the same claims with the expiry already in the past
    let expired = Claims {
        exp: claims.iat - 1,
        ..claims
    };
    let expired_token = app.jwt_handler.encode(&expired).expect("encode failed");

    let response = app
        .get_authenticated("/api/me", &expired_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_get_me_user_no_longer_exists() {
    let app = TestApp::spawn().await;

    // A validly signed token whose subject was never persisted
    let claims = Claims::for_user(
        uuid::Uuid::new_v4(),
        "ghost@x.com".to_string(),
        1,
    );
    let token = app.jwt_handler.encode(&claims).expect("encode failed");

    let response = app
        .get_authenticated("/api/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_github_login_creates_user_with_synthetic_email() {
    let app = TestApp::spawn().await;
    app.github.set_profile(octocat_profile());

    let response = app
        .post("/api/github")
        .json(&json!({ "code": "auth-code" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    // No public email on the profile: the provider id becomes the local key
    assert_eq!(body["data"]["user"]["email"], "42@github.com");
    assert_eq!(body["data"]["user"]["name"], "octocat");
    assert_eq!(body["data"]["user"]["lastName"], "");

    let token = body["data"]["token"].as_str().unwrap();
    let claims = app.jwt_handler.decode(token).expect("token did not verify");
    assert_eq!(claims.email, "42@github.com");
}

#[tokio::test]
async fn test_github_login_repeat_reuses_account() {
    let app = TestApp::spawn().await;
    app.github.set_profile(octocat_profile());

    let first = app
        .post("/api/github")
        .json(&json!({ "code": "auth-code" }))
        .send()
        .await
        .expect("Failed to execute request");
    let first_body: serde_json::Value = first.json().await.expect("Failed to parse response");
    let first_id = first_body["data"]["user"]["id"].as_str().unwrap().to_string();

    let second = app
        .post("/api/github")
        .json(&json!({ "code": "another-code" }))
        .send()
        .await
        .expect("Failed to execute request");
    let second_body: serde_json::Value = second.json().await.expect("Failed to parse response");

    assert_eq!(second_body["data"]["user"]["id"], first_id.as_str());
}

#[tokio::test]
async fn test_github_login_missing_code() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/github")
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("authorization code"));
}

#[tokio::test]
async fn test_github_login_exchange_failure() {
    let app = TestApp::spawn().await;
    app.github.fail_exchange("bad_verification_code");

    let response = app
        .post("/api/github")
        .json(&json!({ "code": "expired-code" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    // The provider's own description is surfaced
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("bad_verification_code"));
}
