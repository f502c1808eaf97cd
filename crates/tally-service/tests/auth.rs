//! Signup, login, and session integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn signup_grants_the_initial_balance() {
    let harness = TestHarness::new();
    let token = harness.signup("alice").await;

    let response = harness
        .server
        .get("/v1/users/me")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["balance"], 100);
}

#[tokio::test]
async fn signup_duplicate_username_conflicts() {
    let harness = TestHarness::new();
    harness.signup("alice").await;

    let response = harness
        .server
        .post("/v1/auth/signup")
        .json(&json!({ "username": "alice", "password": "another-password" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn signup_requires_credentials() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/auth/signup")
        .json(&json!({ "username": "   ", "password": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Please provide a username and password");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_issues_a_working_token() {
    let harness = TestHarness::new();
    harness.signup("alice").await;

    let response = harness
        .server
        .post("/v1/auth/login")
        .json(&json!({ "username": "alice", "password": "correct-horse" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().unwrap();

    harness
        .server
        .get("/v1/users/me")
        .add_header("authorization", TestHarness::bearer(token))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let harness = TestHarness::new();
    harness.signup("alice").await;

    let wrong_password = harness
        .server
        .post("/v1/auth/login")
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .await;
    wrong_password.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = wrong_password.json();
    assert_eq!(body["error"], "Invalid username or password");

    let unknown_user = harness
        .server
        .post("/v1/auth/login")
        .json(&json!({ "username": "nobody", "password": "wrong" }))
        .await;
    unknown_user.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = unknown_user.json();
    assert_eq!(body["error"], "Invalid username or password");
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let harness = TestHarness::new();

    harness.server.get("/v1/users/me").await.assert_status_unauthorized();
    harness
        .server
        .post("/v1/operations")
        .json(&json!({ "operation": "addition", "operand1": 1, "operand2": 2 }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/v1/users/me")
        .add_header("authorization", "Bearer not-a-jwt")
        .await
        .assert_status_unauthorized();

    harness
        .server
        .get("/v1/users/me")
        .add_header("authorization", "Basic alice:password")
        .await
        .assert_status_unauthorized();
}
