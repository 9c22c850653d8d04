//! HTTP-level integration tests for signup, login, profile and logout.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, get_auth, post_json, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;
use vlab_core::roles::ROLE_USER;

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_creates_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "name": "Ada", "email": "Ada@Example.com", "password": "longenough" });

    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User registered successfully");
    assert_eq!(json["data"]["email"], "ada@example.com");
    assert_eq!(json["data"]["role"], "user");
    assert_eq!(json["data"]["provider"], "local");
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_signup_is_conflict(pool: PgPool) {
    common::create_user(&pool, "taken@example.com", ROLE_USER).await;
    let app = common::build_test_app(pool);
    let body = json!({ "name": "Other", "email": "TAKEN@example.com", "password": "longenough" });

    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_short_password_and_bad_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/signup",
        json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "name": "Ada", "email": "not-an-email", "password": "longenough" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_token_and_user(pool: PgPool) {
    let user = common::create_user(&pool, "learner@example.com", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let response = login(app, "Learner@Example.com", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    common::create_user(&pool, "learner@example.com", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let response = login(app.clone(), "learner@example.com", "wrong password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(app, "nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

// ---------------------------------------------------------------------------
// Session endpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_returns_profile(pool: PgPool) {
    common::create_user(&pool, "learner@example.com", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let token = body_json(login(app.clone(), "learner@example.com", TEST_PASSWORD).await).await
        ["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get_auth(app, "/api/v1/auth/login/success", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "learner@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn session_endpoints_require_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/login/success").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/auth/login/success", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = common::send(app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_with_token_is_no_content(pool: PgPool) {
    let user = common::create_user(&pool, "learner@example.com", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/logout")
        .header("authorization", format!("Bearer {}", common::token_for(&user)))
        .body(Body::empty())
        .unwrap();
    let response = common::send(app, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
