//! Integration tests for rate limiting middleware.
//!
//! These tests verify the HTTP-level behavior of rate limiting,
//! including 429 responses and proper integration with the middleware stack.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use xpensa_hex::{FinanceService, inbound::HttpServer};
use xpensa_repo::MemoryRepo;

/// Helper to create a test server with a very low rate limit.
fn create_test_server(requests_per_minute: u32) -> HttpServer<MemoryRepo> {
    let service = FinanceService::new(MemoryRepo::new());
    HttpServer::with_rate_limit(service, requests_per_minute)
}

fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

fn signup_request(email: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/signup")
        .header("Content-Type", "application/json")
        .body(Body::from(format!(
            r#"{{"full_name": "Test User", "email": "{}", "password": "s3cret!"}}"#,
            email
        )))
        .unwrap()
}

/// Helper to make an authenticated API request.
fn api_request(token: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/transactions")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Signs up (on the anonymous quota) and returns the session token.
async fn signup_token(app: axum::Router, email: &str) -> String {
    let response = app.oneshot(signup_request(email)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    let server = create_test_server(3);
    let app = server.router();

    let token = signup_token(app.clone(), "a@example.com").await;

    for i in 1..=3 {
        let response = app.clone().oneshot(api_request(&token)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Request {} should not be rate limited (quota not yet exceeded)",
            i
        );
    }

    let response = app.clone().oneshot(api_request(&token)).await.unwrap();
    assert_eq!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Request should be rate limited after exceeding quota"
    );
    assert_eq!(response.headers().get("retry-after").unwrap(), "60");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Rate limit exceeded")
    );
    assert_eq!(json["retry_after_seconds"], 60);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    let server = create_test_server(1);
    let app = server.router();

    for _ in 0..10 {
        let response = app.clone().oneshot(health_request()).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Health endpoint should not be rate limited"
        );
    }
}

#[tokio::test]
async fn test_rate_limiting_per_token_isolation() {
    let server = create_test_server(3);
    let app = server.router();

    // Two signups use two of the three anonymous requests.
    let token_a = signup_token(app.clone(), "a@example.com").await;
    let token_b = signup_token(app.clone(), "b@example.com").await;

    for _ in 0..3 {
        let response = app.clone().oneshot(api_request(&token_a)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(api_request(&token_a)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let response = app.clone().oneshot(api_request(&token_b)).await.unwrap();
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Token B should have its own quota"
    );
}

#[tokio::test]
async fn test_anonymous_requests_share_a_quota() {
    let server = create_test_server(1);
    let app = server.router();

    let first = app
        .clone()
        .oneshot(signup_request("a@example.com"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .clone()
        .oneshot(signup_request("b@example.com"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let content_type = second.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));
}
