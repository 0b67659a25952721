//! End-to-end tests of the HTTP API over the in-memory and SQLite repositories.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use xpensa_hex::{FinanceService, inbound::HttpServer};
use xpensa_repo::build_repo;

async fn app() -> Router {
    let repo = build_repo("memory://").await.unwrap();
    HttpServer::new(FinanceService::new(repo)).router()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn signup(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "full_name": "Asha Rao", "email": email, "password": "s3cret!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn add_tx(app: &Router, token: &str, amount: f64, category: &str, date: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/transactions",
        Some(token),
        Some(json!({ "amount": amount, "category": category, "date": date })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_signup_add_and_analytics() {
    let app = app().await;
    let token = signup(&app, "asha@example.com").await;

    add_tx(&app, &token, 100.0, "Food", "2024-01-05T08:00").await;
    add_tx(&app, &token, 50.0, "Food", "2024-01-10T20:00").await;
    add_tx(&app, &token, 200.0, "Rent", "2024-02-01T09:00").await;

    let (status, body) = send(&app, Method::GET, "/api/analytics", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let bundle = &body["bundle"];
    assert_eq!(bundle["total_spent"], 350.0);
    assert_eq!(bundle["categories"][0]["name"], "Rent");
    assert_eq!(bundle["categories"][1]["total"], 150.0);
    assert_eq!(bundle["months"].as_array().unwrap().len(), 2);
    assert_eq!(bundle["months"][0]["label"], "Jan '24");
    assert_eq!(bundle["weekdays"].as_array().unwrap().len(), 7);
    assert_eq!(bundle["time_of_day"].as_array().unwrap().len(), 4);
    assert_eq!(bundle["largest_transaction"]["amount"], 200.0);
    assert_eq!(body["insights"]["transaction_count"], 3);
}

#[tokio::test]
async fn test_empty_analytics() {
    let app = app().await;
    let token = signup(&app, "asha@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/analytics", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bundle"]["total_spent"], 0.0);
    assert!(body["bundle"]["largest_transaction"].is_null());
    assert!(body["insights"]["average_per_month"].is_null());
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/analytics", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, _) = send(&app, Method::GET, "/api/auth/me", Some("xp_bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/analytics"].is_object());
}

#[tokio::test]
async fn test_duplicate_signup_and_bad_login() {
    let app = app().await;
    signup(&app, "asha@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "full_name": "Other", "email": "ASHA@example.com", "password": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "asha@example.com", "password": "wrong!!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = app().await;
    let token = signup(&app, "asha@example.com").await;

    let (status, _) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_transaction_is_bad_request() {
    let app = app().await;
    let token = signup(&app, "asha@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&token),
        Some(json!({ "amount": 10.0, "category": "Food", "date": "05/01/2024" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_list_filter_and_delete() {
    let app = app().await;
    let asha = signup(&app, "asha@example.com").await;
    let ravi = signup(&app, "ravi@example.com").await;

    let food = add_tx(&app, &asha, 10.0, "Food", "2024-01-01").await;
    add_tx(&app, &asha, 90.0, "Rent", "2024-01-02").await;

    let (_, listed) = send(
        &app,
        Method::GET,
        "/api/transactions?sort=lowest&search=fo",
        Some(&asha),
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], food["id"]);

    let uri = format!("/api/transactions/{}", food["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&ravi), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&asha), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, Method::GET, "/api/transactions", Some(&asha), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_total_spent_endpoint() {
    let app = app().await;
    let token = signup(&app, "asha@example.com").await;
    add_tx(&app, &token, 10.0, "Food", "2024-01-01T00:00").await;
    add_tx(&app, &token, 20.0, "Fuel", "2024-01-31T23:59").await;
    add_tx(&app, &token, 40.0, "Food", "2024-02-01").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions/total-spent",
        Some(&token),
        Some(json!({ "start_date": "2024-01-01", "end_date": "2024-01-31", "category": "Food" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_spent"], 10.0);
    assert_eq!(body["transaction_count"], 1);
}

#[tokio::test]
async fn test_budgets_goals_and_health() {
    let app = app().await;
    let token = signup(&app, "asha@example.com").await;
    add_tx(&app, &token, 100.0, "Food", "2024-01-01").await;

    let (status, budgets) = send(
        &app,
        Method::POST,
        "/api/budgets",
        Some(&token),
        Some(json!({ "budgets": [{ "category": "Food", "limit": 200.0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budgets.as_array().unwrap().len(), 1);

    let (status, goals) = send(
        &app,
        Method::POST,
        "/api/goals",
        Some(&token),
        Some(json!({ "goals": [{ "title": "Trip", "target": 1000.0, "current": 250.0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goals[0]["complete"], false);

    let (_, status_list) =
        send(&app, Method::GET, "/api/budgets/status", Some(&token), None).await;
    assert_eq!(status_list[0]["percent_used"], 50);

    let (status, report) =
        send(&app, Method::GET, "/api/profile/health", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["score"], 40);
}

#[tokio::test]
async fn test_assistant_without_backend_is_unavailable() {
    let app = app().await;
    let token = signup(&app, "asha@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assistant/query",
        Some(&token),
        Some(json!({ "query": "How am I doing?" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_backed_flow() {
    let repo = build_repo("sqlite::memory:").await.unwrap();
    let app = HttpServer::new(FinanceService::new(repo)).router();
    let token = signup(&app, "asha@example.com").await;

    add_tx(&app, &token, 42.5, "Books", "2023-12-31T22:30").await;
    add_tx(&app, &token, 7.5, "Coffee", "2024-01-01T07:15").await;

    let (status, body) = send(&app, Method::GET, "/api/analytics", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bundle"]["total_spent"], 50.0);
    assert_eq!(body["bundle"]["months"][0]["label"], "Dec '23");
    assert_eq!(body["bundle"]["months"][1]["label"], "Jan '24");
}
