//! HTTP adapter for the assistant port.
//!
//! Posts `{ query, user_id, transactions }` as JSON to a configured endpoint
//! and expects `{ "response": "..." }` back.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use xpensa_types::{AssistantError, AssistantProvider, AssistantQuery};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct AssistantReply {
    response: String,
}

/// Assistant backed by an external HTTP service.
pub struct HttpAssistant {
    client: reqwest::Client,
    url: String,
}

impl HttpAssistant {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AssistantProvider for HttpAssistant {
    #[instrument(skip(self, query), fields(user_id = %query.user_id, transactions = query.transactions.len()))]
    async fn ask(&self, query: &AssistantQuery) -> Result<String, AssistantError> {
        let resp = self
            .client
            .post(&self.url)
            .json(query)
            .send()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let reply: AssistantReply = resp
            .json()
            .await
            .map_err(|e| AssistantError::Upstream(format!("malformed reply: {}", e)))?;
        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use xpensa_types::UserId;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/ask", addr)
    }

    fn query() -> AssistantQuery {
        AssistantQuery {
            query: "How much on food?".into(),
            user_id: UserId::new(),
            transactions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_ask_returns_response_text() {
        let router = Router::new().route(
            "/ask",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({
                    "response": format!("echo: {}", body["query"].as_str().unwrap_or_default())
                }))
            }),
        );
        let assistant = HttpAssistant::new(spawn_upstream(router).await).unwrap();

        let answer = assistant.ask(&query()).await.unwrap();

        assert_eq!(answer, "echo: How much on food?");
    }

    #[tokio::test]
    async fn test_non_success_is_upstream_error() {
        let router = Router::new().route(
            "/ask",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        );
        let assistant = HttpAssistant::new(spawn_upstream(router).await).unwrap();

        let result = assistant.ask(&query()).await;

        assert!(matches!(result, Err(AssistantError::Upstream(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_unreachable_is_unavailable() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let assistant =
            HttpAssistant::with_timeout(format!("http://{}/ask", addr), Duration::from_secs(2))
                .unwrap();

        let result = assistant.ask(&query()).await;

        assert!(matches!(result, Err(AssistantError::Unavailable(_))));
    }
}
