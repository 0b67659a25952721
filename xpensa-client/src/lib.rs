//! # Xpensa Client SDK
//!
//! A typed Rust client for the Xpensa API.

use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};

use xpensa_types::{
    AddBudgetsRequest, AnalyticsResponse, AssistantRequest, AssistantResponse, AuthResponse,
    Budget, CreateTransactionRequest, Goal, HealthReport, LoginRequest, RangeSummary,
    SignupRequest, TotalSpentRequest, Transaction, TransactionId, TransactionQuery,
    UpdateProfileRequest, UpsertGoalsRequest, UserProfile,
    analytics::{BudgetStatus, GoalStatus},
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Xpensa API client.
///
/// Signup and login store the returned token on the client; every other call
/// sends it as a bearer token.
pub struct XpensaClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl XpensaClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
        }
    }

    /// Sets the session token for authentication.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers and keeps the returned token.
    pub async fn signup(
        &mut self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let req = SignupRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.send(Method::POST, "/api/auth/signup", Some(&req)).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Logs in and keeps the returned token.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.send(Method::POST, "/api/auth/login", Some(&req)).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Revokes the current token and forgets it.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.send_empty(Method::POST, "/api/auth/logout").await?;
        self.token = None;
        Ok(())
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.send(Method::GET, "/api/auth/me", None::<&()>).await
    }

    pub async fn update_profile(&self, profile_pic: &str) -> Result<UserProfile, ClientError> {
        let req = UpdateProfileRequest {
            profile_pic: profile_pic.to_string(),
        };
        self.send(Method::PUT, "/api/auth/profile", Some(&req)).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Records a transaction. `date` defaults to now on the server.
    pub async fn add_transaction(
        &self,
        amount: f64,
        category: &str,
        date: Option<String>,
    ) -> Result<Transaction, ClientError> {
        let req = CreateTransactionRequest {
            amount,
            category: category.to_string(),
            date,
        };
        self.send(Method::POST, "/api/transactions", Some(&req)).await
    }

    /// Lists transactions with optional filters.
    pub async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, ClientError> {
        let resp = self
            .authorized(self.http.get(self.url("/api/transactions")))
            .query(query)
            .send()
            .await?;
        handle_response(resp).await
    }

    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &format!("/api/transactions/{}", id))
            .await
    }

    /// Total spending between two `YYYY-MM-DD` days, both inclusive.
    pub async fn total_spent(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<String>,
    ) -> Result<RangeSummary, ClientError> {
        let req = TotalSpentRequest {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            category,
        };
        self.send(Method::POST, "/api/transactions/total-spent", Some(&req))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Budgets & Goals
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn add_budgets(&self, budgets: Vec<Budget>) -> Result<Vec<Budget>, ClientError> {
        let req = AddBudgetsRequest { budgets };
        self.send(Method::POST, "/api/budgets", Some(&req)).await
    }

    pub async fn budgets(&self) -> Result<Vec<Budget>, ClientError> {
        self.send(Method::GET, "/api/budgets", None::<&()>).await
    }

    pub async fn budget_status(&self) -> Result<Vec<BudgetStatus>, ClientError> {
        self.send(Method::GET, "/api/budgets/status", None::<&()>).await
    }

    pub async fn upsert_goals(&self, goals: Vec<Goal>) -> Result<Vec<Goal>, ClientError> {
        let req = UpsertGoalsRequest { goals };
        self.send(Method::POST, "/api/goals", Some(&req)).await
    }

    pub async fn goals(&self) -> Result<Vec<Goal>, ClientError> {
        self.send(Method::GET, "/api/goals", None::<&()>).await
    }

    pub async fn goal_status(&self) -> Result<Vec<GoalStatus>, ClientError> {
        self.send(Method::GET, "/api/goals/status", None::<&()>).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Analytics & Assistant
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn analytics(&self) -> Result<AnalyticsResponse, ClientError> {
        self.send(Method::GET, "/api/analytics", None::<&()>).await
    }

    pub async fn health_report(&self) -> Result<HealthReport, ClientError> {
        self.send(Method::GET, "/api/profile/health", None::<&()>).await
    }

    pub async fn ask(&self, query: &str) -> Result<AssistantResponse, ClientError> {
        let req = AssistantRequest {
            query: query.to_string(),
        };
        self.send(Method::POST, "/api/assistant/query", Some(&req)).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Plumbing
    // ─────────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let mut req = self.authorized(self.http.request(method, self.url(path)));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        handle_response(resp).await
    }

    /// Sends a request whose success response has no body.
    async fn send_empty(&self, method: Method, path: &str) -> Result<(), ClientError> {
        let resp = self
            .authorized(self.http.request(method, self.url(path)))
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(api_error(status, resp).await)
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        Err(api_error(status, resp).await)
    }
}

/// Builds an API error, preferring the `error` field of a JSON body.
async fn api_error(status: reqwest::StatusCode, resp: reqwest::Response) -> ClientError {
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body);
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
