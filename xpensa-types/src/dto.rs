//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::analytics::{AggregateBundle, BudgetStatus, GoalStatus, SpendingInsights};
use crate::domain::{Budget, Goal, Transaction, User, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Auth DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "Asha Rao")]
    pub full_name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// At least 6 characters
    #[schema(example = "s3cret!")]
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "asha@example.com")]
    pub email: String,
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            profile_pic: user.profile_pic.clone(),
            created_at: user.created_at,
        }
    }
}

/// Response after signup or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    /// Bearer token (shown only once)
    #[schema(example = "xp_4f9c...")]
    pub token: String,
}

/// Request to change the profile picture.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "https://example.com/me.png")]
    pub profile_pic: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to record a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    #[schema(example = 250.0)]
    pub amount: f64,
    #[schema(example = "Food")]
    pub category: String,
    /// Defaults to now. `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` or RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-01-05T08:00")]
    pub date: Option<String>,
}

/// Ordering for transaction listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSort {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
}

/// Filters for listing transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    /// Exact category match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Case-insensitive substring of the category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<TransactionSort>,
}

impl TransactionQuery {
    /// Filters and orders `transactions`.
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut out: Vec<Transaction> = transactions
            .into_iter()
            .filter(|tx| self.category.as_deref().is_none_or(|c| tx.category == c))
            .filter(|tx| {
                search
                    .as_deref()
                    .is_none_or(|s| tx.category.to_lowercase().contains(s))
            })
            .collect();

        match self.sort.unwrap_or_default() {
            TransactionSort::Newest => out.sort_by(|a, b| b.date.cmp(&a.date)),
            TransactionSort::Oldest => out.sort_by(|a, b| a.date.cmp(&b.date)),
            TransactionSort::Highest => out.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
            TransactionSort::Lowest => out.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        }
        out
    }
}

/// Request for total spending in a date range.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TotalSpentRequest {
    /// `YYYY-MM-DD`, inclusive
    #[schema(example = "2024-01-01")]
    pub start_date: String,
    /// `YYYY-MM-DD`, inclusive
    #[schema(example = "2024-01-31")]
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Budget & goal DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to append budgets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddBudgetsRequest {
    pub budgets: Vec<Budget>,
}

/// Request to insert or replace goals by title.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpsertGoalsRequest {
    pub goals: Vec<Goal>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Analytics DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Dashboard analytics for the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsResponse {
    pub bundle: AggregateBundle,
    pub insights: SpendingInsights,
}

/// Financial health report for the profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    #[schema(example = 72)]
    pub score: u32,
    pub budgets: Vec<BudgetStatus>,
    pub goals: Vec<GoalStatus>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistant DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A natural-language question about the user's spending.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssistantRequest {
    #[schema(example = "How much did I spend on food last month?")]
    pub query: String,
}

/// The assistant's answer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssistantResponse {
    pub response: String,
}
