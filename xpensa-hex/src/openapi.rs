//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use xpensa_types::analytics::{
    BudgetStatus, CategoryBucket, GoalStatus, MonthBucket, SpendingInsights, TimeOfDay,
    TimeOfDayBucket, WeekdayBucket,
};
use xpensa_types::{
    AddBudgetsRequest, AggregateBundle, AnalyticsResponse, AssistantRequest, AssistantResponse,
    AuthResponse, Budget, CreateTransactionRequest, Goal, HealthReport, LoginRequest,
    RangeSummary, SignupRequest, TotalSpentRequest, Transaction, TransactionId, TransactionQuery,
    TransactionSort, UpdateProfileRequest, UpsertGoalsRequest, UserId, UserProfile,
};

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered; token returned once", body = AuthResponse),
        (status = 400, description = "Invalid name, email or password"),
        (status = 409, description = "Email already registered")
    )
)]
async fn signup() {}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token returned once", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
async fn login() {}

/// Revoke the presented token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn logout() {}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
async fn me() {}

/// Update the profile picture
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "auth",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
async fn update_profile() {}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

/// Record a transaction
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Transaction recorded", body = Transaction),
        (status = 400, description = "Invalid amount, category or date"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn add_transaction() {}

/// List own transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "transactions",
    params(TransactionQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transactions, newest first unless sorted otherwise", body = Vec<Transaction>),
        (status = 401, description = "Unauthorized")
    )
)]
async fn list_transactions() {}

/// Delete one of your transactions
#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Transaction ID (UUID)")
    ),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn delete_transaction() {}

/// Total spending between two days (inclusive)
#[utoipa::path(
    post,
    path = "/api/transactions/total-spent",
    tag = "transactions",
    request_body = TotalSpentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Range summary", body = RangeSummary),
        (status = 400, description = "Invalid dates or start after end"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn total_spent() {}

// ─────────────────────────────────────────────────────────────────────────────
// Budgets & goals
// ─────────────────────────────────────────────────────────────────────────────

/// Append budgets
#[utoipa::path(
    post,
    path = "/api/budgets",
    tag = "planning",
    request_body = AddBudgetsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All budgets", body = Vec<Budget>),
        (status = 400, description = "Invalid budget"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn add_budgets() {}

/// List budgets
#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "planning",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All budgets", body = Vec<Budget>),
        (status = 401, description = "Unauthorized")
    )
)]
async fn list_budgets() {}

/// Spending against each budget
#[utoipa::path(
    get,
    path = "/api/budgets/status",
    tag = "planning",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Budget status", body = Vec<BudgetStatus>),
        (status = 401, description = "Unauthorized")
    )
)]
async fn budget_status() {}

/// Insert or replace goals by title
#[utoipa::path(
    post,
    path = "/api/goals",
    tag = "planning",
    request_body = UpsertGoalsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All goals", body = Vec<Goal>),
        (status = 400, description = "Invalid goal"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn upsert_goals() {}

/// List goals
#[utoipa::path(
    get,
    path = "/api/goals",
    tag = "planning",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All goals", body = Vec<Goal>),
        (status = 401, description = "Unauthorized")
    )
)]
async fn list_goals() {}

/// Progress on each goal
#[utoipa::path(
    get,
    path = "/api/goals/status",
    tag = "planning",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Goal status", body = Vec<GoalStatus>),
        (status = 401, description = "Unauthorized")
    )
)]
async fn goal_status() {}

// ─────────────────────────────────────────────────────────────────────────────
// Analytics & assistant
// ─────────────────────────────────────────────────────────────────────────────

/// Dashboard analytics
#[utoipa::path(
    get,
    path = "/api/analytics",
    tag = "analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregates and insights", body = AnalyticsResponse),
        (status = 401, description = "Unauthorized")
    )
)]
async fn analytics() {}

/// Financial health score
#[utoipa::path(
    get,
    path = "/api/profile/health",
    tag = "analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Score with budget and goal status", body = HealthReport),
        (status = 401, description = "Unauthorized")
    )
)]
async fn health_report() {}

/// Ask the assistant about your spending
#[utoipa::path(
    post,
    path = "/api/assistant/query",
    tag = "assistant",
    request_body = AssistantRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assistant answer", body = AssistantResponse),
        (status = 400, description = "Empty query"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Assistant failed"),
        (status = 503, description = "Assistant not configured")
    )
)]
async fn ask_assistant() {}

/// OpenAPI documentation for the Xpensa API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Xpensa API",
        version = "1.0.0",
        description = "Personal finance tracking: transactions, budgets, goals and spending analytics.\n\n## Authentication\n\nSign up or log in to receive a token, then include it in the `Authorization` header:\n\n```\nAuthorization: Bearer xp_your_token_here\n```",
        license(name = "MIT"),
    ),
    paths(
        health,
        signup,
        login,
        logout,
        me,
        update_profile,
        add_transaction,
        list_transactions,
        delete_transaction,
        total_spent,
        add_budgets,
        list_budgets,
        budget_status,
        upsert_goals,
        list_goals,
        goal_status,
        analytics,
        health_report,
        ask_assistant,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            AuthResponse,
            UserProfile,
            UpdateProfileRequest,
            UserId,
            TransactionId,
            Transaction,
            CreateTransactionRequest,
            TransactionSort,
            TotalSpentRequest,
            RangeSummary,
            Budget,
            Goal,
            AddBudgetsRequest,
            UpsertGoalsRequest,
            BudgetStatus,
            GoalStatus,
            AggregateBundle,
            CategoryBucket,
            MonthBucket,
            WeekdayBucket,
            TimeOfDay,
            TimeOfDayBucket,
            SpendingInsights,
            AnalyticsResponse,
            HealthReport,
            AssistantRequest,
            AssistantResponse,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup, login and profile"),
        (name = "transactions", description = "Recording and querying spending"),
        (name = "planning", description = "Budgets and savings goals"),
        (name = "analytics", description = "Dashboard aggregates and health score"),
        (name = "assistant", description = "Natural-language questions about spending"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
