//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use xpensa_types::{
    AddBudgetsRequest, AppError, AssistantRequest, CreateTransactionRequest, FinanceRepository,
    LoginRequest, SignupRequest, TotalSpentRequest, TransactionId, TransactionQuery,
    UpdateProfileRequest, UpsertGoalsRequest, UserId,
};

use super::auth::bearer_token;
use crate::FinanceService;

/// Application state shared across handlers.
pub struct AppState<R: FinanceRepository> {
    pub service: FinanceService<R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn signup<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.service.signup(req).await?;
    Ok((StatusCode::CREATED, Json(auth)))
}

#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn login<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.service.login(req).await?;
    Ok(Json(auth))
}

#[tracing::instrument(skip(state, headers))]
pub async fn logout<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid Authorization header".into()))?;
    state.service.logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current user's profile.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn me<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.me(user_id).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn update_profile<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.update_profile(user_id, req).await?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state), fields(user_id = %user_id, amount = req.amount))]
pub async fn add_transaction<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tx = state.service.add_transaction(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_transactions<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.list_transactions(user_id, &query).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id, tx_id = %id))]
pub async fn delete_transaction<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tx_id: TransactionId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid transaction ID".into()))?;

    state.service.delete_transaction(user_id, tx_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Total spending between two days.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn total_spent<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Json(req): Json<TotalSpentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.total_spent(user_id, req).await?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Budgets & Goals
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn add_budgets<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Json(req): Json<AddBudgetsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.add_budgets(user_id, req).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_budgets<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.budgets(user_id).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn budget_status<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.budget_status(user_id).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn upsert_goals<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Json(req): Json<UpsertGoalsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.upsert_goals(user_id, req).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_goals<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.goals(user_id).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn goal_status<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.goal_status(user_id).await?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Analytics
// ─────────────────────────────────────────────────────────────────────────────

/// Dashboard analytics, recomputed on every request.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn analytics<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.analytics(user_id).await?))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn health_report<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.health_report(user_id).await?))
}

#[tracing::instrument(skip(state, req), fields(user_id = %user_id))]
pub async fn ask_assistant<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user_id): Extension<UserId>,
    Json(req): Json<AssistantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.ask_assistant(user_id, req).await?))
}
