//! Finance Application Service
//!
//! Validates requests, loads the user's records through the repository port
//! and feeds them to the analytics engine or the assistant port. Sessions and
//! password hashes are checked here; HTTP and SQL stay in the adapters.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use xpensa_repo::security::{hash_password, hash_token, verify_password};
use xpensa_types::analytics::{
    BudgetStatus, GoalStatus, SpendingInsights, aggregate, financial_health_score,
    summarize_range,
};
use xpensa_types::domain::normalize_email;
use xpensa_types::{
    AddBudgetsRequest, AnalyticsResponse, AppError, AssistantError, AssistantProvider,
    AssistantQuery, AssistantRequest, AssistantResponse, AuthResponse, Budget,
    CreateTransactionRequest, FinanceRepository, Goal, HealthReport, LoginRequest, RangeSummary,
    SignupRequest, TotalSpentRequest, Transaction, TransactionId, TransactionQuery,
    UpdateProfileRequest, UpsertGoalsRequest, User, UserId, UserProfile, parse_calendar_day,
    parse_transaction_date,
};

const MIN_PASSWORD_LEN: usize = 6;

/// Login failures never reveal which half of the credentials was wrong.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Application service for the finance API.
///
/// Generic over `R: FinanceRepository` - the adapter is injected at compile time.
/// The assistant is optional; without one, assistant queries fail with
/// `ServiceUnavailable`.
pub struct FinanceService<R: FinanceRepository> {
    repo: R,
    assistant: Option<Arc<dyn AssistantProvider>>,
}

impl<R: FinanceRepository> FinanceService<R> {
    /// Creates a new finance service with the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            assistant: None,
        }
    }

    /// Attaches an assistant backend.
    pub fn with_assistant(mut self, assistant: Arc<dyn AssistantProvider>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a user and opens their first session.
    pub async fn signup(&self, req: SignupRequest) -> Result<AuthResponse, AppError> {
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let user = User::new(&req.full_name, &req.email, hash_password(&req.password))?;
        let user = self.repo.create_user(user).await?;
        tracing::info!(user_id = %user.id, "user registered");

        self.open_session(&user).await
    }

    /// Checks credentials and opens a new session.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&req.email);
        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .filter(|user| verify_password(&req.password, &user.password_hash));

        let Some(user) = user else {
            tracing::warn!("login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        self.open_session(&user).await
    }

    async fn open_session(&self, user: &User) -> Result<AuthResponse, AppError> {
        let (_session, token) = self.repo.create_session(user.id).await?;
        Ok(AuthResponse {
            user: UserProfile::from(user),
            token,
        })
    }

    /// Resolves a raw bearer token to the user it belongs to.
    pub async fn authenticate(&self, token: &str) -> Result<UserId, AppError> {
        self.repo
            .verify_session_token_hash(&hash_token(token))
            .await?
            .map(|session| session.user_id)
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))
    }

    /// Deactivates the session behind a raw bearer token.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        if !self.repo.revoke_session(&hash_token(token)).await? {
            return Err(AppError::Unauthorized("Invalid or expired token".into()));
        }
        Ok(())
    }

    /// Returns the user's public profile.
    pub async fn me(&self, user_id: UserId) -> Result<UserProfile, AppError> {
        let user = self.load_user(user_id).await?;
        Ok(UserProfile::from(&user))
    }

    /// Changes the profile picture.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let mut user = self.load_user(user_id).await?;
        user.set_profile_pic(req.profile_pic.trim().to_string());
        self.repo.update_user(&user).await?;
        Ok(UserProfile::from(&user))
    }

    async fn load_user(&self, user_id: UserId) -> Result<User, AppError> {
        self.repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Records a transaction. The date defaults to the current UTC time.
    pub async fn add_transaction(
        &self,
        user_id: UserId,
        req: CreateTransactionRequest,
    ) -> Result<Transaction, AppError> {
        let date = match req.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_transaction_date(raw)?,
            _ => Utc::now().naive_utc(),
        };

        let tx = Transaction::new(user_id, req.amount, &req.category, date)?;
        let tx = self.repo.insert_transaction(tx).await?;
        tracing::debug!(tx_id = %tx.id, amount = tx.amount, category = %tx.category, "transaction recorded");
        Ok(tx)
    }

    /// Lists the user's transactions, filtered and sorted by `query`.
    pub async fn list_transactions(
        &self,
        user_id: UserId,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = self.repo.list_transactions_for_user(user_id).await?;
        Ok(query.apply(transactions))
    }

    /// Deletes one of the user's transactions.
    pub async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<(), AppError> {
        if !self.repo.delete_transaction(user_id, id).await? {
            return Err(AppError::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }

    /// Sums spending between two calendar days, both inclusive.
    pub async fn total_spent(
        &self,
        user_id: UserId,
        req: TotalSpentRequest,
    ) -> Result<RangeSummary, AppError> {
        let start = parse_calendar_day(&req.start_date)?;
        let end = parse_calendar_day(&req.end_date)?;
        let category = req
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let transactions = self.repo.list_transactions_for_user(user_id).await?;
        Ok(summarize_range(&transactions, start, end, category)?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Budgets & Goals
    // ─────────────────────────────────────────────────────────────────────────────

    /// Appends budgets and returns the full list.
    pub async fn add_budgets(
        &self,
        user_id: UserId,
        req: AddBudgetsRequest,
    ) -> Result<Vec<Budget>, AppError> {
        if req.budgets.is_empty() {
            return Err(AppError::BadRequest("No budgets provided".into()));
        }
        let budgets = req
            .budgets
            .iter()
            .map(|b| Budget::new(&b.category, b.limit))
            .collect::<Result<Vec<_>, _>>()?;

        let mut user = self.load_user(user_id).await?;
        user.add_budgets(budgets);
        self.repo.update_user(&user).await?;
        Ok(user.budgets)
    }

    pub async fn budgets(&self, user_id: UserId) -> Result<Vec<Budget>, AppError> {
        Ok(self.load_user(user_id).await?.budgets)
    }

    /// Evaluates every budget against the user's transactions.
    pub async fn budget_status(&self, user_id: UserId) -> Result<Vec<BudgetStatus>, AppError> {
        let user = self.load_user(user_id).await?;
        let transactions = self.repo.list_transactions_for_user(user_id).await?;
        Ok(evaluate_budgets(&user.budgets, &transactions))
    }

    /// Inserts or replaces goals by title and returns the full list.
    pub async fn upsert_goals(
        &self,
        user_id: UserId,
        req: UpsertGoalsRequest,
    ) -> Result<Vec<Goal>, AppError> {
        if req.goals.is_empty() {
            return Err(AppError::BadRequest("No goals provided".into()));
        }
        let goals = req
            .goals
            .iter()
            .map(|g| Goal::new(&g.title, g.target, g.current, g.deadline, g.complete))
            .collect::<Result<Vec<_>, _>>()?;

        let mut user = self.load_user(user_id).await?;
        for goal in goals {
            user.upsert_goal(goal);
        }
        self.repo.update_user(&user).await?;
        Ok(user.goals)
    }

    pub async fn goals(&self, user_id: UserId) -> Result<Vec<Goal>, AppError> {
        Ok(self.load_user(user_id).await?.goals)
    }

    /// Progress on every goal as of today (UTC).
    pub async fn goal_status(&self, user_id: UserId) -> Result<Vec<GoalStatus>, AppError> {
        let user = self.load_user(user_id).await?;
        Ok(evaluate_goals(&user.goals, today()))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Analytics
    // ─────────────────────────────────────────────────────────────────────────────

    /// Recomputes the dashboard analytics from the user's current transactions.
    pub async fn analytics(&self, user_id: UserId) -> Result<AnalyticsResponse, AppError> {
        let transactions = self.repo.list_transactions_for_user(user_id).await?;
        let bundle = aggregate(&transactions);
        let insights = SpendingInsights::from_bundle(&bundle);
        tracing::debug!(
            transactions = transactions.len(),
            total_spent = bundle.total_spent,
            "analytics recomputed"
        );
        Ok(AnalyticsResponse { bundle, insights })
    }

    /// Budget and goal status plus the overall financial health score.
    pub async fn health_report(&self, user_id: UserId) -> Result<HealthReport, AppError> {
        let user = self.load_user(user_id).await?;
        let transactions = self.repo.list_transactions_for_user(user_id).await?;

        let budgets = evaluate_budgets(&user.budgets, &transactions);
        let score = financial_health_score(&budgets, &user.goals);
        Ok(HealthReport {
            score,
            budgets,
            goals: evaluate_goals(&user.goals, today()),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Assistant
    // ─────────────────────────────────────────────────────────────────────────────

    /// Forwards a question and the user's history to the assistant.
    pub async fn ask_assistant(
        &self,
        user_id: UserId,
        req: AssistantRequest,
    ) -> Result<AssistantResponse, AppError> {
        let query = req.query.trim();
        if query.is_empty() {
            return Err(AppError::BadRequest("Query cannot be empty".into()));
        }

        let Some(assistant) = self.assistant.as_ref() else {
            return Err(AppError::ServiceUnavailable(
                "Assistant is not configured".into(),
            ));
        };

        let transactions = self.repo.list_transactions_for_user(user_id).await?;
        let question = AssistantQuery {
            query: query.to_string(),
            user_id,
            transactions,
        };

        let response = assistant.ask(&question).await.map_err(|e| {
            tracing::error!("assistant request failed: {}", e);
            match e {
                AssistantError::Unavailable(msg) | AssistantError::Upstream(msg) => {
                    AppError::BadGateway(msg)
                }
            }
        })?;

        Ok(AssistantResponse { response })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn evaluate_budgets(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|budget| BudgetStatus::evaluate(budget, transactions))
        .collect()
}

fn evaluate_goals(goals: &[Goal], today: NaiveDate) -> Vec<GoalStatus> {
    goals
        .iter()
        .map(|goal| GoalStatus::evaluate(goal, today))
        .collect()
}
