//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (SQLite, in-memory) implement this trait.

use crate::domain::{Session, Transaction, TransactionId, User, UserId};
use crate::error::RepoError;

/// The main repository port for finance data.
///
/// Users are documents: budgets and goals travel with the user and are
/// persisted through [`FinanceRepository::update_user`].
#[async_trait::async_trait]
pub trait FinanceRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a new user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: User) -> Result<User, RepoError>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Finds a user by normalized (lowercase) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Overwrites a stored user document. Fails with `NotFound` if missing.
    async fn update_user(&self, user: &User) -> Result<(), RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a session and returns it with the raw token (shown only once).
    async fn create_session(&self, user_id: UserId) -> Result<(Session, String), RepoError>;

    /// Looks up an active session by token hash and records its use.
    async fn verify_session_token_hash(&self, token_hash: &str)
    -> Result<Option<Session>, RepoError>;

    /// Deactivates a session. Returns false if no active session matched.
    async fn revoke_session(&self, token_hash: &str) -> Result<bool, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a transaction.
    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction, RepoError>;

    /// Lists a user's transactions, newest `date` first.
    async fn list_transactions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Transaction>, RepoError>;

    /// Deletes one of the user's transactions. Returns false if none matched.
    async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<bool, RepoError>;
}
