//! # Xpensa Repository
//!
//! Concrete repository implementations (adapters) for the Xpensa service.
//! This crate provides storage adapters that implement the `FinanceRepository` port.

use async_trait::async_trait;
use xpensa_types::{
    FinanceRepository, RepoError, Session, Transaction, TransactionId, User, UserId,
};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;

pub mod security;


pub use memory::MemoryRepo;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepo;

/// Unified repository wrapper over the available storage backends.
pub enum Repo {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteRepo),
    Memory(MemoryRepo),
}

/// Build and initialize a repository from a database URL.
///
/// `memory://` selects the in-memory adapter. `sqlite:` URLs connect to
/// SQLite and run migrations.
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("sqlite://data/xpensa.db?mode=rwc").await?;
/// let repo = build_repo("memory://").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<Repo> {
    Repo::new(database_url).await
}

impl Repo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        if database_url.starts_with("memory:") {
            tracing::info!("using in-memory repository");
            return Ok(Self::Memory(MemoryRepo::new()));
        }

        #[cfg(feature = "sqlite")]
        if database_url.starts_with("sqlite:") {
            tracing::info!("using sqlite repository");
            return Ok(Self::Sqlite(SqliteRepo::new(database_url).await?));
        }

        anyhow::bail!("Unsupported DATABASE_URL scheme: {}", database_url)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement FinanceRepository for Repo (delegation)
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! delegate {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call.await,
            Repo::Memory($repo) => $call.await,
        }
    };
}

#[async_trait]
impl FinanceRepository for Repo {
    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        delegate!(self, r => r.create_user(user))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError> {
        delegate!(self, r => r.get_user(id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        delegate!(self, r => r.find_user_by_email(email))
    }

    async fn update_user(&self, user: &User) -> Result<(), RepoError> {
        delegate!(self, r => r.update_user(user))
    }

    async fn create_session(&self, user_id: UserId) -> Result<(Session, String), RepoError> {
        delegate!(self, r => r.create_session(user_id))
    }

    async fn verify_session_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, RepoError> {
        delegate!(self, r => r.verify_session_token_hash(token_hash))
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, RepoError> {
        delegate!(self, r => r.revoke_session(token_hash))
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction, RepoError> {
        delegate!(self, r => r.insert_transaction(tx))
    }

    async fn list_transactions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Transaction>, RepoError> {
        delegate!(self, r => r.list_transactions_for_user(user_id))
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<bool, RepoError> {
        delegate!(self, r => r.delete_transaction(user_id, id))
    }
}
