//! In-memory repository adapter backed by concurrent maps.
//!
//! Used for `memory://` database URLs, demos and tests. Nothing survives a
//! restart.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use xpensa_types::{
    FinanceRepository, RepoError, Session, Transaction, TransactionId, User, UserId,
};

use crate::security::{generate_token, hash_token};

#[derive(Default)]
pub struct MemoryRepo {
    users: DashMap<UserId, User>,
    /// Normalized email -> user
    emails: DashMap<String, UserId>,
    /// Token hash -> session
    sessions: DashMap<String, Session>,
    transactions: DashMap<TransactionId, Transaction>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FinanceRepository for MemoryRepo {
    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "email {} is already registered",
                user.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.get_user(id).await
    }

    async fn update_user(&self, user: &User) -> Result<(), RepoError> {
        let mut stored = self.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        // Email and password are fixed at signup.
        stored.full_name = user.full_name.clone();
        stored.profile_pic = user.profile_pic.clone();
        stored.budgets = user.budgets.clone();
        stored.goals = user.goals.clone();
        stored.updated_at = user.updated_at;
        Ok(())
    }

    async fn create_session(&self, user_id: UserId) -> Result<(Session, String), RepoError> {
        let token = generate_token();
        let session = Session::new(user_id, hash_token(&token));
        self.sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok((session, token))
    }

    async fn verify_session_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, RepoError> {
        let Some(mut session) = self.sessions.get_mut(token_hash) else {
            return Ok(None);
        };
        if !session.is_active {
            return Ok(None);
        }
        session.last_used_at = Some(chrono::Utc::now());
        Ok(Some(session.clone()))
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, RepoError> {
        match self.sessions.get_mut(token_hash) {
            Some(mut session) if session.is_active => {
                session.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction, RepoError> {
        self.transactions.insert(tx.id, tx.clone());
        Ok(tx)
    }

    async fn list_transactions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Transaction>, RepoError> {
        let mut out: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(out)
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<bool, RepoError> {
        Ok(self
            .transactions
            .remove_if(&id, |_, tx| tx.user_id == user_id)
            .is_some())
    }
}
