//! SQLite row types and their conversion into domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::FromRow;

use xpensa_types::{Budget, Goal, RepoError, Session, SessionId, Transaction, TransactionId, User, UserId};

/// Storage format for transaction dates. Fixed width so text ordering is
/// chronological.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// User row. Budgets and goals are stored as JSON arrays.
#[derive(FromRow)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub profile_pic: String,
    pub budgets: String,
    pub goals: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Transaction row from database.
#[derive(FromRow)]
pub struct DbTransaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub created_at: String,
}

/// Session row from database.
#[derive(FromRow)]
pub struct DbSession {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub is_active: i64,
    pub created_at: String,
    pub last_used_at: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

fn parse_uuid(s: &str) -> Result<uuid::Uuid, RepoError> {
    uuid::Uuid::parse_str(s).map_err(|e| RepoError::Database(e.to_string()))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(e.to_string()))
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDateTime, RepoError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| RepoError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion
// ─────────────────────────────────────────────────────────────────────────────

impl DbUser {
    pub fn into_domain(self) -> Result<User, RepoError> {
        let budgets: Vec<Budget> =
            serde_json::from_str(&self.budgets).map_err(|e| RepoError::Database(e.to_string()))?;
        let goals: Vec<Goal> =
            serde_json::from_str(&self.goals).map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(User {
            id: UserId::from_uuid(parse_uuid(&self.id)?),
            email: self.email,
            full_name: self.full_name,
            password_hash: self.password_hash,
            profile_pic: self.profile_pic,
            budgets,
            goals,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl DbTransaction {
    pub fn into_domain(self) -> Result<Transaction, RepoError> {
        Ok(Transaction::from_parts(
            TransactionId::from_uuid(parse_uuid(&self.id)?),
            UserId::from_uuid(parse_uuid(&self.user_id)?),
            self.amount,
            self.category,
            parse_date(&self.date)?,
            parse_timestamp(&self.created_at)?,
        ))
    }
}

impl DbSession {
    pub fn into_domain(self) -> Result<Session, RepoError> {
        let last_used_at = self
            .last_used_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Session {
            id: SessionId::from_uuid(parse_uuid(&self.id)?),
            user_id: UserId::from_uuid(parse_uuid(&self.user_id)?),
            token_hash: self.token_hash,
            is_active: self.is_active != 0,
            created_at: parse_timestamp(&self.created_at)?,
            last_used_at,
        })
    }
}
