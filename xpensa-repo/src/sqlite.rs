//! SQLite repository adapter.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use xpensa_types::{
    FinanceRepository, RepoError, Session, Transaction, TransactionId, User, UserId,
};

use crate::security::{generate_token, hash_token};
use crate::types::{DbSession, DbTransaction, DbUser, format_date};

const MIGRATIONS: [(&str, &str); 2] = [
    ("0001", include_str!("../migrations/0001_create_tables.sql")),
    ("0002", include_str!("../migrations/0002_create_sessions.sql")),
];

const USER_COLUMNS: &str =
    "id, email, full_name, password_hash, profile_pic, budgets, goals, created_at, updated_at";

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &SqlitePool, sql: &str, name: &str) -> anyhow::Result<()> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    for (name, sql) in MIGRATIONS {
        execute_migration(pool, sql, name).await?;
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(|e| RepoError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // Ensure on-disk SQLite target directory exists.
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            let parent = std::path::Path::new(path).parent();
            if let Some(parent) = parent.filter(|p| !in_memory && !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // An in-memory database lives only as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;
        tracing::debug!(in_memory, "sqlite repository ready");

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl FinanceRepository for SqliteRepo {
    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(&user.profile_pic)
        .bind(to_json(&user.budgets)?)
        .bind(to_json(&user.goals)?)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Conflict(format!("email {} is already registered", user.email))
            }
            other => RepoError::Database(other.to_string()),
        })?;

        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE users
               SET full_name = ?, profile_pic = ?, budgets = ?, goals = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&user.full_name)
        .bind(&user.profile_pic)
        .bind(to_json(&user.budgets)?)
        .bind(to_json(&user.goals)?)
        .bind(user.updated_at.to_rfc3339())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn create_session(&self, user_id: UserId) -> Result<(Session, String), RepoError> {
        let token = generate_token();
        let session = Session::new(user_id, hash_token(&token));

        sqlx::query(
            r#"INSERT INTO sessions (id, user_id, token_hash, is_active, created_at)
               VALUES (?, ?, ?, 1, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.token_hash)
        .bind(session.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok((session, token))
    }

    async fn verify_session_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, RepoError> {
        let row: Option<DbSession> = sqlx::query_as(
            r#"SELECT id, user_id, token_hash, is_active, created_at, last_used_at
               FROM sessions WHERE token_hash = ? AND is_active = 1"#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let Some(mut session) = row.map(DbSession::into_domain).transpose()? else {
            return Ok(None);
        };

        let now = chrono::Utc::now();
        sqlx::query("UPDATE sessions SET last_used_at = ? WHERE id = ?")
            .bind(now.to_rfc3339())
            .bind(session.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        session.last_used_at = Some(now);
        Ok(Some(session))
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, RepoError> {
        let result =
            sqlx::query("UPDATE sessions SET is_active = 0 WHERE token_hash = ? AND is_active = 1")
                .bind(token_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction, RepoError> {
        sqlx::query(
            r#"INSERT INTO transactions (id, user_id, amount, category, date, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(tx.id.to_string())
        .bind(tx.user_id.to_string())
        .bind(tx.amount)
        .bind(&tx.category)
        .bind(format_date(&tx.date))
        .bind(tx.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(tx)
    }

    async fn list_transactions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Transaction>, RepoError> {
        let rows: Vec<DbTransaction> = sqlx::query_as(
            r#"SELECT id, user_id, amount, category, date, created_at
               FROM transactions WHERE user_id = ?
               ORDER BY date DESC, created_at DESC"#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
