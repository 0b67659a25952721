//! AI assistant port.
//!
//! The assistant answers free-text questions about a user's spending.
//! Implementations forward the question to an external model service.

use serde::{Deserialize, Serialize};

use crate::domain::{Transaction, UserId};

/// Question forwarded to the assistant together with the user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantQuery {
    pub query: String,
    pub user_id: UserId,
    /// Newest first
    pub transactions: Vec<Transaction>,
}

/// Error type for assistant operations.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Assistant unreachable: {0}")]
    Unavailable(String),

    #[error("Assistant returned an error: {0}")]
    Upstream(String),
}

/// Port trait for assistant backends.
#[async_trait::async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Returns the assistant's answer text.
    async fn ask(&self, query: &AssistantQuery) -> Result<String, AssistantError>;
}
