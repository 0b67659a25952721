//! # Xpensa Types
//!
//! Domain types, spending analytics and port traits for the Xpensa
//! personal finance service. This crate has ZERO external IO dependencies -
//! only data structures, business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (User, Budget, Goal, Transaction, Session)
//! - `analytics/` - The aggregation engine behind the dashboard
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod analytics;
pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use analytics::{AggregateBundle, RangeSummary, aggregate};
pub use domain::{
    Budget, Goal, Session, SessionId, Transaction, TransactionId, User, UserId,
    parse_calendar_day, parse_transaction_date,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{AssistantError, AssistantProvider, AssistantQuery, FinanceRepository};
