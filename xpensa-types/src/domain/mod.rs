//! Domain models for the finance service.

pub mod session;
pub mod transaction;
pub mod user;

pub use session::{Session, SessionId};
pub use transaction::{Transaction, TransactionId, parse_calendar_day, parse_transaction_date};
pub use user::{Budget, Goal, User, UserId, normalize_email};
