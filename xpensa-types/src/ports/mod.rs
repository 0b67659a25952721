//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod assistant;
mod repository;

pub use assistant::{AssistantError, AssistantProvider, AssistantQuery};
pub use repository::FinanceRepository;
