//! Outbound adapters for ports that call external services.

pub mod assistant;

pub use assistant::HttpAssistant;
