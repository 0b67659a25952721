//! # Xpensa Hex
//!
//! Application service layer and adapters for the Xpensa finance service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `outbound/` - Assistant adapter (HTTP client)
//!
//! The service is generic over `R: FinanceRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;


pub use service::FinanceService;
