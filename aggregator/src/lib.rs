// Library root module for hybrid-router
// This file defines the public API and module structure of the smart hybrid
// liquidity router
//
// Numan Thabit 2025 Nov

pub mod config;
pub mod errors;
pub mod metrics;
pub mod router;
pub mod venues;

pub use errors::RouterError;
pub use router::{Router, RoutingDecision};
