// Venue module - liquidity providers the router aggregates over
//
// Numan Thabit 2025 Nov

pub mod fixture;
pub mod http;
pub mod provider;
pub mod registry;

pub use fixture::FixtureProvider;
pub use http::HttpTickerProvider;
pub use provider::{LiquidityProvider, ProviderOutcome, ProviderStatus, Quote, QuoteRequest, Side};
pub use registry::{ProviderRegistry, RegistryBuilder};
