// Error types for the routing core
// This file defines the typed routing failures returned to callers, each
// carrying a stable machine code and the per-provider breakdown
//
// Numan Thabit 2025 Nov

use crate::venues::ProviderStatus;
use thiserror::Error;

pub const CODE_NO_CANDIDATES: &str = "NO_CANDIDATES";
pub const CODE_ROUTING_ERROR: &str = "ROUTING_ERROR";
pub const CODE_INVALID_REQUEST: &str = "INVALID_REQUEST";

#[derive(Debug, Clone, Error)]
pub enum RouterError {
    #[error("no liquidity provider returned a usable quote ({} queried)", providers.len())]
    NoCandidates { providers: Vec<ProviderStatus> },
    #[error("invalid route request: {0}")]
    InvalidRequest(String),
    #[error("routing error: {message}")]
    Routing {
        message: String,
        providers: Vec<ProviderStatus>,
    },
}

impl RouterError {
    pub fn code(&self) -> &'static str {
        match self {
            RouterError::NoCandidates { .. } => CODE_NO_CANDIDATES,
            RouterError::InvalidRequest(_) => CODE_INVALID_REQUEST,
            RouterError::Routing { .. } => CODE_ROUTING_ERROR,
        }
    }

    /// Per-provider statuses gathered before the failure (empty when no
    /// provider was queried).
    pub fn providers(&self) -> &[ProviderStatus] {
        match self {
            RouterError::NoCandidates { providers } => providers,
            RouterError::Routing { providers, .. } => providers,
            RouterError::InvalidRequest(_) => &[],
        }
    }

    pub(crate) fn routing(message: impl Into<String>) -> Self {
        RouterError::Routing {
            message: message.into(),
            providers: Vec::new(),
        }
    }

    pub(crate) fn with_providers(self, statuses: Vec<ProviderStatus>) -> Self {
        match self {
            RouterError::NoCandidates { .. } => RouterError::NoCandidates {
                providers: statuses,
            },
            RouterError::Routing { message, .. } => RouterError::Routing {
                message,
                providers: statuses,
            },
            other => other,
        }
    }
}
