// Liquidity provider interface
// This file defines the capability every liquidity source implements and the
// quote/outcome types that flow from providers into the router
//
// Numan Thabit 2025 Nov

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade the router is asked to price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub base: String,
    pub quote: String,
    pub side: Side,
    #[serde(alias = "notionalUSD")]
    pub notional_usd: f64,
}

impl QuoteRequest {
    pub fn new(base: impl Into<String>, quote: impl Into<String>, side: Side, notional_usd: f64) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
            side,
            notional_usd,
        }
    }

    pub fn pair(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

/// A successful quote as reported by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub price: f64,
    pub fee_bps: u32,
    pub liquidity_score: f64,
    pub est_confirm_ms: u64,
    pub source: String,
}

impl Quote {
    /// Reject quotes the scorer cannot normalize.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.source.trim().is_empty() {
            return Err("malformed quote: empty source".to_string());
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(format!(
                "malformed quote from {}: price {} is not a finite positive number",
                self.source, self.price
            ));
        }
        if !self.liquidity_score.is_finite() || !(0.0..=1.0).contains(&self.liquidity_score) {
            return Err(format!(
                "malformed quote from {}: liquidity score {} outside [0, 1]",
                self.source, self.liquidity_score
            ));
        }
        Ok(())
    }
}

/// Any component that can price a trade.
///
/// Implementations are treated as stateless by the router; an `Err` is the
/// provider's failure or rejection reason and never aborts routing.
#[async_trait]
pub trait LiquidityProvider: Send + Sync {
    /// Registry name; also used to label the provider when it fails.
    fn name(&self) -> &str;

    async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote>;
}

/// Result of querying a single provider during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutcome {
    pub provider: String,
    pub result: std::result::Result<Quote, String>,
    pub latency_ms: u64,
}

impl ProviderOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.result.as_ref().ok()
    }

    pub fn status(&self) -> ProviderStatus {
        match &self.result {
            Ok(_) => ProviderStatus {
                source: self.provider.clone(),
                ok: true,
                reason: None,
                latency_ms: self.latency_ms,
            },
            Err(reason) => ProviderStatus {
                source: self.provider.clone(),
                ok: false,
                reason: Some(reason.clone()),
                latency_ms: self.latency_ms,
            },
        }
    }
}

/// Per-provider entry surfaced in failures and audit records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub source: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub latency_ms: u64,
}
