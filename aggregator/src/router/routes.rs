// Route types and routing policy
// This file defines candidates, routing strategies, the routing decision and
// the outbound response shapes callers receive
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use crate::venues::ProviderStatus;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notional thresholds (USD) that pick the routing regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub large_trade_usd: f64,
    pub split_trade_usd: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_trade_usd: 1_000.0,
            split_trade_usd: 25_000.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.large_trade_usd.is_finite() && self.large_trade_usd >= 0.0,
            "large_trade_usd must be a finite non-negative number"
        );
        ensure!(
            self.split_trade_usd.is_finite() && self.split_trade_usd >= 0.0,
            "split_trade_usd must be a finite non-negative number"
        );
        ensure!(
            self.large_trade_usd <= self.split_trade_usd,
            "large_trade_usd ({}) must not exceed split_trade_usd ({})",
            self.large_trade_usd,
            self.split_trade_usd
        );
        Ok(())
    }

    pub fn strategy_for(&self, notional_usd: f64) -> Strategy {
        if notional_usd < self.large_trade_usd {
            Strategy::BestPrice
        } else if notional_usd < self.split_trade_usd {
            Strategy::DeepestLiquidity
        } else {
            Strategy::SmartSplit
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    BestPrice,
    DeepestLiquidity,
    SmartSplit,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::BestPrice => "best-price",
            Strategy::DeepestLiquidity => "deepest-liquidity",
            Strategy::SmartSplit => "smart-split",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A valid quote normalized into comparable cost terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub source: String,
    pub price: f64,
    pub fee_bps: u32,
    pub liquidity_score: f64,
    pub est_confirm_ms: u64,
    pub slippage_bps: u32,
    pub total_cost_bps: u32,
    /// Price after fees and slippage, never better than `price` for the requester
    pub effective_price: f64,
}

/// The execution the router settled on. For smart-split the metrics are
/// allocation-weighted and `source` names the primary leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChosenRoute {
    pub price: f64,
    pub fee_bps: u32,
    pub liquidity_score: f64,
    pub est_confirm_ms: u64,
    pub source: String,
    pub total_cost_bps: u32,
    pub reason: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitLeg {
    pub source: String,
    pub pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub strategy: Strategy,
    pub chosen: ChosenRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splits: Option<Vec<SplitLeg>>,
    /// Top candidates in the regime's own order
    pub candidates: Vec<Candidate>,
    pub thresholds: Thresholds,
}

impl RoutingDecision {
    pub fn primary_source(&self) -> &str {
        match self.splits.as_deref() {
            Some([first, ..]) => &first.source,
            _ => &self.chosen.source,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splits: Option<Vec<SplitLeg>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    pub strategy: Strategy,
    pub thresholds: Thresholds,
}

/// Wire shape of a routing call, success or failure.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RouteResponse {
    Routed {
        ok: bool,
        route: RouteSummary,
        chosen: ChosenRoute,
        candidates: Vec<Candidate>,
        policy: PolicySummary,
    },
    Failed {
        ok: bool,
        code: &'static str,
        message: String,
        providers: Vec<ProviderStatus>,
    },
}

impl From<RoutingDecision> for RouteResponse {
    fn from(decision: RoutingDecision) -> Self {
        RouteResponse::Routed {
            ok: true,
            route: RouteSummary {
                primary: decision.primary_source().to_string(),
                splits: decision.splits,
            },
            chosen: decision.chosen,
            candidates: decision.candidates,
            policy: PolicySummary {
                strategy: decision.strategy,
                thresholds: decision.thresholds,
            },
        }
    }
}

impl From<RouterError> for RouteResponse {
    fn from(err: RouterError) -> Self {
        RouteResponse::Failed {
            ok: false,
            code: err.code(),
            message: err.to_string(),
            providers: err.providers().to_vec(),
        }
    }
}

impl From<Result<RoutingDecision, RouterError>> for RouteResponse {
    fn from(result: Result<RoutingDecision, RouterError>) -> Self {
        match result {
            Ok(decision) => decision.into(),
            Err(err) => err.into(),
        }
    }
}
