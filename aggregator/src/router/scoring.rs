// Candidate normalization
// Converts provider quotes into comparable cost terms: liquidity-implied
// slippage, total cost in bps, and a side-adjusted effective price
//
// Numan Thabit 2025 Nov

use crate::router::routes::Candidate;
use crate::venues::{ProviderOutcome, Quote, Side};

pub const BPS_DENOMINATOR: f64 = 10_000.0;

/// Slippage implied by a liquidity score in [0, 1]; a score of 1 means none.
pub fn slippage_bps(liquidity_score: f64) -> u32 {
    ((1.0 - liquidity_score.clamp(0.0, 1.0)) * 100.0).round() as u32
}

/// Fold `total_cost_bps` into `price` against the requester.
pub fn effective_price(price: f64, total_cost_bps: u32, side: Side) -> f64 {
    let cost = total_cost_bps as f64 / BPS_DENOMINATOR;
    match side {
        Side::Buy => price * (1.0 + cost),
        Side::Sell => (price * (1.0 - cost)).max(0.0),
    }
}

impl Candidate {
    pub fn from_quote(quote: &Quote, side: Side) -> Self {
        let slippage_bps = slippage_bps(quote.liquidity_score);
        let total_cost_bps = quote.fee_bps.saturating_add(slippage_bps);
        Self {
            source: quote.source.clone(),
            price: quote.price,
            fee_bps: quote.fee_bps,
            liquidity_score: quote.liquidity_score,
            est_confirm_ms: quote.est_confirm_ms,
            slippage_bps,
            total_cost_bps,
            effective_price: effective_price(quote.price, total_cost_bps, side),
        }
    }
}

/// Build candidates from every successful, numerically valid outcome, in
/// outcome order. An empty result means no route is possible.
pub fn score(outcomes: &[ProviderOutcome], side: Side) -> Vec<Candidate> {
    outcomes
        .iter()
        .filter_map(ProviderOutcome::quote)
        .filter(|quote| quote.check().is_ok())
        .map(|quote| Candidate::from_quote(quote, side))
        .collect()
}
