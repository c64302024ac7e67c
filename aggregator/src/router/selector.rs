// Route selector - chooses the execution strategy for a set of candidates
// Small trades go to the best effective price, large trades to the deepest
// venue, and very large trades are split across the two deepest venues in
// proportion to their liquidity
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use crate::router::routes::{Candidate, ChosenRoute, RoutingDecision, SplitLeg, Strategy, Thresholds};
use crate::venues::Side;
use std::cmp::Ordering;
use tracing::debug;

/// Number of ranked candidates attached to every decision.
pub const MAX_REPORTED_CANDIDATES: usize = 5;

/// Selects a routing strategy and builds the decision for it.
#[derive(Debug, Clone)]
pub struct RouteSelector {
    thresholds: Thresholds,
    /// Threshold-driven routing; when off every request is best-price
    smart_routing: bool,
    #[cfg(test)]
    fault: Option<&'static str>,
}

impl Default for RouteSelector {
    fn default() -> Self {
        Self::new(Thresholds::default(), true)
    }
}

impl RouteSelector {
    pub fn new(thresholds: Thresholds, smart_routing: bool) -> Self {
        Self {
            thresholds,
            smart_routing,
            #[cfg(test)]
            fault: None,
        }
    }

    /// Panic with `message` on every selection.
    #[cfg(test)]
    pub(crate) fn with_fault(mut self, message: &'static str) -> Self {
        self.fault = Some(message);
        self
    }

    pub fn strategy_for(&self, notional_usd: f64) -> Strategy {
        if self.smart_routing {
            self.thresholds.strategy_for(notional_usd)
        } else {
            Strategy::BestPrice
        }
    }

    /// Pick a route among `candidates`. The result depends only on the
    /// candidate values, never on their input order beyond exact duplicates.
    pub fn select(
        &self,
        candidates: &[Candidate],
        notional_usd: f64,
        side: Side,
    ) -> Result<RoutingDecision, RouterError> {
        #[cfg(test)]
        if let Some(message) = self.fault {
            panic!("{message}");
        }
        if candidates.is_empty() {
            return Err(RouterError::NoCandidates {
                providers: Vec::new(),
            });
        }

        let strategy = self.strategy_for(notional_usd);
        let mut ranked = candidates.to_vec();
        match strategy {
            Strategy::BestPrice => ranked.sort_by(|a, b| by_effective_price(a, b, side)),
            Strategy::DeepestLiquidity | Strategy::SmartSplit => ranked.sort_by(by_liquidity),
        }

        let (chosen, splits) = match strategy {
            Strategy::BestPrice | Strategy::DeepestLiquidity => {
                (single_route(&ranked[0], strategy), None)
            }
            Strategy::SmartSplit => {
                let (chosen, legs) = smart_split(&ranked)?;
                (chosen, Some(legs))
            }
        };

        debug!(
            strategy = %strategy,
            notional_usd = notional_usd,
            side = %side,
            chosen = %chosen.source,
            total_cost_bps = chosen.total_cost_bps,
            candidates = ranked.len(),
            "selected route"
        );

        ranked.truncate(MAX_REPORTED_CANDIDATES);
        Ok(RoutingDecision {
            strategy,
            chosen,
            splits,
            candidates: ranked,
            thresholds: self.thresholds,
        })
    }
}

/// Lower effective price first for buys, higher first for sells.
fn by_effective_price(a: &Candidate, b: &Candidate, side: Side) -> Ordering {
    let by_price = match side {
        Side::Buy => a.effective_price.total_cmp(&b.effective_price),
        Side::Sell => b.effective_price.total_cmp(&a.effective_price),
    };
    by_price.then_with(|| a.source.cmp(&b.source))
}

fn by_liquidity(a: &Candidate, b: &Candidate) -> Ordering {
    b.liquidity_score
        .total_cmp(&a.liquidity_score)
        .then_with(|| a.source.cmp(&b.source))
}

fn single_route(candidate: &Candidate, reason: Strategy) -> ChosenRoute {
    ChosenRoute {
        price: candidate.price,
        fee_bps: candidate.fee_bps,
        liquidity_score: candidate.liquidity_score,
        est_confirm_ms: candidate.est_confirm_ms,
        source: candidate.source.clone(),
        total_cost_bps: candidate.total_cost_bps,
        reason,
    }
}

/// Share (percent) of the first leg, proportional to liquidity. Two empty
/// books split evenly.
pub fn split_allocation(liquidity_1: f64, liquidity_2: f64) -> u8 {
    let total = liquidity_1 + liquidity_2;
    if !total.is_finite() || total <= 0.0 {
        return 50;
    }
    (100.0 * liquidity_1 / total).round().clamp(0.0, 100.0) as u8
}

fn smart_split(ranked: &[Candidate]) -> Result<(ChosenRoute, Vec<SplitLeg>), RouterError> {
    let top1 = &ranked[0];
    let Some(top2) = ranked.get(1) else {
        // Single venue: the whole order goes there.
        let legs = vec![SplitLeg {
            source: top1.source.clone(),
            pct: 100,
        }];
        return Ok((single_route(top1, Strategy::SmartSplit), legs));
    };

    let pct1 = split_allocation(top1.liquidity_score, top2.liquidity_score);
    let pct2 = 100 - pct1;
    let w1 = pct1 as f64 / 100.0;
    let w2 = pct2 as f64 / 100.0;

    let price = top1.price * w1 + top2.price * w2;
    let fee_bps = top1.fee_bps as f64 * w1 + top2.fee_bps as f64 * w2;
    let liquidity_score = top1.liquidity_score * w1 + top2.liquidity_score * w2;
    let est_confirm_ms = top1.est_confirm_ms as f64 * w1 + top2.est_confirm_ms as f64 * w2;
    let slippage_bps = (1.0 - liquidity_score) * 100.0;

    if !price.is_finite() || price <= 0.0 {
        return Err(RouterError::routing(format!(
            "split of {} and {} produced invalid price {price}",
            top1.source, top2.source
        )));
    }

    let chosen = ChosenRoute {
        price,
        fee_bps: fee_bps.round() as u32,
        liquidity_score,
        est_confirm_ms: est_confirm_ms.round() as u64,
        source: top1.source.clone(),
        total_cost_bps: (fee_bps + slippage_bps).round() as u32,
        reason: Strategy::SmartSplit,
    };
    let legs = vec![
        SplitLeg {
            source: top1.source.clone(),
            pct: pct1,
        },
        SplitLeg {
            source: top2.source.clone(),
            pct: pct2,
        },
    ];
    Ok((chosen, legs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venues::Quote;
    use proptest::prelude::{prop, prop_assert, prop_assert_eq, proptest, Strategy as PropStrategy};

    fn candidate(source: &str, price: f64, fee_bps: u32, liquidity: f64, side: Side) -> Candidate {
        Candidate::from_quote(
            &Quote {
                price,
                fee_bps,
                liquidity_score: liquidity,
                est_confirm_ms: 1000,
                source: source.to_string(),
            },
            side,
        )
    }

    #[test]
    fn best_price_buy_prefers_lowest_effective_price() {
        let cands = vec![
            candidate("b", 0.521, 25, 0.80, Side::Buy),
            candidate("a", 0.52, 15, 0.95, Side::Buy),
        ];
        let decision = RouteSelector::default().select(&cands, 500.0, Side::Buy).unwrap();
        assert_eq!(decision.strategy, Strategy::BestPrice);
        assert_eq!(decision.chosen.source, "a");
        assert_eq!(decision.chosen.reason, Strategy::BestPrice);
        assert_eq!(decision.chosen.total_cost_bps, 20);
        assert!(decision.splits.is_none());
        assert_eq!(decision.candidates[1].source, "b");
    }

    #[test]
    fn best_price_sell_prefers_highest_effective_price() {
        let cands = vec![
            candidate("cheap", 0.50, 10, 0.9, Side::Sell),
            candidate("rich", 0.53, 30, 0.7, Side::Sell),
        ];
        let decision = RouteSelector::default().select(&cands, 100.0, Side::Sell).unwrap();
        // 0.53 * (1 - 0.006) = 0.52682 beats 0.50 * (1 - 0.002) = 0.499
        assert_eq!(decision.chosen.source, "rich");
    }

    #[test]
    fn equal_prices_break_ties_by_source() {
        let cands = vec![
            candidate("zeta", 1.0, 10, 0.9, Side::Buy),
            candidate("alpha", 1.0, 10, 0.9, Side::Buy),
        ];
        let selector = RouteSelector::default();
        assert_eq!(selector.select(&cands, 10.0, Side::Buy).unwrap().chosen.source, "alpha");
        assert_eq!(selector.select(&cands, 5_000.0, Side::Buy).unwrap().chosen.source, "alpha");
    }

    #[test]
    fn deepest_liquidity_ignores_price() {
        let cands = vec![
            candidate("cheap-thin", 0.50, 5, 0.40, Side::Buy),
            candidate("deep", 0.60, 30, 0.99, Side::Buy),
        ];
        let decision = RouteSelector::default().select(&cands, 5_000.0, Side::Buy).unwrap();
        assert_eq!(decision.strategy, Strategy::DeepestLiquidity);
        assert_eq!(decision.chosen.source, "deep");
        assert_eq!(decision.chosen.reason, Strategy::DeepestLiquidity);
    }

    #[test]
    fn smart_split_allocates_by_liquidity() {
        let cands = vec![
            candidate("B", 0.521, 25, 0.60, Side::Buy),
            candidate("A", 0.52, 15, 0.85, Side::Buy),
        ];
        let decision = RouteSelector::default().select(&cands, 50_000.0, Side::Buy).unwrap();
        assert_eq!(decision.strategy, Strategy::SmartSplit);
        assert_eq!(
            decision.splits.as_deref().unwrap(),
            &[
                SplitLeg { source: "A".into(), pct: 59 },
                SplitLeg { source: "B".into(), pct: 41 },
            ]
        );
        let chosen = &decision.chosen;
        assert_eq!(chosen.reason, Strategy::SmartSplit);
        assert_eq!(chosen.source, "A");
        assert!((chosen.price - (0.52 * 0.59 + 0.521 * 0.41)).abs() < 1e-12);
        // fee 15*.59 + 25*.41 = 19.1, liquidity .85*.59 + .6*.41 = .7475 -> 25.25 bps slippage
        assert_eq!(chosen.fee_bps, 19);
        assert_eq!(chosen.total_cost_bps, 44);
        assert!((chosen.liquidity_score - 0.7475).abs() < 1e-12);
    }

    #[test]
    fn smart_split_with_one_candidate_takes_everything() {
        let cands = vec![candidate("only", 0.52, 15, 0.85, Side::Buy)];
        let decision = RouteSelector::default().select(&cands, 100_000.0, Side::Buy).unwrap();
        assert_eq!(decision.strategy, Strategy::SmartSplit);
        assert_eq!(
            decision.splits.unwrap(),
            vec![SplitLeg { source: "only".into(), pct: 100 }]
        );
        assert_eq!(decision.chosen.price, 0.52);
        assert_eq!(decision.chosen.total_cost_bps, 30);
    }

    #[test]
    fn zero_liquidity_pair_splits_evenly() {
        assert_eq!(split_allocation(0.0, 0.0), 50);
        assert_eq!(split_allocation(0.85, 0.60), 59);
        assert_eq!(split_allocation(1.0, 0.0), 100);
    }

    #[test]
    fn disabled_smart_routing_always_uses_best_price() {
        let selector = RouteSelector::new(Thresholds::default(), false);
        assert_eq!(selector.strategy_for(1_000_000.0), Strategy::BestPrice);
    }

    #[test]
    fn reports_at_most_five_candidates() {
        let cands: Vec<_> = (0..8)
            .map(|i| candidate(&format!("v{i}"), 1.0 + i as f64 / 100.0, 10, 0.9, Side::Buy))
            .collect();
        let decision = RouteSelector::default().select(&cands, 10.0, Side::Buy).unwrap();
        assert_eq!(decision.candidates.len(), MAX_REPORTED_CANDIDATES);
        assert_eq!(decision.candidates[0].source, "v0");
    }

    #[test]
    fn empty_candidates_is_no_candidates() {
        let err = RouteSelector::default().select(&[], 10.0, Side::Buy).unwrap_err();
        assert_eq!(err.code(), "NO_CANDIDATES");
    }

    fn arb_candidates(side: Side) -> impl PropStrategy<Value = Vec<Candidate>> {
        prop::collection::vec((0.01f64..1000.0, 0u32..200, 0.0f64..=1.0), 1..8).prop_map(
            move |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (price, fee, liq))| candidate(&format!("venue-{i}"), price, fee, liq, side))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn small_buys_get_optimal_effective_price(cands in arb_candidates(Side::Buy), notional in 1.0f64..999.0) {
            let decision = RouteSelector::default().select(&cands, notional, Side::Buy).unwrap();
            let best = &decision.candidates[0];
            prop_assert_eq!(&best.source, &decision.chosen.source);
            for c in &cands {
                prop_assert!(best.effective_price <= c.effective_price);
            }
        }

        #[test]
        fn small_sells_get_optimal_effective_price(cands in arb_candidates(Side::Sell), notional in 1.0f64..999.0) {
            let decision = RouteSelector::default().select(&cands, notional, Side::Sell).unwrap();
            for c in &cands {
                prop_assert!(decision.candidates[0].effective_price >= c.effective_price);
            }
        }

        #[test]
        fn mid_size_gets_maximal_liquidity(cands in arb_candidates(Side::Buy), notional in 1000.0f64..24_999.0) {
            let decision = RouteSelector::default().select(&cands, notional, Side::Buy).unwrap();
            for c in &cands {
                prop_assert!(decision.chosen.liquidity_score >= c.liquidity_score);
            }
        }

        #[test]
        fn split_legs_sum_to_one_hundred(cands in arb_candidates(Side::Buy), notional in 25_000.0f64..1e9) {
            let decision = RouteSelector::default().select(&cands, notional, Side::Buy).unwrap();
            let legs = decision.splits.unwrap();
            let total: u32 = legs.iter().map(|l| l.pct as u32).sum();
            prop_assert_eq!(total, 100);
            if cands.len() >= 2 {
                prop_assert_eq!(legs.len(), 2);
                prop_assert!(legs[0].pct >= legs[1].pct);
            }
        }

        #[test]
        fn selection_ignores_input_order(cands in arb_candidates(Side::Buy), notional in 1.0f64..1e6) {
            let selector = RouteSelector::default();
            let mut reversed = cands.clone();
            reversed.reverse();
            prop_assert_eq!(
                selector.select(&cands, notional, Side::Buy).unwrap(),
                selector.select(&reversed, notional, Side::Buy).unwrap()
            );
        }
    }
}
