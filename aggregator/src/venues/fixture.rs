// Fixture venue adapter
// This file implements a deterministic liquidity provider backed by a static
// quote table, loadable from YAML, used for demos and tests
//
// Numan Thabit 2025 Nov

use super::provider::{LiquidityProvider, Quote, QuoteRequest};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Quote returned for a single pair.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureQuote {
    pub price: f64,
    #[serde(default)]
    pub fee_bps: u32,
    pub liquidity_score: f64,
    #[serde(default)]
    pub est_confirm_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct FixtureProvider {
    name: String,
    /// Keyed by upper-cased (base, quote)
    quotes: HashMap<(String, String), FixtureQuote>,
    est_confirm_ms: u64,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl FixtureProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quotes: HashMap::new(),
            est_confirm_ms: 1_000,
            failure: None,
            delay: None,
        }
    }

    pub fn with_quote(mut self, base: &str, quote: &str, q: FixtureQuote) -> Self {
        self.quotes.insert(pair_key(base, quote), q);
        self
    }

    /// Shorthand for the common price/fee/liquidity triple.
    pub fn quoting(self, base: &str, quote: &str, price: f64, fee_bps: u32, liquidity_score: f64) -> Self {
        self.with_quote(
            base,
            quote,
            FixtureQuote {
                price,
                fee_bps,
                liquidity_score,
                est_confirm_ms: None,
            },
        )
    }

    pub fn with_confirm_ms(mut self, est_confirm_ms: u64) -> Self {
        self.est_confirm_ms = est_confirm_ms;
        self
    }

    /// Every call fails with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Sleep before answering, to emulate upstream latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl LiquidityProvider for FixtureProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.failure {
            bail!("{reason}");
        }
        let fixture = self
            .quotes
            .get(&pair_key(&req.base, &req.quote))
            .with_context(|| format!("{} does not quote {}", self.name, req.pair()))?;

        Ok(Quote {
            price: fixture.price,
            fee_bps: fixture.fee_bps,
            liquidity_score: fixture.liquidity_score,
            est_confirm_ms: fixture.est_confirm_ms.unwrap_or(self.est_confirm_ms),
            source: self.name.clone(),
        })
    }
}

fn pair_key(base: &str, quote: &str) -> (String, String) {
    (base.trim().to_ascii_uppercase(), quote.trim().to_ascii_uppercase())
}

#[derive(Debug, Deserialize)]
struct FixtureBook {
    venues: Vec<FixtureVenue>,
}

#[derive(Debug, Deserialize)]
struct FixtureVenue {
    name: String,
    #[serde(default)]
    est_confirm_ms: Option<u64>,
    #[serde(default)]
    fail_with: Option<String>,
    #[serde(default)]
    delay_ms: Option<u64>,
    #[serde(default)]
    quotes: Vec<FixturePairQuote>,
}

#[derive(Debug, Deserialize)]
struct FixturePairQuote {
    base: String,
    quote: String,
    #[serde(flatten)]
    quote_data: FixtureQuote,
}

/// Parse a YAML fixture book into one provider per venue, in file order.
pub fn load_venues(yaml: &str) -> Result<Vec<FixtureProvider>> {
    let book: FixtureBook = serde_yaml::from_str(yaml).context("parse fixture book")?;
    let venues = book
        .venues
        .into_iter()
        .map(|venue| {
            let mut provider = FixtureProvider::new(venue.name);
            if let Some(ms) = venue.est_confirm_ms {
                provider = provider.with_confirm_ms(ms);
            }
            if let Some(reason) = venue.fail_with {
                provider = provider.failing(reason);
            }
            if let Some(ms) = venue.delay_ms {
                provider = provider.with_delay(Duration::from_millis(ms));
            }
            for q in venue.quotes {
                provider = provider.with_quote(&q.base, &q.quote, q.quote_data);
            }
            provider
        })
        .collect();
    Ok(venues)
}

pub fn load_venues_file(path: impl AsRef<Path>) -> Result<Vec<FixtureProvider>> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("read fixture book {}", path.display()))?;
    load_venues(&yaml).with_context(|| format!("load fixture book {}", path.display()))
}
