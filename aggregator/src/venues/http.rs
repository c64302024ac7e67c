// HTTP market-data venue adapter
// This file implements a liquidity provider that prices a pair from a public
// ticker endpoint; venue fee, depth and confirmation estimates come from config
//
// Numan Thabit 2025 Nov

use super::provider::{LiquidityProvider, Quote, QuoteRequest};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Static description of an HTTP ticker venue.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpVenueConfig {
    pub name: String,
    /// URL with `{base}`, `{quote}` and `{side}` placeholders,
    /// e.g. `https://api.binance.com/api/v3/ticker/price?symbol={base}{quote}`
    pub url: String,
    /// JSON pointer to the price field in the response body
    #[serde(default = "default_price_pointer")]
    pub price_pointer: String,
    #[serde(default)]
    pub fee_bps: u32,
    pub liquidity_score: f64,
    #[serde(default = "default_confirm_ms")]
    pub est_confirm_ms: u64,
    /// Optional request timeout; the router's provider timeout still applies
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_price_pointer() -> String {
    "/price".to_string()
}

fn default_confirm_ms() -> u64 {
    1_000
}

#[derive(Debug, Clone)]
pub struct HttpTickerProvider {
    http: Client,
    venue: HttpVenueConfig,
}

impl HttpTickerProvider {
    pub fn new(venue: HttpVenueConfig) -> Result<Self> {
        // Fail fast on templates that can never produce a valid URL.
        render_url(&venue.url, "BASE", "QUOTE", "buy")
            .with_context(|| format!("invalid url template for venue {}", venue.name))?;

        let mut builder = Client::builder();
        if let Some(ms) = venue.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build().context("build http client")?;
        Ok(Self { http, venue })
    }
}

#[async_trait]
impl LiquidityProvider for HttpTickerProvider {
    fn name(&self) -> &str {
        &self.venue.name
    }

    async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote> {
        let url = render_url(&self.venue.url, &req.base, &req.quote, req.side.as_str())?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("ticker request to {}", url.host_str().unwrap_or("?")))?;
        if !resp.status().is_success() {
            bail!("ticker http {}", resp.status());
        }
        let body: Value = resp.json().await.context("decode ticker body")?;
        let price = extract_price(&body, &self.venue.price_pointer)?;

        Ok(Quote {
            price,
            fee_bps: self.venue.fee_bps,
            liquidity_score: self.venue.liquidity_score,
            est_confirm_ms: self.venue.est_confirm_ms,
            source: self.venue.name.clone(),
        })
    }
}

/// Substitute pair placeholders and parse the result.
pub fn render_url(template: &str, base: &str, quote: &str, side: &str) -> Result<Url> {
    let rendered = template
        .replace("{base}", &base.trim().to_ascii_uppercase())
        .replace("{quote}", &quote.trim().to_ascii_uppercase())
        .replace("{side}", side);
    Url::parse(&rendered).with_context(|| format!("parse ticker url {rendered}"))
}

/// Read a price at `pointer`; exchanges return it either as a number or a
/// decimal string.
pub fn extract_price(body: &Value, pointer: &str) -> Result<f64> {
    let value = body
        .pointer(pointer)
        .with_context(|| format!("ticker body has no field at {pointer}"))?;
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match price {
        Some(p) if p.is_finite() && p > 0.0 => Ok(p),
        _ => bail!("ticker price at {pointer} is not a positive number: {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn venue(url: &str) -> HttpVenueConfig {
        HttpVenueConfig {
            name: "binance".into(),
            url: url.into(),
            price_pointer: default_price_pointer(),
            fee_bps: 10,
            liquidity_score: 0.9,
            est_confirm_ms: 250,
            request_timeout_ms: Some(1500),
        }
    }

    #[test]
    fn renders_pair_into_template() {
        let url = render_url(
            "https://api.binance.com/api/v3/ticker/price?symbol={base}{quote}",
            "xrp",
            "usdt",
            "buy",
        )
        .unwrap();
        assert_eq!(url.query(), Some("symbol=XRPUSDT"));
    }

    #[test]
    fn extracts_string_and_numeric_prices() {
        let body = json!({"symbol": "XRPUSDT", "price": "0.52140000"});
        assert!((extract_price(&body, "/price").unwrap() - 0.5214).abs() < 1e-12);

        let body = json!({"data": {"last": 3150.5}});
        assert_eq!(extract_price(&body, "/data/last").unwrap(), 3150.5);
    }

    #[test]
    fn rejects_missing_or_bad_prices() {
        let body = json!({"price": "n/a"});
        assert!(extract_price(&body, "/price").is_err());
        assert!(extract_price(&body, "/last").is_err());
        assert!(extract_price(&json!({"price": -1.0}), "/price").is_err());
    }

    #[test]
    fn rejects_unparseable_template() {
        assert!(HttpTickerProvider::new(venue("not a url/{base}")).is_err());
        let provider = HttpTickerProvider::new(venue("https://example.com/t/{base}-{quote}")).unwrap();
        assert_eq!(provider.name(), "binance");
    }
}
