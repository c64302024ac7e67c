// Configuration management module
// This file handles loading and parsing of configuration settings from an
// optional config file layered under environment variables
//
// Numan Thabit 2025 Nov

use crate::router::routes::Thresholds;
use crate::venues::fixture::{load_venues, load_venues_file};
use crate::venues::http::{HttpTickerProvider, HttpVenueConfig};
use crate::venues::{LiquidityProvider, ProviderRegistry};
use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Env var naming an optional config file (YAML, TOML or JSON).
pub const CONFIG_PATH_ENV: &str = "ROUTER_CONFIG";

const DEMO_BOOK: &str = include_str!("../fixtures/venues.yaml");

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP API bind address
    pub listen_addr: String,
    pub routing: RoutingConfig,
    /// Liquidity providers in registration order; empty serves the demo book
    pub providers: Vec<ProviderConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            routing: RoutingConfig::default(),
            providers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// When off, every request is routed best-price regardless of size
    pub enabled: bool,
    /// Notional (USD) at which deepest-liquidity routing starts
    pub large_trade_usd: f64,
    /// Notional (USD) at which smart-split routing starts
    pub split_trade_usd: f64,
    /// Upper bound on a single provider call
    pub provider_timeout_ms: u64,
    /// Number of decisions kept in the audit buffer
    pub audit_capacity: usize,
    pub audit_verbosity: AuditVerbosity,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            enabled: true,
            large_trade_usd: thresholds.large_trade_usd,
            split_trade_usd: thresholds.split_trade_usd,
            provider_timeout_ms: 2_500,
            audit_capacity: 100,
            audit_verbosity: AuditVerbosity::Summary,
        }
    }
}

impl RoutingConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            large_trade_usd: self.large_trade_usd,
            split_trade_usd: self.split_trade_usd,
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds().validate()?;
        ensure!(self.provider_timeout_ms > 0, "provider_timeout_ms must be positive");
        ensure!(self.audit_capacity > 0, "audit_capacity must be at least 1");
        Ok(())
    }
}

/// How much of each decision is written to the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditVerbosity {
    Off,
    #[default]
    Summary,
    Full,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Http(HttpVenueConfig),
    /// YAML fixture book; every venue in it is registered
    Fixture { path: String },
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(config::File::with_name(&path));
        }
        let cfg = builder
            .add_source(config::Environment::with_prefix("ROUTER").separator("__"))
            .build()?;
        Self::from_config(cfg)
    }

    /// Parse an inline YAML document (used by tests and embedders).
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?;
        Self::from_config(cfg)
    }

    fn from_config(cfg: config::Config) -> Result<Self> {
        let app: AppConfig = cfg.try_deserialize().context("deserialize configuration")?;
        app.routing.validate().context("validate routing configuration")?;
        Ok(app)
    }

    /// Instantiate the configured providers, or the bundled demo venues.
    pub fn build_registry(&self) -> Result<ProviderRegistry> {
        let mut builder = ProviderRegistry::builder();
        if self.providers.is_empty() {
            for venue in load_venues(DEMO_BOOK).context("load bundled demo venues")? {
                builder.register(Arc::new(venue))?;
            }
            return Ok(builder.build());
        }

        for provider in &self.providers {
            match provider {
                ProviderConfig::Http(venue) => {
                    let p: Arc<dyn LiquidityProvider> = Arc::new(
                        HttpTickerProvider::new(venue.clone())
                            .with_context(|| format!("initialize venue {}", venue.name))?,
                    );
                    builder.register(p)?;
                }
                ProviderConfig::Fixture { path } => {
                    for venue in load_venues_file(path)? {
                        builder.register(Arc::new(venue))?;
                    }
                }
            }
        }
        Ok(builder.build())
    }
}
