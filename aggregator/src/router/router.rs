// Router orchestration
// Ties aggregation, scoring, strategy selection and the decision journal
// together into a single routing call
//
// Numan Thabit 2025 Nov

use crate::config::{AuditVerbosity, RoutingConfig};
use crate::errors::RouterError;
use crate::metrics::ROUTE_DECISIONS;
use crate::router::aggregator::{aggregate, panic_message};
use crate::router::journal::{DecisionJournal, DecisionRecord};
use crate::router::routes::RoutingDecision;
use crate::router::scoring::score;
use crate::router::selector::RouteSelector;
use crate::router::validation::validate_request;
use crate::venues::{ProviderOutcome, ProviderRegistry, ProviderStatus, QuoteRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(2_500);

/// Routing counters for monitoring
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterStats {
    pub total_routes: u64,
    pub successful_routes: u64,
    pub failed_routes: u64,
    pub success_rate: f64,
    pub providers: Vec<String>,
}

/// Smart hybrid liquidity router.
///
/// Providers are injected at construction; the journal is owned per router
/// unless one is shared in with [`Router::with_journal`].
pub struct Router {
    registry: ProviderRegistry,
    selector: RouteSelector,
    journal: Arc<DecisionJournal>,
    provider_timeout: Duration,
    verbosity: AuditVerbosity,
    total_routes: AtomicU64,
    successful_routes: AtomicU64,
    failed_routes: AtomicU64,
}

impl Router {
    pub fn new(registry: ProviderRegistry, selector: RouteSelector) -> Self {
        Self {
            registry,
            selector,
            journal: Arc::new(DecisionJournal::default()),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            verbosity: AuditVerbosity::default(),
            total_routes: AtomicU64::new(0),
            successful_routes: AtomicU64::new(0),
            failed_routes: AtomicU64::new(0),
        }
    }

    pub fn from_config(registry: ProviderRegistry, config: &RoutingConfig) -> Self {
        Self::new(
            registry,
            RouteSelector::new(config.thresholds(), config.enabled),
        )
        .with_journal(Arc::new(DecisionJournal::new(config.audit_capacity)))
        .with_provider_timeout(config.provider_timeout())
        .with_audit_verbosity(config.audit_verbosity)
    }

    pub fn with_journal(mut self, journal: Arc<DecisionJournal>) -> Self {
        self.journal = journal;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_audit_verbosity(mut self, verbosity: AuditVerbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn journal(&self) -> &Arc<DecisionJournal> {
        &self.journal
    }

    /// Price `req` across every provider and decide how to execute it.
    ///
    /// Every call that runs to completion leaves exactly one record in the
    /// journal. A call dropped before completion leaves none.
    #[tracing::instrument(skip_all, fields(pair = %req.pair(), side = %req.side, notional_usd = req.notional_usd))]
    pub async fn route_quote(&self, req: &QuoteRequest) -> Result<RoutingDecision, RouterError> {
        let started = Instant::now();
        let timestamp = Utc::now();

        if let Err(err) = validate_request(req).into_result() {
            self.finish(req, timestamp, started, &Err(err.clone()), Vec::new())
                .await;
            return Err(err);
        }

        let outcomes = aggregate(self.registry.providers(), req, self.provider_timeout).await;
        let statuses: Vec<ProviderStatus> = outcomes.iter().map(ProviderOutcome::status).collect();

        let decided = catch_unwind(AssertUnwindSafe(|| {
            let candidates = score(&outcomes, req.side);
            if candidates.is_empty() {
                return Err(RouterError::NoCandidates {
                    providers: Vec::new(),
                });
            }
            self.selector
                .select(&candidates, req.notional_usd, req.side)
        }));
        let result = match decided {
            Ok(result) => result,
            Err(panic) => Err(RouterError::routing(format!(
                "route selection panicked: {}",
                panic_message(&*panic)
            ))),
        }
        .map_err(|err| err.with_providers(statuses.clone()));

        self.finish(req, timestamp, started, &result, statuses).await;
        result
    }

    /// Most recent decisions, newest first.
    pub async fn recent_decisions(&self, limit: usize) -> Vec<DecisionRecord> {
        self.journal.recent(limit).await
    }

    pub fn stats(&self) -> RouterStats {
        let total = self.total_routes.load(Ordering::Relaxed);
        let successful = self.successful_routes.load(Ordering::Relaxed);
        let failed = self.failed_routes.load(Ordering::Relaxed);
        RouterStats {
            total_routes: total,
            successful_routes: successful,
            failed_routes: failed,
            success_rate: if total > 0 {
                successful as f64 / total as f64
            } else {
                0.0
            },
            providers: self.registry.names().into_iter().map(String::from).collect(),
        }
    }

    async fn finish(
        &self,
        req: &QuoteRequest,
        timestamp: DateTime<Utc>,
        started: Instant,
        result: &Result<RoutingDecision, RouterError>,
        providers: Vec<ProviderStatus>,
    ) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let record = DecisionRecord {
            timestamp,
            request: req.clone(),
            success: result.is_ok(),
            strategy: result.as_ref().ok().map(|d| d.strategy),
            chosen_source: result.as_ref().ok().map(|d| d.chosen.source.clone()),
            code: result.as_ref().err().map(|e| e.code().to_string()),
            providers,
            elapsed_ms,
        };

        // Nothing is logged or counted for a call dropped before its record lands.
        self.journal.record(record.clone()).await;
        self.log_decision(&record, result);

        self.total_routes.fetch_add(1, Ordering::Relaxed);
        match result {
            Ok(decision) => {
                self.successful_routes.fetch_add(1, Ordering::Relaxed);
                ROUTE_DECISIONS
                    .with_label_values(&[decision.strategy.as_str(), "success", "none"])
                    .inc();
            }
            Err(err) => {
                self.failed_routes.fetch_add(1, Ordering::Relaxed);
                ROUTE_DECISIONS
                    .with_label_values(&["none", "failure", err.code()])
                    .inc();
            }
        }
    }

    fn log_decision(&self, record: &DecisionRecord, result: &Result<RoutingDecision, RouterError>) {
        let ok_providers = record.providers.iter().filter(|p| p.ok).count();
        match (self.verbosity, result) {
            (AuditVerbosity::Off, _) => {}
            (AuditVerbosity::Summary, Ok(decision)) => info!(
                strategy = %decision.strategy,
                chosen = %decision.chosen.source,
                total_cost_bps = decision.chosen.total_cost_bps,
                providers_ok = ok_providers,
                providers = record.providers.len(),
                elapsed_ms = record.elapsed_ms,
                "route decided"
            ),
            (AuditVerbosity::Full, Ok(decision)) => info!(
                strategy = %decision.strategy,
                chosen = ?decision.chosen,
                splits = ?decision.splits,
                candidates = ?decision.candidates,
                providers = ?record.providers,
                elapsed_ms = record.elapsed_ms,
                "route decided"
            ),
            (AuditVerbosity::Summary, Err(err)) => warn!(
                code = err.code(),
                error = %err,
                providers_ok = ok_providers,
                providers = record.providers.len(),
                elapsed_ms = record.elapsed_ms,
                "route failed"
            ),
            (AuditVerbosity::Full, Err(err)) => warn!(
                code = err.code(),
                error = %err,
                providers = ?record.providers,
                elapsed_ms = record.elapsed_ms,
                "route failed"
            ),
        }
    }
}
