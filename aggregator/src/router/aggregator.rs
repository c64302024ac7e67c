// Quote aggregation
// Fans a request out to every registered provider concurrently and collects
// exactly one outcome per provider. Errors, timeouts, panics and malformed
// quotes are contained to the provider that produced them.
//
// Numan Thabit 2025 Nov

use crate::metrics::{PROVIDER_FAILURES, PROVIDER_LATENCY};
use crate::venues::{LiquidityProvider, ProviderOutcome, QuoteRequest};
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Query all providers and wait for every one of them. Outcomes come back in
/// registration order.
pub async fn aggregate(
    providers: &[Arc<dyn LiquidityProvider>],
    req: &QuoteRequest,
    timeout: Duration,
) -> Vec<ProviderOutcome> {
    join_all(
        providers
            .iter()
            .map(|provider| query_provider(provider.as_ref(), req, timeout)),
    )
    .await
}

async fn query_provider(
    provider: &dyn LiquidityProvider,
    req: &QuoteRequest,
    timeout: Duration,
) -> ProviderOutcome {
    let name = provider.name().to_string();
    let started = Instant::now();
    let call = AssertUnwindSafe(provider.get_quote(req)).catch_unwind();

    let result = match tokio::time::timeout(timeout, call).await {
        Err(_) => Err(format!("timed out after {}ms", timeout.as_millis())),
        Ok(Err(panic)) => Err(format!("provider panicked: {}", panic_message(&*panic))),
        Ok(Ok(Err(err))) => Err(format!("{err:#}")),
        Ok(Ok(Ok(quote))) => quote.check().and_then(|_| {
            if quote.source == name {
                Ok(quote)
            } else {
                Err(format!("quote source {:?} does not match provider {name}", quote.source))
            }
        }),
    };

    let elapsed = started.elapsed();
    PROVIDER_LATENCY
        .with_label_values(&[name.as_str()])
        .observe(elapsed.as_secs_f64());

    if let Err(reason) = &result {
        PROVIDER_FAILURES.with_label_values(&[name.as_str()]).inc();
        debug!(
            provider = %name,
            pair = %req.pair(),
            reason = %reason,
            "provider returned no usable quote"
        );
    }

    ProviderOutcome {
        provider: name,
        result,
        latency_ms: elapsed.as_millis() as u64,
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
