use anyhow::{anyhow, Context, Result};
use hybrid_router::config::AppConfig;
use hybrid_router::router::api::create_api_router;
use hybrid_router::router::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal router error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration")?;

    if config.providers.is_empty() {
        warn!("no providers configured; serving bundled demo venues");
    }
    let registry = config
        .build_registry()
        .context("initialize liquidity providers")?;

    let thresholds = config.routing.thresholds();
    info!(
        providers = ?registry.names(),
        smart_routing = config.routing.enabled,
        large_trade_usd = thresholds.large_trade_usd,
        split_trade_usd = thresholds.split_trade_usd,
        provider_timeout_ms = config.routing.provider_timeout_ms,
        audit_capacity = config.routing.audit_capacity,
        "hybrid liquidity router configured"
    );

    let router = Arc::new(Router::from_config(registry, &config.routing));
    let api = create_api_router(router);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind API server address {addr}"))?;

    info!(address = %addr, "HTTP API server starting");
    axum::serve(listener, api)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP API")?;

    info!("router stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl_c listener error");
    }
    info!("Shutdown signal received, exiting");
}

fn init_tracing() -> Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,tower_http=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
