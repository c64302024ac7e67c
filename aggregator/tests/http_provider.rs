use hybrid_router::router::{RouteSelector, Router};
use hybrid_router::venues::http::HttpVenueConfig;
use hybrid_router::venues::{HttpTickerProvider, LiquidityProvider, ProviderRegistry, QuoteRequest, Side};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn venue(server: &MockServer, name: &str) -> HttpVenueConfig {
    HttpVenueConfig {
        name: name.to_string(),
        url: format!("{}/api/v3/ticker/price?symbol={{base}}{{quote}}", server.uri()),
        price_pointer: "/price".to_string(),
        fee_bps: 10,
        liquidity_score: 0.9,
        est_confirm_ms: 1_000,
        request_timeout_ms: Some(1_000),
    }
}

#[tokio::test]
async fn quotes_from_ticker_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "XRPUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "XRPUSDT",
            "price": "0.52140000"
        })))
        .mount(&server)
        .await;

    let provider = HttpTickerProvider::new(venue(&server, "binance")).unwrap();
    let quote = provider
        .get_quote(&QuoteRequest::new("xrp", "usdt", Side::Buy, 500.0))
        .await
        .unwrap();

    assert_eq!(quote.source, "binance");
    assert_eq!(quote.price, 0.5214);
    assert_eq!(quote.fee_bps, 10);
    assert_eq!(quote.liquidity_score, 0.9);
}

#[tokio::test]
async fn upstream_error_status_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = HttpTickerProvider::new(venue(&server, "binance")).unwrap();
    let err = provider
        .get_quote(&QuoteRequest::new("XRP", "USDT", Side::Buy, 500.0))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn router_reports_http_failures_per_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("symbol", "XRPUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"price": 0.52})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("symbol", "XLMUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": -1121})))
        .mount(&server)
        .await;

    let mut builder = ProviderRegistry::builder();
    builder
        .register(Arc::new(HttpTickerProvider::new(venue(&server, "ticker")).unwrap()))
        .unwrap();
    let router = Router::new(builder.build(), RouteSelector::default());

    let decision = router
        .route_quote(&QuoteRequest::new("XRP", "USDT", Side::Buy, 100.0))
        .await
        .unwrap();
    assert_eq!(decision.chosen.source, "ticker");
    assert_eq!(decision.chosen.price, 0.52);

    let err = router
        .route_quote(&QuoteRequest::new("XLM", "USDT", Side::Buy, 100.0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NO_CANDIDATES");
    assert!(err.providers()[0].reason.as_deref().unwrap().contains("/price"));
}
