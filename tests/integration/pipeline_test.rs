//! End-to-end poll cycles against a mocked exchange

use market_stats::api::{BinanceClient, BinanceConfig, CachingClient, SharedClient};
use market_stats::cache::Published;
use market_stats::config::MarketConfig;
use market_stats::market::{symbols_of, DeltaSign, MarketDataService};
use market_stats::poller::{MarketSnapshot, Poller};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> MarketConfig {
    MarketConfig {
        volume_quote_asset: "BTC".to_string(),
        trade_count_quote_asset: "USDT".to_string(),
        top_limit: 2,
        notional_depth: 500,
        notional_levels: 200,
        spread_depth: 5,
    }
}

async fn mount_reference_data(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "UTC",
            "serverTime": 0,
            "symbols": [
                {"symbol": "ETHBTC", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "BTC"},
                {"symbol": "LTCBTC", "status": "TRADING", "baseAsset": "LTC", "quoteAsset": "BTC"},
                {"symbol": "DOGEBTC", "status": "TRADING", "baseAsset": "DOGE", "quoteAsset": "BTC"},
                {"symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT"},
                {"symbol": "ETHUSDT", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "USDT"}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "ETHBTC", "volume": "500", "count": 10, "lastPrice": "0.05"},
            {"symbol": "LTCBTC", "volume": "300", "count": 20, "lastPrice": "0.001"},
            {"symbol": "DOGEBTC", "volume": "100", "count": 30, "lastPrice": "0.000001"},
            {"symbol": "BTCUSDT", "volume": "50", "count": 9000, "lastPrice": "60000"},
            {"symbol": "ETHUSDT", "volume": "700", "count": 8000, "lastPrice": "3000"}
        ])))
        .mount(server)
        .await;
}

async fn mount_book(server: &MockServer, symbol: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn book(bid: &str, ask: &str) -> Value {
    json!({"lastUpdateId": 1, "bids": [[bid, "2"]], "asks": [[ask, "1"]]})
}

async fn mount_books(server: &MockServer, btcusdt_ask: &str) {
    mount_book(server, "ETHBTC", book("0.050", "0.051")).await;
    mount_book(server, "LTCBTC", book("0.0010", "0.0011")).await;
    mount_book(server, "BTCUSDT", book("60000.00", btcusdt_ask)).await;
    mount_book(server, "ETHUSDT", book("3000.00", "3000.25")).await;
}

async fn poller(server: &MockServer) -> (Poller, Arc<Published<MarketSnapshot>>) {
    let binance = BinanceClient::with_config(BinanceConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let client: SharedClient = Arc::new(CachingClient::new(
        Arc::new(binance),
        Duration::from_secs(600),
        Duration::from_secs(1),
    ));
    let service = MarketDataService::new(client, settings(), Duration::from_secs(300))
        .await
        .unwrap();

    let published = Arc::new(Published::new(Duration::from_secs(30)));
    let poller = Poller::new(Arc::new(service), Duration::from_secs(10), published.clone());
    (poller, published)
}

#[tokio::test]
async fn test_cycle_publishes_all_views() {
    let server = MockServer::start().await;
    mount_reference_data(&server).await;
    mount_books(&server, "60000.50").await;

    let (mut poller, published) = poller(&server).await;
    assert_ok!(poller.run_cycle().await);

    let snapshot = published.latest().unwrap();
    assert_eq!(symbols_of(&snapshot.top_volumes), vec!["ETHBTC", "LTCBTC"]);
    assert_eq!(symbols_of(&snapshot.top_trade_counts), vec!["BTCUSDT", "ETHUSDT"]);

    let eth = snapshot.notional("ETHBTC").unwrap();
    assert_eq!(eth.asks_total, dec!(0.051));
    assert_eq!(eth.bids_total, dec!(0.1));

    let btc = snapshot.spread("BTCUSDT").unwrap();
    assert_eq!(btc.snapshot.spread, dec!(0.5));
    assert_eq!(btc.sign, DeltaSign::Zero);
    assert_eq!(snapshot.spread("ETHUSDT").unwrap().snapshot.spread, dec!(0.25));
}

#[tokio::test]
async fn test_second_cycle_tracks_spread_delta() {
    let server = MockServer::start().await;
    mount_reference_data(&server).await;
    mount_books(&server, "60000.50").await;

    let (mut poller, published) = poller(&server).await;
    assert_ok!(poller.run_cycle().await);

    server.reset().await;
    mount_reference_data(&server).await;
    mount_books(&server, "60000.80").await;
    assert_ok!(poller.run_cycle().await);

    let snapshot = published.latest().unwrap();
    let btc = snapshot.spread("BTCUSDT").unwrap();
    assert_eq!(btc.snapshot.spread, dec!(0.8));
    assert_eq!(btc.delta, dec!(0.3));
    assert_eq!(btc.to_string(), "BTCUSDT: 0.8 (+0.3)");

    let eth = snapshot.spread("ETHUSDT").unwrap();
    assert_eq!(eth.sign, DeltaSign::Zero);
}

#[tokio::test]
async fn test_failed_cycle_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    mount_reference_data(&server).await;
    mount_books(&server, "60000.50").await;

    let (mut poller, published) = poller(&server).await;
    let first = assert_ok!(poller.run_cycle().await);

    server.reset().await;
    mount_reference_data(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"code": -1003, "msg": "Too many requests."})),
        )
        .mount(&server)
        .await;

    assert_err!(poller.run_cycle().await);
    let latest = published.latest().unwrap();
    assert_eq!(latest.cycle_id, first.cycle_id);
}

#[tokio::test]
async fn test_empty_book_side_aborts_cycle() {
    let server = MockServer::start().await;
    mount_reference_data(&server).await;
    mount_book(&server, "ETHBTC", book("0.050", "0.051")).await;
    mount_book(&server, "LTCBTC", book("0.0010", "0.0011")).await;
    mount_book(&server, "ETHUSDT", book("3000.00", "3000.25")).await;
    mount_book(
        &server,
        "BTCUSDT",
        json!({"lastUpdateId": 1, "bids": [], "asks": [["60000.50", "1"]]}),
    )
    .await;

    let (mut poller, published) = poller(&server).await;
    assert_err!(poller.run_cycle().await);
    assert!(published.latest().is_none());
    assert!(poller.state().is_empty());
}

#[tokio::test]
async fn test_startup_fails_without_exchange_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let binance = BinanceClient::with_config(BinanceConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let result = MarketDataService::new(Arc::new(binance), settings(), Duration::from_secs(300)).await;
    assert!(result.is_err());
}
