//! Integration tests for the Binance REST client

use market_stats::api::{ApiClient, BinanceClient, BinanceConfig};
use market_stats::Error;
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> BinanceClient {
    BinanceClient::with_config(BinanceConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_exchange_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "UTC",
            "serverTime": 1700000000000i64,
            "rateLimits": [],
            "symbols": [
                {
                    "symbol": "ETHBTC",
                    "status": "TRADING",
                    "baseAsset": "ETH",
                    "quoteAsset": "BTC",
                    "filters": [{"filterType": "PRICE_FILTER", "tickSize": "0.00001000"}]
                }
            ]
        })))
        .mount(&server)
        .await;

    let info = client(&server).exchange_info().await.unwrap();
    assert_eq!(info.symbols.len(), 1);
    assert_eq!(info.symbols[0].quote_asset, "BTC");
    assert_eq!(info.symbols[0].filters[0].filter_type, "PRICE_FILTER");
}

#[tokio::test]
async fn test_ticker_statistics_all_symbols() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "ETHBTC", "volume": "1234.50000000", "count": 4200, "lastPrice": "0.05123000"},
            {"symbol": "BNBBTC", "volume": "99.00000000", "count": 17, "lastPrice": "0.00900000"}
        ])))
        .mount(&server)
        .await;

    let tickers = client(&server).ticker_statistics(None).await.unwrap();
    assert_eq!(tickers.len(), 2);
    assert_eq!(tickers[0].volume, dec!(1234.5));
    assert_eq!(tickers[0].trade_count, 4200);
    assert_eq!(tickers[1].last_price, dec!(0.009));
}

#[tokio::test]
async fn test_ticker_statistics_single_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .and(query_param("symbol", "ETHBTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"symbol": "ETHBTC", "volume": "10", "count": 3, "lastPrice": "0.05"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let tickers = client(&server)
        .ticker_statistics(Some("ETHBTC"))
        .await
        .unwrap();
    assert_eq!(tickers.len(), 1);
    assert_eq!(tickers[0].symbol, "ETHBTC");
}

#[tokio::test]
async fn test_order_book_depth_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("limit", "500"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-mbx-used-weight", "25")
                .set_body_json(json!({
                    "lastUpdateId": 1027024,
                    "bids": [["60000.00", "1.5"], ["59999.50", "2"]],
                    "asks": [["60000.10", "0.25"]]
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let book = client(&server).order_book("BTCUSDT", 500).await.unwrap();
    assert_eq!(book.symbol, "BTCUSDT");
    assert_eq!(book.last_update_id, 1027024);
    assert_eq!(book.best_bid(), Some(dec!(60000)));
    assert_eq!(book.best_ask(), Some(dec!(60000.1)));
    assert_eq!(book.bids.len(), 2);
}

#[tokio::test]
async fn test_upstream_error_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .mount(&server)
        .await;

    let result = client(&server).order_book("NOPE", 5).await;
    match result {
        Err(Error::Upstream {
            status,
            code,
            message,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(code, Some(-1121));
            assert_eq!(message, "Invalid symbol.");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client(&server).ticker_statistics(None).await;
    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_unparseable_decimal_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lastUpdateId": 1,
            "bids": [["abc", "1"]],
            "asks": []
        })))
        .mount(&server)
        .await;

    let result = client(&server).order_book("BTCUSDT", 5).await;
    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"symbols": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = BinanceClient::with_config(BinanceConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(50),
    })
    .unwrap();

    let result = client.exchange_info().await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
