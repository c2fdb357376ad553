//! Offline tests for the futures REST layer
//!
//! Signing, query-string formatting, configuration, and response parsing
//! are all testable without touching the network. The credential tests
//! mutate process environment variables and run serially.

use fapi_core::client_order_id;
use fapi_exchanges::binance::auth::{build_query_string, Credentials, RequestSigner};
use fapi_exchanges::binance::{FuturesConfig, OrderAck, SymbolInfo, MAINNET_URL, TESTNET_URL};
use fapi_exchanges::prelude::*;
use rstest::*;
use rust_decimal_macros::dec;
use serial_test::serial;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_mainnet_is_the_default() {
    let config = FuturesConfig::default();
    assert_eq!(config.base_url, MAINNET_URL);
    assert!(!config.testnet);
    assert_eq!(config.recv_window, 5000);
}

#[test]
fn test_testnet_builder_chain() {
    let config = FuturesConfig::testnet()
        .with_credentials("key".to_string(), "secret".to_string())
        .with_recv_window(10_000);
    assert_eq!(config.base_url, TESTNET_URL);
    assert!(config.testnet);
    assert_eq!(config.api_key, "key");
    assert_eq!(config.recv_window, 10_000);
}

#[test]
#[serial]
fn test_env_credentials_round_trip() {
    std::env::set_var("BINANCE_API_KEY", "env-key");
    std::env::set_var("BINANCE_SECRET_KEY", "env-secret");
    let config = FuturesConfig::testnet().with_env_credentials().unwrap();
    assert_eq!(config.api_key, "env-key");
    assert_eq!(config.secret_key, "env-secret");
    std::env::remove_var("BINANCE_API_KEY");
    std::env::remove_var("BINANCE_SECRET_KEY");
}

#[test]
#[serial]
fn test_missing_env_credentials_is_an_error() {
    std::env::remove_var("BINANCE_API_KEY");
    std::env::remove_var("BINANCE_SECRET_KEY");
    let result = Credentials::from_env();
    assert!(matches!(result, Err(ClientError::MissingCredentials(_))));
}

// ============================================================================
// SIGNING
// ============================================================================

#[fixture]
fn signer() -> RequestSigner {
    RequestSigner::new(Credentials::new(
        "test-api-key".to_string(),
        "test-secret-key".to_string(),
    ))
    .unwrap()
}

#[rstest]
fn test_signature_is_hex_sha256(signer: RequestSigner) {
    let sig = signer.sign("symbol=BTCUSDT&timestamp=1").unwrap();
    assert_eq!(sig.len(), 64);
    assert!(sig.bytes().all(|b| b.is_ascii_hexdigit()));
}

#[rstest]
fn test_signature_is_deterministic(signer: RequestSigner) {
    let a = signer.sign("symbol=BTCUSDT").unwrap();
    let b = signer.sign("symbol=BTCUSDT").unwrap();
    let c = signer.sign("symbol=ETHUSDT").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[rstest]
fn test_signed_query_carries_timestamp_and_signature(signer: RequestSigner) {
    let params = vec![("symbol", "BTCUSDT".to_string())];
    let query = signer.signed_query(&params, 5000).unwrap();
    assert!(query.contains("symbol=BTCUSDT"));
    assert!(query.contains("recvWindow=5000"));
    assert!(query.contains("timestamp="));
    assert!(query.ends_with(|c: char| c.is_ascii_hexdigit()));
    assert!(query.contains("&signature="));
}

#[test]
fn test_query_string_is_sorted_and_encoded() {
    let params = vec![
        ("symbol", "BTCUSDT".to_string()),
        ("newClientOrderId", "a b".to_string()),
        ("quantity", "0.001".to_string()),
    ];
    assert_eq!(
        build_query_string(&params),
        "newClientOrderId=a%20b&quantity=0.001&symbol=BTCUSDT"
    );
}

#[test]
fn test_empty_credentials_rejected() {
    let result = RequestSigner::new(Credentials::new(String::new(), String::new()));
    assert!(matches!(result, Err(ClientError::InvalidCredentials)));
}

// ============================================================================
// WIRE FORMAT END TO END (intent params through the signed query)
// ============================================================================

#[rstest]
fn test_order_params_survive_signing(signer: RequestSigner) {
    let intent = OrderIntent::limit("btcusdt", OrderSide::Buy, dec!(0.001), dec!(50000)).unwrap();
    let query = signer.signed_query(&intent.to_params(), 5000).unwrap();

    assert!(query.contains("symbol=BTCUSDT"));
    assert!(query.contains("side=BUY"));
    assert!(query.contains("type=LIMIT"));
    assert!(query.contains("quantity=0.001"));
    assert!(query.contains("price=50000"));
    assert!(query.contains("timeInForce=GTC"));
    assert!(query.contains("positionSide=BOTH"));
    assert!(!query.contains("stopPrice"));
    assert!(!query.contains("closePosition"));
}

#[test]
fn test_client_order_id_fits_the_exchange_limit() {
    for _ in 0..100 {
        let id = client_order_id();
        assert!(id.len() <= 36, "{id} is too long");
        assert!(id.starts_with("FAP"));
        assert!(!id.contains('-'));
    }
}

// ============================================================================
// RESPONSE PARSING
// ============================================================================

#[test]
fn test_order_ack_parses_exchange_payload() {
    let body = r#"{
        "orderId": 4077ime,
        "symbol": "BTCUSDT"
    }"#;
    // Deliberately malformed JSON must fail cleanly, not panic
    assert!(serde_json::from_str::<OrderAck>(body).is_err());

    let body = r#"{
        "orderId": 4077043582,
        "symbol": "BTCUSDT",
        "status": "NEW",
        "clientOrderId": "FAPabc123",
        "price": "50000.00",
        "avgPrice": "0.00",
        "origQty": "0.001",
        "executedQty": "0",
        "cumQty": "0",
        "cumQuote": "0",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "reduceOnly": false,
        "closePosition": false,
        "side": "BUY",
        "positionSide": "BOTH",
        "stopPrice": "0",
        "workingType": "CONTRACT_PRICE",
        "priceProtect": false,
        "origType": "LIMIT",
        "updateTime": 1695000000000
    }"#;
    let ack: OrderAck = serde_json::from_str(body).unwrap();
    assert_eq!(ack.order_id, 4077043582);
    assert_eq!(ack.symbol, "BTCUSDT");
    assert_eq!(ack.status, OrderStatus::New);
    assert_eq!(ack.side, OrderSide::Buy);
    assert_eq!(ack.order_type, OrderType::Limit);
    assert_eq!(ack.price, dec!(50000.00));
}

#[test]
fn test_symbol_filters_extracted_from_exchange_info() {
    let body = r#"{
        "symbol": "BTCUSDT",
        "status": "TRADING",
        "baseAsset": "BTC",
        "quoteAsset": "USDT",
        "pricePrecision": 2,
        "quantityPrecision": 3,
        "filters": [
            {"filterType": "PRICE_FILTER", "tickSize": "0.10", "minPrice": "556.80", "maxPrice": "4529764"},
            {"filterType": "LOT_SIZE", "stepSize": "0.001", "minQty": "0.001", "maxQty": "1000"}
        ]
    }"#;
    let info: SymbolInfo = serde_json::from_str(body).unwrap();
    let filters = info.symbol_filters().unwrap();
    assert_eq!(filters.tick_size, dec!(0.10));
    assert_eq!(filters.step_size, dec!(0.001));
    assert_eq!(filters.min_qty, dec!(0.001));

    // An intent built against those filters validates on the same grid
    let intent = OrderIntent::limit("BTCUSDT", OrderSide::Buy, dec!(0.002), dec!(50000.10)).unwrap();
    assert!(intent.check_filters(&filters).is_ok());
}
