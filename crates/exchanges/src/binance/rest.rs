//! USDⓈ-M Futures REST client
//!
//! Thin wrappers over the `/fapi` endpoints: every method formats
//! parameters, signs where required, and passes the exchange's response
//! through. Order construction and validation live in [`crate::order`];
//! by the time an [`OrderIntent`] reaches [`FuturesRestClient::place_order`]
//! it is already known to be well-formed.

use crate::binance::auth::{Credentials, RequestSigner};
use crate::binance::types::{
    AccountBalance, ApiErrorBody, CancelAllAck, ExchangeInfo, FuturesAccountInfo, OrderAck,
    OrderQuery, PositionRisk, PriceTicker, SymbolInfo,
};
use crate::errors::{ClientError, Result};
use crate::http::HttpsClient;
use crate::order::OrderIntent;
use crate::types::OrderSide;
use fapi_core::{client_order_id, PerfTimer};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

pub const MAINNET_URL: &str = "https://fapi.binance.com";
pub const TESTNET_URL: &str = "https://demo-fapi.binance.com";

/// Futures client configuration
#[derive(Debug, Clone)]
pub struct FuturesConfig {
    pub api_key: String,
    pub secret_key: String,
    pub base_url: String,
    pub testnet: bool,
    /// Signed request validity window in milliseconds
    pub recv_window: u64,
}

impl Default for FuturesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            base_url: MAINNET_URL.to_string(),
            testnet: false,
            recv_window: 5000,
        }
    }
}

impl FuturesConfig {
    pub fn testnet() -> Self {
        Self {
            base_url: TESTNET_URL.to_string(),
            testnet: true,
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        self.api_key = api_key;
        self.secret_key = secret_key;
        self
    }

    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    pub fn with_env_credentials(mut self) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        self.api_key = credentials.api_key;
        self.secret_key = credentials.secret_key;
        Ok(self)
    }
}

/// Identify an existing order by exchange ID or by the client-supplied ID.
///
/// The exchange accepts either; making the choice an enum means a request
/// with neither cannot be expressed.
#[derive(Debug, Clone)]
pub enum OrderRef {
    Id(u64),
    ClientId(String),
}

impl OrderRef {
    fn push_param(&self, params: &mut Vec<(&'static str, String)>) {
        match self {
            OrderRef::Id(id) => params.push(("orderId", id.to_string())),
            OrderRef::ClientId(id) => params.push(("origClientOrderId", id.clone())),
        }
    }
}

/// REST client for USDⓈ-M Futures
pub struct FuturesRestClient {
    config: FuturesConfig,
    base_url: Url,
    signer: RequestSigner,
    https: HttpsClient,
}

impl FuturesRestClient {
    pub fn new(config: FuturesConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let signer = RequestSigner::new(Credentials::new(
            config.api_key.clone(),
            config.secret_key.clone(),
        ))?;
        let https = HttpsClient::new()?;

        info!("🔗 Futures REST client created");
        info!("   Base URL: {}", base_url);
        info!("   Testnet: {}", config.testnet);

        Ok(Self {
            config,
            base_url,
            signer,
            https,
        })
    }

    /// Test connectivity
    pub async fn ping(&self) -> Result<()> {
        let _: serde_json::Value = self.get("/fapi/v1/ping", &[]).await?;
        Ok(())
    }

    /// Exchange server time in milliseconds
    pub async fn server_time(&self) -> Result<u64> {
        let response: serde_json::Value = self.get("/fapi/v1/time", &[]).await?;
        response["serverTime"]
            .as_u64()
            .ok_or_else(|| ClientError::InvalidResponse("missing serverTime".to_string()))
    }

    /// Full account state
    pub async fn account_info(&self) -> Result<FuturesAccountInfo> {
        self.signed("GET", "/fapi/v2/account", &[]).await
    }

    /// Condensed balance view of the account
    pub async fn balance(&self) -> Result<AccountBalance> {
        Ok(self.account_info().await?.into())
    }

    /// Position risk rows, optionally narrowed to one symbol
    pub async fn position_info(&self, symbol: Option<&str>) -> Result<Vec<PositionRisk>> {
        let mut params = Vec::new();
        if let Some(symbol) = symbol {
            params.push(("symbol", symbol.to_ascii_uppercase()));
        }
        self.signed("GET", "/fapi/v2/positionRisk", &params).await
    }

    /// Exchange trading rules and symbol metadata
    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.get("/fapi/v1/exchangeInfo", &[]).await
    }

    /// Trading rules for one symbol, if listed
    pub async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>> {
        let symbol = symbol.to_ascii_uppercase();
        let info = self.exchange_info().await?;
        Ok(info.symbols.into_iter().find(|s| s.symbol == symbol))
    }

    /// Last traded price
    pub async fn price(&self, symbol: &str) -> Result<Decimal> {
        let params = [("symbol", symbol.to_ascii_uppercase())];
        let ticker: PriceTicker = self.get("/fapi/v1/ticker/price", &params).await?;
        Ok(ticker.price)
    }

    /// Submit a validated order
    pub async fn place_order(&self, intent: &OrderIntent) -> Result<OrderAck> {
        debug!(
            "📝 Placing {} {} {} order",
            intent.side(),
            intent.symbol(),
            intent.order_type()
        );
        let ack: OrderAck = self
            .signed("POST", "/fapi/v1/order", &intent.to_params())
            .await?;
        info!(
            "📋 ORDER PLACED: {} {} {} (id {})",
            ack.side, ack.symbol, ack.order_type, ack.order_id
        );
        Ok(ack)
    }

    /// Cancel one active order
    pub async fn cancel_order(&self, symbol: &str, order: OrderRef) -> Result<OrderQuery> {
        let mut params = vec![("symbol", symbol.to_ascii_uppercase())];
        order.push_param(&mut params);
        let canceled: OrderQuery = self.signed("DELETE", "/fapi/v1/order", &params).await?;
        info!("❌ ORDER CANCELED: {} (id {})", canceled.symbol, canceled.order_id);
        Ok(canceled)
    }

    /// Cancel every active order on a symbol
    pub async fn cancel_all_orders(&self, symbol: &str) -> Result<CancelAllAck> {
        let params = [("symbol", symbol.to_ascii_uppercase())];
        self.signed("DELETE", "/fapi/v1/allOpenOrders", &params)
            .await
    }

    /// Current state of one order
    pub async fn order_status(&self, symbol: &str, order: OrderRef) -> Result<OrderQuery> {
        let mut params = vec![("symbol", symbol.to_ascii_uppercase())];
        order.push_param(&mut params);
        self.signed("GET", "/fapi/v1/order", &params).await
    }

    /// All open orders, optionally narrowed to one symbol
    pub async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<OrderQuery>> {
        let mut params = Vec::new();
        if let Some(symbol) = symbol {
            params.push(("symbol", symbol.to_ascii_uppercase()));
        }
        self.signed("GET", "/fapi/v1/openOrders", &params).await
    }

    /// Market buy convenience wrapper
    pub async fn buy_market(&self, symbol: &str, quantity: Decimal) -> Result<OrderAck> {
        let intent = OrderIntent::market(symbol, OrderSide::Buy, quantity)?;
        self.place_order(&intent).await
    }

    /// Market sell convenience wrapper
    pub async fn sell_market(&self, symbol: &str, quantity: Decimal) -> Result<OrderAck> {
        let intent = OrderIntent::market(symbol, OrderSide::Sell, quantity)?;
        self.place_order(&intent).await
    }

    /// GTC limit buy convenience wrapper
    pub async fn buy_limit(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderAck> {
        let intent = OrderIntent::limit(symbol, OrderSide::Buy, quantity, price)?;
        self.place_order(&intent).await
    }

    /// GTC limit sell convenience wrapper
    pub async fn sell_limit(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderAck> {
        let intent = OrderIntent::limit(symbol, OrderSide::Sell, quantity, price)?;
        self.place_order(&intent).await
    }

    /// Fresh client order ID within the exchange's length limit
    pub fn new_client_order_id(&self) -> String {
        client_order_id()
    }

    /// Unsigned GET request
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let timer = PerfTimer::start(format!("fapi_get_{endpoint}"));

        let mut url = self.base_url.clone();
        url.set_path(endpoint);
        if !params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in params {
                query_pairs.append_pair(key, value);
            }
        }

        debug!("📡 GET {}", url);
        let response = self.https.request("GET", url.as_str(), &[]).await?;
        timer.log_elapsed();

        Self::decode(response.status, &response.body)
    }

    /// Signed request; parameters go in the query string along with
    /// `timestamp`, `recvWindow` and the HMAC signature
    async fn signed<T: DeserializeOwned>(
        &self,
        method: &str,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let timer = PerfTimer::start(format!("fapi_signed_{endpoint}"));

        let query = self.signer.signed_query(params, self.config.recv_window)?;
        let mut url = self.base_url.clone();
        url.set_path(endpoint);
        url.set_query(Some(&query));

        debug!("📡 {} {} (signed)", method, endpoint);
        let headers = [("X-MBX-APIKEY", self.signer.api_key())];
        let response = self.https.request(method, url.as_str(), &headers).await?;
        timer.log_elapsed();

        Self::decode(response.status, &response.body)
    }

    /// Turn an exchange response into a typed value or a structured error
    fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
        if !(200..300).contains(&status) {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(body) {
                return Err(ClientError::Api {
                    code: api_error.code,
                    msg: api_error.msg,
                });
            }
            return Err(ClientError::Http(status, body.to_string()));
        }
        serde_json::from_str(body)
            .map_err(|e| ClientError::Serialization(format!("{e}: {body}")))
    }
}
