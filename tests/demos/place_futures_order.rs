//! Order placement on the futures testnet
//!
//! Places a limit buy well below market so it rests on the book, checks
//! its status, then cancels it. Validation happens locally before any
//! request is sent.

use fapi_core::prelude::*;
use fapi_exchanges::binance::{FuturesConfig, FuturesRestClient, OrderRef};
use fapi_exchanges::prelude::*;
use rust_decimal::Decimal;
use tracing::{error, info};

#[monoio::main(enable_timer = true)]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    info!("🚀 Starting futures order placement demo");

    let config = match FuturesConfig::testnet().with_env_credentials() {
        Ok(config) => {
            info!("✅ API credentials loaded");
            config
        }
        Err(e) => {
            error!("❌ Failed to load API credentials: {}", e);
            return Err(e.into());
        }
    };
    let client = FuturesRestClient::new(config)?;

    info!("\n💱 Getting BTCUSDT price...");
    let current_price = client.price("BTCUSDT").await?;
    info!("📈 Current price: ${}", current_price);

    // 10% below market so the order rests instead of filling
    let buy_price = (current_price * Decimal::new(90, 2)).round_dp(1);
    info!("🎯 Buy order price: ${} (10% below market)", buy_price);

    info!("\n📝 Building LIMIT BUY order...");
    let intent = OrderIntent::build(
        "BTCUSDT",
        OrderSide::Buy,
        OrderType::Limit,
        OrderFields {
            quantity: Some(Decimal::new(1, 3)), // 0.001 BTC
            price: Some(buy_price),
            client_order_id: Some(client.new_client_order_id()),
            ..OrderFields::default()
        },
    )?;

    // Cheap local sanity check against the symbol's grid before sending
    if let Some(symbol_info) = client.symbol_info("BTCUSDT").await? {
        intent.check_filters(&symbol_info.symbol_filters()?)?;
    }

    let ack = client.place_order(&intent).await?;
    info!("✅ Order placed!");
    info!("   Order ID:        {}", ack.order_id);
    info!("   Client order ID: {}", ack.client_order_id);
    info!("   Status:          {}", ack.status);
    info!("   Price:           ${}", ack.price);

    info!("\n🔍 Checking order status...");
    let status = client
        .order_status("BTCUSDT", OrderRef::Id(ack.order_id))
        .await?;
    info!("   Status: {} (executed {})", status.status, status.executed_qty);

    info!("\n❌ Canceling the order...");
    let canceled = client
        .cancel_order("BTCUSDT", OrderRef::Id(ack.order_id))
        .await?;
    info!("   Final status: {}", canceled.status);

    info!("\n✅ Demo complete");
    Ok(())
}
