//! Basic futures testnet walkthrough
//!
//! Connects to the demo exchange, checks connectivity, and reads public
//! market data plus the account balance. Needs BINANCE_API_KEY and
//! BINANCE_SECRET_KEY in the environment or a .env file.

use fapi_core::prelude::*;
use fapi_exchanges::binance::{FuturesConfig, FuturesRestClient};
use tracing::{error, info};

#[monoio::main(enable_timer = true)]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    info!("🚀 Starting futures testnet walkthrough");

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

    info!("\n🏓 Pinging the exchange...");
    client.ping().await?;
    let server_time = client.server_time().await?;
    info!("✅ Server time: {} (local {})", server_time, millis());

    info!("\n💱 Getting BTCUSDT price...");
    let price = client.price("BTCUSDT").await?;
    info!("📈 Current price: ${}", price);

    info!("\n📏 Getting BTCUSDT trading rules...");
    if let Some(symbol_info) = client.symbol_info("BTCUSDT").await? {
        let filters = symbol_info.symbol_filters()?;
        info!("   Tick size: {}", filters.tick_size);
        info!("   Step size: {}", filters.step_size);
        info!("   Min qty:   {}", filters.min_qty);
    }

    info!("\n💰 Getting account balance...");
    let balance = client.balance().await?;
    info!("   Wallet balance:    {}", balance.total_wallet_balance);
    info!("   Unrealized PnL:    {}", balance.total_unrealized_profit);
    info!("   Available balance: {}", balance.available_balance);

    info!("\n📊 Checking open positions...");
    let positions = client.position_info(None).await?;
    let open: Vec<_> = positions.iter().filter(|p| p.is_open()).collect();
    if open.is_empty() {
        info!("   No open positions");
    }
    for position in open {
        info!(
            "   {} {}: {} @ {} (PnL {})",
            position.symbol,
            position.position_side,
            position.position_amt,
            position.entry_price,
            position.unrealized_profit
        );
    }

    info!("\n✅ Walkthrough complete");
    Ok(())
}
