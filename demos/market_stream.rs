use gate_ws::model::{SpotTicker, SpotTrade};
use gate_ws::{channels, ConnectConfig, WsService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Public market data needs no credentials
    let service = WsService::connect(ConnectConfig::read_only()).await?;

    // Register callbacks before subscribing so no early push is lost
    service.set_callback(channels::SPOT_PUBLIC_TRADE, |msg| {
        if msg.event != "update" {
            return;
        }
        match msg.decode_result::<Vec<SpotTrade>>() {
            Ok(Some(trades)) => {
                for trade in trades {
                    println!(
                        "trade  {} {} {} @ {}",
                        trade.currency_pair, trade.side, trade.amount, trade.price
                    );
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("bad trade payload: {e}"),
        }
    });

    service.set_callback(channels::SPOT_TICKER, |msg| {
        if msg.event != "update" {
            return;
        }
        match msg.decode_result::<SpotTicker>() {
            Ok(Some(ticker)) => {
                println!(
                    "ticker {} last={} bid={} ask={}",
                    ticker.currency_pair, ticker.last, ticker.highest_bid, ticker.lowest_ask
                );
            }
            Ok(None) => {}
            Err(e) => eprintln!("bad ticker payload: {e}"),
        }
    });

    service
        .subscribe(channels::SPOT_PUBLIC_TRADE, &["BTC_USDT", "ETH_USDT"])
        .await?;
    service.subscribe(channels::SPOT_TICKER, &["BTC_USDT"]).await?;
    println!(
        "streaming {:?}, ctrl-c to stop",
        service.channel_markets(channels::SPOT_PUBLIC_TRADE)
    );

    tokio::signal::ctrl_c().await?;
    service.close().await;
    Ok(())
}
