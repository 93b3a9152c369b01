use gate_ws::model::{
    SpotAmendOrderRequest, SpotCancelOrderRequest, SpotOrder, SpotOrderRequest,
    SpotStatusOrderRequest,
};
use gate_ws::{channels, ConnectConfig, WsService};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Reads GATE_API_KEY / GATE_API_SECRET from the environment or a .env file
    let service = WsService::connect(ConnectConfig::from_env_file()?).await?;

    // Responses arrive asynchronously on the channel each call was sent on
    for channel in [
        channels::SPOT_LOGIN,
        channels::SPOT_ORDER_PLACE,
        channels::SPOT_ORDER_AMEND,
        channels::SPOT_ORDER_STATUS,
        channels::SPOT_ORDER_CANCEL,
    ] {
        service.set_callback(channel, move |msg| {
            if let Some(errs) = &msg.data.errs {
                eprintln!("{channel}: {} ({})", errs.message, errs.label);
                return;
            }
            match msg.decode_api_result::<SpotOrder>() {
                Ok(Some(order)) => println!(
                    "{channel}: id={} status={} left={}",
                    order.id, order.status, order.left
                ),
                Ok(None) => println!("{channel}: ok"),
                Err(e) => eprintln!("{channel}: undecodable result: {e}"),
            }
        });
    }

    // Far below market so the order rests instead of filling
    let text = "t-gate-ws-demo";
    service
        .api_request(
            channels::SPOT_ORDER_PLACE,
            &SpotOrderRequest {
                currency_pair: "BTC_USDT".to_string(),
                side: "buy".to_string(),
                amount: "0.001".to_string(),
                price: Some("20000".to_string()),
                order_type: Some("limit".to_string()),
                time_in_force: Some("gtc".to_string()),
                text: Some(text.to_string()),
                ..SpotOrderRequest::default()
            },
        )
        .await?;
    sleep(Duration::from_secs(1)).await;

    service
        .api_request(
            channels::SPOT_ORDER_AMEND,
            &SpotAmendOrderRequest {
                order_id: text.to_string(),
                currency_pair: "BTC_USDT".to_string(),
                price: Some("21000".to_string()),
                ..SpotAmendOrderRequest::default()
            },
        )
        .await?;
    sleep(Duration::from_secs(1)).await;

    service
        .api_request(
            channels::SPOT_ORDER_STATUS,
            &SpotStatusOrderRequest {
                order_id: text.to_string(),
                currency_pair: "BTC_USDT".to_string(),
                ..SpotStatusOrderRequest::default()
            },
        )
        .await?;
    sleep(Duration::from_secs(1)).await;

    service
        .api_request(
            channels::SPOT_ORDER_CANCEL,
            &SpotCancelOrderRequest {
                order_id: text.to_string(),
                currency_pair: "BTC_USDT".to_string(),
                account: None,
            },
        )
        .await?;
    sleep(Duration::from_secs(1)).await;

    service.close().await;
    Ok(())
}
