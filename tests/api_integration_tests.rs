//! Authenticated API calls over the websocket: lazy login, envelope shape
//! and asynchronous response dispatch.

mod support;

use gate_ws::model::{SpotOrder, SpotOrderRequest};
use gate_ws::{channels, ApiOptions, ConnectConfig, UpdateMsg, WsService};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use support::MockGateServer;
use tokio::time::{sleep, timeout};

async fn connect_private(server: &MockGateServer) -> WsService {
    let config =
        ConnectConfig::new("test_key".to_string(), "test_secret".to_string()).url(server.url());
    WsService::connect(config).await.expect("connect to mock server")
}

fn limit_order(text: &str) -> SpotOrderRequest {
    SpotOrderRequest {
        currency_pair: "BTC_USDT".to_string(),
        side: "buy".to_string(),
        amount: "0.001".to_string(),
        price: Some("30000".to_string()),
        order_type: Some("limit".to_string()),
        time_in_force: Some("gtc".to_string()),
        text: Some(text.to_string()),
        ..SpotOrderRequest::default()
    }
}

#[tokio::test]
async fn test_api_request_without_credentials_is_rejected() {
    let server = MockGateServer::spawn().await;
    let service = WsService::connect(ConnectConfig::read_only().url(server.url()))
        .await
        .expect("connect");

    let err = service
        .api_request(channels::SPOT_ORDER_PLACE, &limit_order("t-1"))
        .await
        .expect_err("api call without credentials must fail");
    assert!(err.is_auth_required());

    sleep(Duration::from_millis(100)).await;
    assert!(server.frames().await.is_empty());
    service.close().await;
}

#[tokio::test]
async fn test_login_happens_once_before_the_first_call() {
    let server = MockGateServer::spawn().await;
    let service = connect_private(&server).await;

    service
        .api_request(channels::SPOT_ORDER_PLACE, &limit_order("t-1"))
        .await
        .expect("first api call");
    service
        .api_request(channels::SPOT_ORDER_PLACE, &limit_order("t-2"))
        .await
        .expect("second api call");

    let frames = server.wait_for_frames(3, Duration::from_secs(1)).await;
    assert_eq!(frames[0]["channel"], "spot.login");
    assert_eq!(frames[0]["event"], "api");
    assert_eq!(frames[1]["channel"], "spot.order_place");
    assert_eq!(frames[2]["channel"], "spot.order_place");
    assert_eq!(server.frames_on(channels::SPOT_LOGIN).await.len(), 1);
    service.close().await;
}

#[tokio::test]
async fn test_api_envelope_shape() {
    let server = MockGateServer::spawn().await;
    let service = connect_private(&server).await;

    service
        .api_request_with_options(
            channels::SPOT_ORDER_PLACE,
            &limit_order("t-shape"),
            ApiOptions {
                channel_id: Some("demo-app".to_string()),
                req_id: Some("req-42".to_string()),
            },
        )
        .await
        .expect("api call");

    let frames = server.wait_for_frames(2, Duration::from_secs(1)).await;
    let place = &frames[1];
    assert_eq!(place["event"], "api");
    let payload = &place["payload"];
    assert_eq!(payload["api_key"], "test_key");
    assert_eq!(payload["req_id"], "req-42");
    assert_eq!(payload["req_header"]["X-Gate-Channel-Id"], "demo-app");
    assert_eq!(payload["req_param"]["currency_pair"], "BTC_USDT");
    assert_eq!(payload["req_param"]["text"], "t-shape");

    let signature = payload["signature"].as_str().expect("signature present");
    assert_eq!(signature.len(), 128);
    assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    // the payload timestamp matches the signed frame time
    assert_eq!(payload["timestamp"], place["time"].to_string());
    service.close().await;
}

#[tokio::test]
async fn test_login_envelope_ignores_call_options() {
    let server = MockGateServer::spawn().await;
    let service = connect_private(&server).await;

    service
        .api_request_with_options(
            channels::SPOT_ORDER_PLACE,
            &limit_order("t-opts"),
            ApiOptions {
                channel_id: Some("demo-app".to_string()),
                req_id: Some("req-42".to_string()),
            },
        )
        .await
        .expect("api call");

    let frames = server.wait_for_frames(2, Duration::from_secs(1)).await;
    assert_eq!(frames[0]["channel"], "spot.login");
    let login = &frames[0]["payload"];
    // the login frame gets a generated req_id and a blank channel-id
    // header, not the triggering call's overrides
    assert_ne!(login["req_id"], "req-42");
    assert!(!login["req_id"].as_str().expect("req_id").is_empty());
    assert_eq!(login["req_header"]["X-Gate-Channel-Id"], "");
    assert_eq!(frames[1]["payload"]["req_id"], "req-42");
    service.close().await;
}

#[tokio::test]
async fn test_generated_req_id_when_not_overridden() {
    let server = MockGateServer::spawn().await;
    let service = connect_private(&server).await;

    service
        .api_request(channels::SPOT_ORDER_STATUS, &json!({"order_id": "1"}))
        .await
        .expect("api call");

    let frames = server.wait_for_frames(2, Duration::from_secs(1)).await;
    let req_id = frames[1]["payload"]["req_id"].as_str().expect("req_id");
    assert!(!req_id.is_empty());
    service.close().await;
}

#[tokio::test]
async fn test_api_response_reaches_the_channel_callback() {
    let server = MockGateServer::spawn().await;
    let service = connect_private(&server).await;

    let seen = Arc::new(Mutex::new(Vec::<UpdateMsg>::new()));
    let sink = Arc::clone(&seen);
    service.set_callback(channels::SPOT_ORDER_PLACE, move |msg| {
        sink.lock().unwrap().push(msg);
    });

    service
        .api_request(channels::SPOT_ORDER_PLACE, &limit_order("t-resp"))
        .await
        .expect("api call");
    server.wait_for_frames(2, Duration::from_secs(1)).await;

    // API responses carry the channel in the header block only
    server
        .push(&json!({
            "header": {
                "response_time": "1700000000123",
                "status": "200",
                "channel": "spot.order_place",
                "event": "api",
                "client_id": "::1-1"
            },
            "data": {"result": {"id": "9921", "status": "open", "succeeded": true}}
        }))
        .await;

    timeout(Duration::from_secs(2), async {
        while seen.lock().unwrap().is_empty() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("response never dispatched");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].channel_name(), "spot.order_place");
    let order: SpotOrder = seen[0]
        .decode_api_result()
        .expect("decode")
        .expect("result present");
    assert_eq!(order.id, "9921");
    assert!(order.succeeded);
    service.close().await;
}

#[tokio::test]
async fn test_api_error_surfaces_in_band() {
    let server = MockGateServer::spawn().await;
    let service = connect_private(&server).await;

    let seen = Arc::new(Mutex::new(Vec::<UpdateMsg>::new()));
    let sink = Arc::clone(&seen);
    service.set_callback(channels::SPOT_ORDER_PLACE, move |msg| {
        sink.lock().unwrap().push(msg);
    });

    service
        .api_request(channels::SPOT_ORDER_PLACE, &limit_order("t-err"))
        .await
        .expect("api call itself succeeds");
    server.wait_for_frames(2, Duration::from_secs(1)).await;

    server
        .push(&json!({
            "header": {"channel": "spot.order_place", "event": "api"},
            "data": {"errs": {"label": "AUTHENTICATION_FAILED", "message": "Not login yet"}}
        }))
        .await;

    timeout(Duration::from_secs(2), async {
        while seen.lock().unwrap().is_empty() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("error envelope never dispatched");

    let seen = seen.lock().unwrap();
    let errs = seen[0].data.errs.as_ref().expect("errs present");
    assert_eq!(errs.label, "AUTHENTICATION_FAILED");
    service.close().await;
}
