//! Channel catalog for the Gate.io WebSocket v4 API.
//!
//! Channel names are `<app>.<topic>` strings; the app prefix (`spot` or
//! `futures`) decides which endpoint the channel lives on and which login
//! channel authenticates API calls against it.

/// Spot endpoint, also the overall default.
pub const SPOT_URL: &str = "wss://api.gateio.ws/ws/v4/";
/// USDT-settled futures endpoint.
pub const FUTURES_USDT_URL: &str = "wss://fx-ws.gateio.ws/v4/ws/usdt";
/// BTC-settled futures endpoint.
pub const FUTURES_BTC_URL: &str = "wss://fx-ws.gateio.ws/v4/ws/btc";
/// USDT-settled futures testnet endpoint.
pub const FUTURES_USDT_TESTNET_URL: &str = "wss://fx-ws-testnet.gateio.ws/v4/ws/usdt";
/// BTC-settled futures testnet endpoint.
pub const FUTURES_BTC_TESTNET_URL: &str = "wss://fx-ws-testnet.gateio.ws/v4/ws/btc";

/// The only auth method the v4 websocket supports.
pub const AUTH_METHOD_API_KEY: &str = "api_key";
/// Request-header key recognized by API-call envelopes.
pub const CHANNEL_ID_HEADER: &str = "X-Gate-Channel-Id";

// Spot channels.
pub const SPOT_TICKER: &str = "spot.tickers";
pub const SPOT_PUBLIC_TRADE: &str = "spot.trades";
pub const SPOT_CANDLESTICK: &str = "spot.candlesticks";
pub const SPOT_BOOK_TICKER: &str = "spot.book_ticker";
pub const SPOT_ORDER_BOOK: &str = "spot.order_book";
pub const SPOT_ORDER_BOOK_UPDATE: &str = "spot.order_book_update";
pub const SPOT_ORDER: &str = "spot.orders";
pub const SPOT_USER_TRADE: &str = "spot.usertrades";
pub const SPOT_BALANCE: &str = "spot.balances";
pub const SPOT_MARGIN_BALANCE: &str = "spot.margin_balances";
pub const SPOT_FUNDING_BALANCE: &str = "spot.funding_balances";
pub const SPOT_CROSS_BALANCE: &str = "spot.cross_balances";
pub const SPOT_LOGIN: &str = "spot.login";
pub const SPOT_ORDER_PLACE: &str = "spot.order_place";
pub const SPOT_ORDER_AMEND: &str = "spot.order_amend";
pub const SPOT_ORDER_CANCEL: &str = "spot.order_cancel";
pub const SPOT_ORDER_CANCEL_IDS: &str = "spot.order_cancel_ids";
pub const SPOT_ORDER_CANCEL_CP: &str = "spot.order_cancel_cp";
pub const SPOT_ORDER_STATUS: &str = "spot.order_status";

// Futures channels.
pub const FUTURES_TICKER: &str = "futures.tickers";
pub const FUTURES_PUBLIC_TRADE: &str = "futures.trades";
pub const FUTURES_CANDLESTICK: &str = "futures.candlesticks";
pub const FUTURES_BOOK_TICKER: &str = "futures.book_ticker";
pub const FUTURES_ORDER_BOOK: &str = "futures.order_book";
pub const FUTURES_ORDER_BOOK_UPDATE: &str = "futures.order_book_update";
pub const FUTURES_ORDER: &str = "futures.orders";
pub const FUTURES_USER_TRADE: &str = "futures.usertrades";
pub const FUTURES_LIQUIDATE: &str = "futures.liquidates";
pub const FUTURES_AUTO_DELEVERAGE: &str = "futures.auto_deleverages";
pub const FUTURES_POSITION_CLOSE: &str = "futures.position_closes";
pub const FUTURES_BALANCE: &str = "futures.balances";
pub const FUTURES_REDUCE_RISK_LIMIT: &str = "futures.reduce_risk_limits";
pub const FUTURES_POSITION: &str = "futures.positions";
pub const FUTURES_AUTO_ORDER: &str = "futures.autoorders";
pub const FUTURES_LOGIN: &str = "futures.login";
pub const FUTURES_ORDER_PLACE: &str = "futures.order_place";
pub const FUTURES_ORDER_BATCH_PLACE: &str = "futures.order_batch_place";
pub const FUTURES_ORDER_AMEND: &str = "futures.order_amend";
pub const FUTURES_ORDER_CANCEL: &str = "futures.order_cancel";
pub const FUTURES_ORDER_CANCEL_CP: &str = "futures.order_cancel_cp";
pub const FUTURES_ORDER_STATUS: &str = "futures.order_status";
pub const FUTURES_ORDER_LIST: &str = "futures.order_list";

/// Whether subscribing to `channel` requires API credentials.
///
/// Private feeds reject unsigned subscriptions server-side; checking here
/// lets `subscribe` fail fast without writing a frame.
pub fn requires_auth(channel: &str) -> bool {
    matches!(
        channel,
        SPOT_ORDER
            | SPOT_USER_TRADE
            | SPOT_BALANCE
            | SPOT_MARGIN_BALANCE
            | SPOT_FUNDING_BALANCE
            | SPOT_CROSS_BALANCE
            | FUTURES_ORDER
            | FUTURES_USER_TRADE
            | FUTURES_LIQUIDATE
            | FUTURES_AUTO_DELEVERAGE
            | FUTURES_POSITION_CLOSE
            | FUTURES_BALANCE
            | FUTURES_REDUCE_RISK_LIMIT
            | FUTURES_POSITION
            | FUTURES_AUTO_ORDER
    )
}

/// Transport-internal channels (`*.ping`, `*.time`) are excluded from
/// subscription history so reconnect replay and market listing never see
/// keep-alive noise.
pub fn is_transport_channel(channel: &str) -> bool {
    channel.ends_with(".ping") || channel.ends_with(".time")
}

/// Extracts the application prefix of a `<app>.<topic>` channel name.
///
/// Returns `None` for names that are not exactly two dot-separated tokens.
pub fn app_prefix(channel: &str) -> Option<&str> {
    let mut parts = channel.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(app), Some(_), None) if !app.is_empty() => Some(app),
        _ => None,
    }
}
