use serde::{Deserialize, Serialize};

/// Ticker snapshot pushed on `futures.tickers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesTicker {
    pub contract: String,
    pub last: String,
    pub change_percentage: String,
    pub total_size: String,
    pub low_24h: String,
    pub high_24h: String,
    pub volume_24h: String,
    pub volume_24h_btc: String, // deprecated upstream
    pub volume_24h_usd: String, // deprecated upstream
    pub volume_24h_base: String,
    pub volume_24h_quote: String,
    pub volume_24h_settle: String,
    pub mark_price: String,
    pub funding_rate: String,
    pub funding_rate_indicative: String,
    pub index_price: String,
    pub quanto_base_rate: String,
}

/// Public trade pushed on `futures.trades`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesTrade {
    pub id: i64,
    pub create_time: f64,
    pub create_time_ms: f64,
    pub contract: String,
    pub size: i64, // positive for a taker buy, negative for a taker sell
    pub price: String,
}

/// One price level of a futures order book.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesOrderBookEntry {
    #[serde(rename = "p")]
    pub price: String,
    #[serde(rename = "s")]
    pub size: i64,
}

/// Depth snapshot pushed on `futures.order_book` at the `all` frequency.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesOrderBook {
    pub id: i64,
    pub contract: String,
    #[serde(rename = "t")]
    pub time_ms: i64,
    pub asks: Vec<FuturesOrderBookEntry>,
    pub bids: Vec<FuturesOrderBookEntry>,
}

/// Single level event from the legacy `futures.order_book` feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesOrderBookAll {
    #[serde(rename = "c")]
    pub contract: String,
    #[serde(rename = "p")]
    pub price: String,
    pub id: i64,
    #[serde(rename = "s")]
    pub size: i64,
}

/// Best bid/ask pushed on `futures.book_ticker`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesBookTicker {
    #[serde(rename = "t")]
    pub time_ms: i64,
    #[serde(rename = "s")]
    pub contract: String,
    #[serde(rename = "U")]
    pub first_id: i64,
    #[serde(rename = "u")]
    pub last_id: i64,
    #[serde(rename = "b")]
    pub bid: String,
    #[serde(rename = "B")]
    pub bid_size: String,
    #[serde(rename = "a")]
    pub ask: String,
    #[serde(rename = "A")]
    pub ask_size: String,
}

/// Incremental depth diff pushed on `futures.order_book_update`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesOrderBookUpdate {
    #[serde(rename = "t")]
    pub time_ms: i64,
    #[serde(rename = "s")]
    pub contract: String,
    #[serde(rename = "U")]
    pub first_id: i64,
    #[serde(rename = "u")]
    pub last_id: i64,
    #[serde(rename = "a")]
    pub asks: Vec<FuturesOrderBookEntry>,
    #[serde(rename = "b")]
    pub bids: Vec<FuturesOrderBookEntry>,
}

/// Candlestick update pushed on `futures.candlesticks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesCandlestick {
    #[serde(rename = "t")]
    pub time: f64,
    #[serde(rename = "v")]
    pub volume: i64,
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "o")]
    pub open: String,
    #[serde(rename = "n")]
    pub name: String,
}

/// Liquidation event pushed on `futures.liquidates`.
///
/// Margin and price fields are only populated on the private feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesLiquidate {
    pub time: i64,
    pub contract: String,
    pub leverage: String,
    pub size: i64,
    pub margin: String,
    pub entry_price: String,
    pub liq_price: String,
    pub mark_price: String,
    pub order_id: i64,
    pub order_price: String,
    pub fill_price: String,
    pub left: i64,
}

/// Balance change pushed on `futures.balances`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesAccountBook {
    pub time: f64,
    pub change: String,
    pub balance: String,
    #[serde(rename = "type")]
    pub change_type: String, // dnw, pnl, fee, refr, fund, ...
    pub text: String,
}

/// Futures account snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesAccount {
    pub total: String,
    pub unrealised_pnl: String,
    pub position_margin: String,
    pub order_margin: String,
    pub available: String,
    pub point: String,
    pub currency: String,
    pub in_dual_mode: bool,
}

/// Private fill pushed on `futures.usertrades`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesUserTrade {
    pub contract: String,
    pub create_time: f64,
    pub create_time_ms: f64,
    pub id: String,
    pub order_id: String,
    pub price: String,
    pub size: i64,
    pub role: String, // taker or maker
}

/// Order detail pushed on `futures.orders` and returned by the futures
/// order operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesOrder {
    pub id: i64,
    pub user: i32,
    pub create_time: f64,
    pub finish_time: f64,
    pub finish_as: String, // filled, cancelled, liquidated, ioc, ...
    pub status: String,    // open or finished
    pub contract: String,
    pub size: i64,
    pub iceberg: i64,
    pub price: String,
    pub close: bool,
    pub is_close: bool,
    pub reduce_only: bool,
    pub is_reduce_only: bool,
    pub is_liq: bool,
    pub tif: String,
    pub left: i64,
    pub fill_price: String,
    pub text: String,
    pub tkfr: String,
    pub mkfr: String,
    pub refu: i32,
    pub auto_size: String,
    pub stp_id: i32,
    pub stp_act: String,
    pub amend_text: String,
    pub biz_info: String,
}

/// Parameters for `futures.order_place`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuturesOrderRequest {
    pub contract: String,
    pub size: i64, // positive to bid, negative to ask
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>, // "0" for market orders with `tif` set to ioc
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iceberg: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tif: Option<String>, // gtc, ioc, poc or fok
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>, // client id, `t-` prefixed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_size: Option<String>, // close_long or close_short
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp_act: Option<String>,
}

/// Parameters for `futures.order_list`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuturesListOrdersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    pub status: String, // open or finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i32>,
}

/// Parameters for `futures.order_cancel`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuturesCancelOrderRequest {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
}

/// Parameters for `futures.order_cancel_cp`, cancelling all open orders
/// that match the contract and side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuturesCancelCpOrderRequest {
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
}

/// Parameters for `futures.order_status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuturesStatusOrderRequest {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
}

/// Parameters for `futures.order_amend`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuturesAmendOrderRequest {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub amend_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// Parameters for `futures.order_cancel_ids`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuturesCancelIdsRequest {
    pub order_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
}

/// Conditional order pushed on `futures.autoorders`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesPriceTriggeredOrder {
    pub initial: FuturesInitialOrder,
    pub trigger: FuturesPriceTrigger,
    pub id: i64,
    pub user: i32,
    pub create_time: f64,
    pub finish_time: f64,
    pub trade_id: i64,
    pub status: String,
    pub finish_as: String,
    pub reason: String,
}

/// Price condition of a triggered order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesPriceTrigger {
    pub strategy_type: i32, // 0 by price, 1 by price gap
    pub price_type: i32,    // 0 latest deal price, 1 mark price, 2 index price
    pub price: String,
    pub rule: i32, // 1 means >=, 2 means <=
    pub expiration: i32,
}

/// Order created once a trigger condition fires.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuturesInitialOrder {
    pub contract: String,
    pub size: i64,
    pub price: String,
    pub close: bool,
    pub tif: String,
    pub text: String,
    pub reduce_only: bool,
    pub is_reduce_only: bool,
    pub is_close: bool,
}
