use serde::{Deserialize, Serialize};

/// Ticker snapshot pushed on `spot.tickers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotTicker {
    pub currency_pair: String,
    pub last: String,
    pub lowest_ask: String,
    pub highest_bid: String,
    pub change_percentage: String,
    pub base_volume: String,
    pub quote_volume: String,
    pub high_24h: String,
    pub low_24h: String,
}

/// Public trade pushed on `spot.trades`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotTrade {
    pub id: u64,
    pub create_time: i64,
    pub create_time_ms: String,
    pub side: String,
    pub currency_pair: String,
    pub amount: String,
    pub price: String,
}

/// Candlestick update pushed on `spot.candlesticks`.
///
/// `name` carries the interval and pair, e.g. `1m_BTC_USDT`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotCandlestick {
    #[serde(rename = "t")]
    pub time: String,
    #[serde(rename = "v")]
    pub volume: String,
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
    #[serde(rename = "a")]
    pub amount: String,
    #[serde(rename = "w")]
    pub window_close: bool,
}

/// Best bid/ask pushed on `spot.book_ticker`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotBookTicker {
    #[serde(rename = "t")]
    pub time_ms: i64,
    #[serde(rename = "u")]
    pub last_id: i64,
    #[serde(rename = "s")]
    pub currency_pair: String,
    #[serde(rename = "b")]
    pub bid: String,
    #[serde(rename = "B")]
    pub bid_size: String,
    #[serde(rename = "a")]
    pub ask: String,
    #[serde(rename = "A")]
    pub ask_size: String,
}

/// Incremental depth diff pushed on `spot.order_book_update`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotOrderBookUpdate {
    #[serde(rename = "t")]
    pub time_ms: i64,
    #[serde(rename = "e")]
    pub event: String,
    #[serde(rename = "E")]
    pub time: i64,
    #[serde(rename = "s")]
    pub currency_pair: String,
    #[serde(rename = "U")]
    pub first_id: i64,
    #[serde(rename = "u")]
    pub last_id: i64,
    #[serde(rename = "b")]
    pub bids: Vec<[String; 2]>,
    #[serde(rename = "a")]
    pub asks: Vec<[String; 2]>,
}

/// Limited-depth snapshot pushed on `spot.order_book`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotOrderBook {
    #[serde(rename = "t")]
    pub time_ms: i64,
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: i64,
    #[serde(rename = "s")]
    pub currency_pair: String,
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}

/// Spot account balance change pushed on `spot.balances`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotBalance {
    pub timestamp: String,
    pub timestamp_ms: String,
    pub user: String,
    pub currency: String,
    pub change: String,
    pub total: String,
    pub available: String,
    pub freeze: String,
    pub freeze_change: String,
    pub change_type: String,
}

/// Margin account balance change pushed on `spot.margin_balances`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotMarginBalance {
    pub timestamp: String,
    pub timestamp_ms: String,
    pub user: String,
    pub currency_pair: String,
    pub currency: String,
    pub change: String,
    pub available: String,
    pub freeze: String,
    pub borrowed: String,
    pub interest: String,
}

/// Funding account balance change pushed on `spot.funding_balances`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotFundingBalance {
    pub timestamp: String,
    pub timestamp_ms: String,
    pub user: String,
    pub currency: String,
    pub change: String,
    pub freeze: String,
    pub lent: String,
}

/// Private fill pushed on `spot.usertrades`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotUserTrade {
    pub id: u64,
    pub user_id: u64,
    pub order_id: String,
    pub currency_pair: String,
    pub create_time: i64,
    pub create_time_ms: String,
    pub side: String,
    pub amount: String,
    pub role: String, // taker or maker
    pub price: String,
    pub fee: String,
    pub fee_currency: String,
    pub point_fee: String,
    pub gt_fee: String,
    pub text: String,
    pub amend_text: String,
    pub biz_info: String,
}

/// Order change pushed on `spot.orders`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotOrderUpdate {
    pub id: String,
    pub user: i64,
    pub event: String, // put, update or finish
    pub text: String,
    pub create_time: String,
    pub create_time_ms: String,
    pub update_time: String,
    pub update_time_ms: String,
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub account: String,
    pub side: String,
    pub amount: String,
    pub price: String,
    pub time_in_force: String,
    pub iceberg: String,
    pub auto_borrow: bool,
    pub left: String,
    pub fill_price: String,
    pub filled_total: String,
    pub avg_deal_price: String,
    pub fee: String,
    pub fee_currency: String,
    pub point_fee: String,
    pub gt_fee: String,
    pub gt_discount: bool,
    pub rebated_fee: String,
    pub rebated_fee_currency: String,
    pub stp_id: i64,
    pub stp_act: String,
    pub finish_as: String,
    pub biz_info: String,
    pub amend_text: String,
}

/// Parameters for `spot.order_place`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpotOrderRequest {
    pub currency_pair: String,
    pub side: String, // buy or sell
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>, // limit or market
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>, // spot, margin, cross_margin or unified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>, // gtc, ioc, poc or fok
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iceberg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_borrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_repay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>, // client id, `t-` prefixed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp_act: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_mode: Option<String>, // ACK, RESULT or FULL
}

/// Parameters for `spot.order_amend`.
///
/// At least one of `amount` and `price` must be set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpotAmendOrderRequest {
    pub order_id: String,
    pub currency_pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amend_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Parameters for `spot.order_cancel`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpotCancelOrderRequest {
    pub order_id: String,
    pub currency_pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Parameters for `spot.order_cancel_cp`, cancelling all open orders
/// that match the pair and side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpotCancelCpOrderRequest {
    pub currency_pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Parameters for `spot.order_status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpotStatusOrderRequest {
    pub order_id: String,
    pub currency_pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Order detail returned by the spot order operations.
///
/// `succeeded` reflects the acknowledgement status of write operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpotOrder {
    pub id: String,
    pub text: String,
    pub amend_text: String,
    pub create_time: String,
    pub update_time: String,
    pub create_time_ms: i64,
    pub update_time_ms: i64,
    pub status: String, // open, closed or cancelled
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub account: String,
    pub side: String,
    pub amount: String,
    pub price: String,
    pub time_in_force: String,
    pub iceberg: String,
    pub auto_borrow: bool,
    pub auto_repay: bool,
    pub left: String,
    pub fill_price: String,
    pub filled_total: String,
    pub avg_deal_price: String,
    pub fee: String,
    pub fee_currency: String,
    pub point_fee: String,
    pub gt_fee: String,
    pub gt_maker_fee: String,
    pub gt_taker_fee: String,
    pub gt_discount: bool,
    pub rebated_fee: String,
    pub rebated_fee_currency: String,
    pub stp_id: i32,
    pub stp_act: String,
    pub finish_as: String,
    pub fee_discount: String,
    pub succeeded: bool,
}
