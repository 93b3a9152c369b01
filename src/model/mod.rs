//! Typed payloads for the Gate.io feeds and order operations.
//!
//! Push payloads pair with [`UpdateMsg::decode_result`](crate::UpdateMsg::decode_result)
//! and API results with [`UpdateMsg::decode_api_result`](crate::UpdateMsg::decode_api_result);
//! request structs serialize into the `req_param` of an API frame.

pub mod futures;
pub mod spot;

// Re-export the payloads most callers reach for
pub use futures::{
    FuturesBookTicker, FuturesCandlestick, FuturesOrder, FuturesOrderBook, FuturesOrderBookUpdate,
    FuturesOrderRequest, FuturesTicker, FuturesTrade,
};
pub use spot::{
    SpotAmendOrderRequest, SpotBookTicker, SpotCancelOrderRequest, SpotCandlestick, SpotOrder,
    SpotOrderBook, SpotOrderBookUpdate, SpotOrderRequest, SpotOrderUpdate, SpotStatusOrderRequest,
    SpotTicker, SpotTrade,
};
