//! Async client for the Gate.io v4 websocket API.
//!
//! One [`WsService`] multiplexes market-data feeds, private user streams
//! and order-entry API calls over a single socket. Subscribe/unsubscribe
//! calls are recorded and replayed transparently after a reconnect, and
//! inbound frames are dispatched to per-channel callbacks without blocking
//! the reader.
//!
//! ```no_run
//! use gate_ws::{channels, ConnectConfig, WsService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gate_ws::GateWsError> {
//!     let service = WsService::connect(ConnectConfig::read_only()).await?;
//!     service.set_callback(channels::SPOT_PUBLIC_TRADE, |msg| {
//!         if let Some(result) = msg.result {
//!             println!("{}", result.get());
//!         }
//!     });
//!     service
//!         .subscribe(channels::SPOT_PUBLIC_TRADE, &["BTC_USDT"])
//!         .await?;
//!     tokio::signal::ctrl_c().await.ok();
//!     service.close().await;
//!     Ok(())
//! }
//! ```

pub mod channels;
pub mod core;
pub mod model;
pub mod service;

pub use crate::core::config::{App, ConnectConfig, Settle};
pub use crate::core::errors::GateWsError;
pub use crate::core::types::{
    ApiErrs, ConnectionState, ServerError, SubscribeOptions, UpdateMsg, WsEvent,
};
pub use crate::service::{ApiOptions, Callback, WsService};

/// Re-exported for [`WsService::connect_with_cancel`] callers.
pub use tokio_util::sync::CancellationToken;
