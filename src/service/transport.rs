//! Socket dial and write primitives.
//!
//! The write half lives behind a shared async mutex so every outbound frame
//! (subscribe, API call, heartbeat, reconnect replay) is serialized onto the
//! socket; a reconnect swaps the sink under the same lock.

use crate::core::errors::GateWsError;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};
use tracing::warn;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;
pub(crate) type WsReadHalf = SplitStream<WsStream>;

/// Shared, reconnect-swappable write half.
pub(crate) type SharedSink = tokio::sync::Mutex<Option<WsSink>>;

/// Dial `url` with a linearly growing backoff (`retry * 500ms`).
///
/// `max_retries` bounds how many times a failed attempt is retried: `None`
/// retries forever, `Some(0)` surfaces the first failure immediately.
pub(crate) async fn dial(
    url: &str,
    skip_tls_verify: bool,
    max_retries: Option<u32>,
) -> Result<(WsSink, WsReadHalf), GateWsError> {
    let connector = tls_connector(skip_tls_verify)?;
    let mut retry: u32 = 0;
    loop {
        match connect_async_tls_with_config(url, None, false, connector.clone()).await {
            Ok((stream, _response)) => {
                let (sink, read) = stream.split();
                return Ok((sink, read));
            }
            Err(source) => {
                if let Some(budget) = max_retries {
                    if retry >= budget {
                        return Err(GateWsError::Connect {
                            url: url.to_string(),
                            attempts: retry + 1,
                            source,
                        });
                    }
                }
                retry += 1;
                warn!(url, retry, error = %source, "websocket dial failed, retrying");
                sleep(Duration::from_millis(500) * retry).await;
            }
        }
    }
}

/// Send one message through the shared sink.
pub(crate) async fn send_message(sink: &SharedSink, message: Message) -> Result<(), GateWsError> {
    let mut guard = sink.lock().await;
    match guard.as_mut() {
        Some(writer) => {
            writer.send(message).await?;
            Ok(())
        }
        None => Err(GateWsError::NotConnected),
    }
}

fn tls_connector(skip_tls_verify: bool) -> Result<Option<Connector>, GateWsError> {
    if !skip_tls_verify {
        return Ok(None);
    }
    let tls = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .build()?;
    Ok(Some(Connector::NativeTls(tls)))
}
