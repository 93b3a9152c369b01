//! The one-time message read loop and its reconnect path.
//!
//! The loop owns the socket's read half. A transport failure hands control
//! to [`reconnect`], which re-dials within the configured retry budget,
//! swaps the shared sink and replays the recorded subscription history;
//! the loop then resumes on the fresh read half. If the budget is
//! exhausted the loop terminates for good and the service goes inert.

use crate::core::codec;
use crate::core::errors::GateWsError;
use crate::core::types::{ConnectionState, UpdateMsg};
use crate::service::transport::{self, WsReadHalf};
use crate::service::ServiceInner;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, trace, warn};

pub(crate) async fn read_loop(inner: Arc<ServiceInner>, mut read: WsReadHalf) {
    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => {
                debug!("read loop cancelled");
                inner.close_socket().await;
                inner.set_status(ConnectionState::Disconnected);
                return;
            }
            next = read.next() => {
                match next {
                    Some(Ok(message)) => match &message {
                        Message::Close(frame) => {
                            debug!(frame = ?frame, "server closed the connection");
                        }
                        _ => {
                            match codec::decode_message(&message) {
                                Ok(Some(update)) => {
                                    if !route(&inner, update).await {
                                        inner.close_socket().await;
                                        inner.set_status(ConnectionState::Disconnected);
                                        return;
                                    }
                                }
                                Ok(None) => {}
                                Err(err) => {
                                    warn!(error = %err, body = ?message, "undecodable frame, dropping");
                                }
                            }
                            continue;
                        }
                    },
                    Some(Err(err)) => warn!(error = %err, "websocket read failed"),
                    None => debug!("websocket stream ended"),
                }

                // transport loss: re-dial, swap the socket, replay history
                match reconnect(&inner).await {
                    Ok(next_read) => read = next_read,
                    Err(err) => {
                        error!(error = %err, "reconnect failed, read loop terminated");
                        inner.close_socket().await;
                        inner.set_status(ConnectionState::Disconnected);
                        return;
                    }
                }
            }
        }
    }
}

/// Enqueue one decoded envelope for its channel's dispatcher. Returns
/// `false` when the frame is unroutable and the loop must stop.
async fn route(inner: &Arc<ServiceInner>, msg: UpdateMsg) -> bool {
    let channel = msg.channel_name().to_string();
    if channel.is_empty() {
        error!("inbound frame carries no channel, stopping read loop");
        return false;
    }
    match inner.registry.queue(&channel) {
        Some(queue) => {
            if queue.send(msg).await.is_err() {
                trace!(channel = %channel, "dispatcher queue closed, dropping message");
            }
        }
        None => inner.registry.deliver_unhandled(msg),
    }
    true
}

/// Re-establish the connection after a read failure.
///
/// Only the transition owner proceeds; once the service left the connected
/// state for any other reason (close, an earlier terminal failure) there is
/// nothing to re-establish.
async fn reconnect(inner: &Arc<ServiceInner>) -> Result<WsReadHalf, GateWsError> {
    if !inner.begin_reconnect() {
        return Err(GateWsError::NotConnected);
    }
    info!(url = %inner.url, "connection lost, reconnecting");

    let (skip_tls_verify, max_retries, show_reconnect_msg) = {
        let conf = inner.conf.read();
        (conf.skip_tls_verify, conf.max_retries, conf.show_reconnect_msg)
    };
    match transport::dial(&inner.url, skip_tls_verify, max_retries).await {
        Ok((sink, read_half)) => {
            *inner.sink.lock().await = Some(sink);
            inner.set_status(ConnectionState::Connected);
            replay_history(inner, show_reconnect_msg).await;
            Ok(read_half)
        }
        Err(err) => {
            inner.set_status(ConnectionState::Disconnected);
            Err(err)
        }
    }
}

/// Replay every recorded subscribe/unsubscribe in call order. Replays are
/// not appended to history again; per-channel failures are logged and do
/// not abort the remaining channels.
async fn replay_history(inner: &Arc<ServiceInner>, show_reconnect_msg: bool) {
    for (channel, records) in inner.registry.history_by_channel() {
        for record in records {
            match inner
                .send_subscription(
                    record.event,
                    &record.channel,
                    record.payload.clone(),
                    record.id,
                    false,
                )
                .await
            {
                Ok(()) => {
                    if show_reconnect_msg {
                        info!(channel = %channel, payload = ?record.payload, "resubscribed after reconnect");
                    }
                }
                Err(err) => {
                    warn!(channel = %channel, error = %err, "resubscribe failed after reconnect");
                }
            }
        }
    }
}
