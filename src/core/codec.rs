//! Encoding and decoding between protocol envelopes and websocket messages.

use crate::core::errors::GateWsError;
use crate::core::types::{UpdateMsg, WsFrame};
use tokio_tungstenite::tungstenite::Message;

/// Serialize an outbound envelope into a text message.
pub fn encode_frame(frame: &WsFrame) -> Result<Message, GateWsError> {
    Ok(Message::Text(serde_json::to_string(frame)?))
}

/// Decode an inbound message into an update envelope.
///
/// Returns `Ok(None)` for transport-level frames (ping/pong/close) that
/// carry no protocol payload. JSON that does not parse is an error; the
/// read loop logs it and moves on.
pub fn decode_message(message: &Message) -> Result<Option<UpdateMsg>, GateWsError> {
    match message {
        Message::Text(text) => Ok(Some(serde_json::from_str(text)?)),
        Message::Binary(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
        _ => Ok(None),
    }
}
