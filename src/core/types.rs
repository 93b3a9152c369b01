//! Wire types for the v4 websocket protocol.
//!
//! Outbound traffic is a single [`WsFrame`] shape whose payload is either a
//! market list (subscribe/unsubscribe) or an API-call payload. Inbound
//! traffic decodes into [`UpdateMsg`]; its `result` bytes stay opaque until
//! a callback asks for them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use std::fmt;

/// Connection lifecycle state of a service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    pub(crate) const fn as_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connected => 1,
            Self::Reconnecting => 2,
        }
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connected,
            2 => Self::Reconnecting,
            _ => Self::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting => write!(f, "reconnecting"),
        }
    }
}

/// Outbound envelope events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WsEvent {
    Subscribe,
    Unsubscribe,
    Api,
}

impl WsEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for WsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auth block carried by every subscribe/unsubscribe frame. The server
/// only verifies it for private channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auth {
    pub method: String,
    #[serde(rename = "KEY")]
    pub key: String,
    #[serde(rename = "SIGN")]
    pub sign: String,
}

/// Signed payload of an API-call envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPayload {
    pub api_key: String,
    pub signature: String,
    pub timestamp: String,
    pub req_id: String,
    pub req_header: Value,
    pub req_param: Value,
}

/// The two payload shapes an outbound frame can carry.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FramePayload {
    /// Market identifiers (plus feed parameters such as intervals or
    /// depth levels) for subscribe/unsubscribe.
    Markets(Vec<String>),
    /// Structured API-call payload.
    Api(Box<ApiPayload>),
}

/// Outbound envelope.
#[derive(Debug, Clone, Serialize)]
pub struct WsFrame {
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub channel: String,
    pub event: WsEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    pub payload: FramePayload,
}

/// Options for [`subscribe_with_options`](crate::WsService::subscribe_with_options).
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribeOptions {
    /// Client-chosen numeric id, echoed back in the subscribe ack.
    pub id: Option<i64>,
}

/// One recorded subscribe/unsubscribe call, replayed after a reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub channel: String,
    pub event: WsEvent,
    pub payload: Vec<String>,
    pub id: Option<i64>,
}

/// Header block some response variants carry the channel in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub response_time: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub client_id: String,
}

/// Server-reported error inside a plain update envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code: {}, message: {}", self.code, self.message)
    }
}

impl std::error::Error for ServerError {}

/// Error shape nested inside API-call responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrs {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub message: String,
}

/// Nested result block of API-call responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiData {
    #[serde(default)]
    pub result: Option<Box<RawValue>>,
    #[serde(default)]
    pub errs: Option<ApiErrs>,
}

/// Inbound envelope handed to channel callbacks.
///
/// Each decoded frame reaches exactly one dispatcher queue; the callback
/// owns it for the duration of the invocation. Business errors arrive
/// in-band through `error` (stream envelopes) or `data.errs` (API-call
/// responses), never as crate errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMsg {
    #[serde(default)]
    pub header: ResponseHeader,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub time_ms: i64,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub error: Option<ServerError>,
    #[serde(default)]
    pub result: Option<Box<RawValue>>,
    #[serde(default)]
    pub data: ApiData,
}

impl UpdateMsg {
    /// Channel this envelope belongs to, falling back to the response
    /// header for the variants that nest it there.
    pub fn channel_name(&self) -> &str {
        if self.channel.is_empty() {
            &self.header.channel
        } else {
            &self.channel
        }
    }

    /// Deserialize the top-level `result` bytes.
    pub fn decode_result<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.result
            .as_deref()
            .map(|raw| serde_json::from_str(raw.get()))
            .transpose()
    }

    /// Deserialize the nested `data.result` bytes of an API-call response.
    pub fn decode_api_result<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.data
            .result
            .as_deref()
            .map(|raw| serde_json::from_str(raw.get()))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels;

    #[test]
    fn test_frame_serializes_markets_payload() {
        let frame = WsFrame {
            time: 1_700_000_000,
            id: None,
            channel: channels::SPOT_PUBLIC_TRADE.to_string(),
            event: WsEvent::Subscribe,
            auth: Some(Auth {
                method: channels::AUTH_METHOD_API_KEY.to_string(),
                key: "k".to_string(),
                sign: "s".to_string(),
            }),
            payload: FramePayload::Markets(vec!["BTC_USDT".to_string()]),
        };
        let json: Value = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["event"], "subscribe");
        assert_eq!(json["payload"][0], "BTC_USDT");
        assert_eq!(json["auth"]["method"], "api_key");
        assert_eq!(json["auth"]["KEY"], "k");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_frame_skips_auth_for_api_calls() {
        let frame = WsFrame {
            time: 1_700_000_000,
            id: None,
            channel: channels::SPOT_ORDER_PLACE.to_string(),
            event: WsEvent::Api,
            auth: None,
            payload: FramePayload::Api(Box::new(ApiPayload {
                api_key: "k".to_string(),
                signature: "s".to_string(),
                timestamp: "1700000000".to_string(),
                req_id: "r1".to_string(),
                req_header: serde_json::json!({ "X-Gate-Channel-Id": "" }),
                req_param: serde_json::json!({ "text": "t-1" }),
            })),
        };
        let json: Value = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["event"], "api");
        assert!(json.get("auth").is_none());
        assert_eq!(json["payload"]["req_id"], "r1");
        assert_eq!(json["payload"]["req_param"]["text"], "t-1");
    }

    #[test]
    fn test_update_decode_stream_envelope() {
        let body = r#"{
            "time": 1700000000,
            "time_ms": 1700000000123,
            "channel": "spot.trades",
            "event": "update",
            "result": {"id": 309143071, "currency_pair": "BTC_USDT"}
        }"#;
        let msg: UpdateMsg = serde_json::from_str(body).unwrap();
        assert_eq!(msg.channel_name(), "spot.trades");
        assert_eq!(msg.event, "update");
        let result: Value = msg.decode_result().unwrap().unwrap();
        assert_eq!(result["currency_pair"], "BTC_USDT");
        assert!(msg.error.is_none());
    }

    #[test]
    fn test_update_decode_server_error() {
        let body = r#"{
            "time": 1700000000,
            "channel": "spot.orders",
            "event": "subscribe",
            "error": {"code": 2, "message": "unknown argument"}
        }"#;
        let msg: UpdateMsg = serde_json::from_str(body).unwrap();
        let err = msg.error.unwrap();
        assert_eq!(err.code, 2);
        assert_eq!(err.to_string(), "code: 2, message: unknown argument");
    }

    #[test]
    fn test_update_decode_api_response() {
        let body = r#"{
            "header": {"response_time": "1700000000123", "status": "200",
                       "channel": "spot.order_place", "event": "api",
                       "client_id": "::1-1"},
            "data": {"result": {"id": "12345", "succeeded": true}}
        }"#;
        let msg: UpdateMsg = serde_json::from_str(body).unwrap();
        assert_eq!(msg.channel_name(), "spot.order_place");
        let result: Value = msg.decode_api_result().unwrap().unwrap();
        assert_eq!(result["id"], "12345");
        assert!(msg.data.errs.is_none());
    }

    #[test]
    fn test_update_decode_api_errs() {
        let body = r#"{
            "header": {"channel": "spot.order_place"},
            "data": {"errs": {"label": "AUTHENTICATION_FAILED",
                              "message": "Not login yet"}}
        }"#;
        let msg: UpdateMsg = serde_json::from_str(body).unwrap();
        let errs = msg.data.errs.unwrap();
        assert_eq!(errs.label, "AUTHENTICATION_FAILED");
        assert!(msg.data.result.is_none());
    }

    #[test]
    fn test_update_missing_channel_everywhere() {
        let msg: UpdateMsg = serde_json::from_str(r#"{"time": 1}"#).unwrap();
        assert!(msg.channel_name().is_empty());
    }

    #[test]
    fn test_connection_state_roundtrip() {
        for state in [
            ConnectionState::Disconnected,
            ConnectionState::Connected,
            ConnectionState::Reconnecting,
        ] {
            assert_eq!(ConnectionState::from_u8(state.as_u8()), state);
        }
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
    }
}
