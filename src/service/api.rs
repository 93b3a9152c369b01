//! Authenticated API-call envelopes and the one-time login.

use crate::channels;
use crate::core::codec;
use crate::core::errors::GateWsError;
use crate::core::signer;
use crate::core::types::{ApiPayload, FramePayload, WsEvent, WsFrame};
use crate::service::{transport, ServiceInner};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Per-call knobs for [`api_request_with_options`](crate::WsService::api_request_with_options).
#[derive(Debug, Clone, Default)]
pub struct ApiOptions {
    /// Value for the `X-Gate-Channel-Id` request header.
    pub channel_id: Option<String>,
    /// Overrides the generated request id echoed back in the response.
    pub req_id: Option<String>,
}

impl ServiceInner {
    /// Send an authenticated API call. Logs in first if this instance has
    /// not yet done so; the response arrives asynchronously on `channel`.
    pub(crate) async fn api_call(
        self: &Arc<Self>,
        channel: &str,
        req_param: Value,
        options: ApiOptions,
    ) -> Result<(), GateWsError> {
        if !self.has_credentials() {
            return Err(GateWsError::AuthRequired);
        }
        self.login_once
            .get_or_try_init(|| async {
                let login_channel = self.conf.read().app.login_channel();
                debug!(channel = login_channel, "logging in");
                // the login frame carries its own identity, never the
                // triggering call's req_id or channel-id header
                self.send_api_frame(login_channel, Value::Object(Map::new()), &ApiOptions::default())
                    .await
            })
            .await?;
        self.send_api_frame(channel, req_param, &options).await
    }

    /// Build, sign and send one API envelope.
    ///
    /// The same unix timestamp goes into the signature, the payload's
    /// `timestamp` field and the outer frame's `time`, and the signature
    /// covers exactly the `req_param` JSON embedded in the frame.
    async fn send_api_frame(
        self: &Arc<Self>,
        channel: &str,
        req_param: Value,
        options: &ApiOptions,
    ) -> Result<(), GateWsError> {
        self.registry.ensure_channel(channel, &self.cancel);

        let (key, secret) = self.credentials();
        let time = Utc::now().timestamp();
        let param_json = serde_json::to_string(&req_param)?;
        let signature = signer::sign_api(&secret, channel, &param_json, time)?;

        let mut req_header = Map::new();
        req_header.insert(
            channels::CHANNEL_ID_HEADER.to_string(),
            Value::String(options.channel_id.clone().unwrap_or_default()),
        );

        let payload = ApiPayload {
            api_key: key,
            signature,
            timestamp: time.to_string(),
            req_id: options.req_id.clone().unwrap_or_else(default_req_id),
            req_header: Value::Object(req_header),
            req_param,
        };
        let frame = WsFrame {
            time,
            id: None,
            channel: channel.to_string(),
            event: WsEvent::Api,
            auth: None,
            payload: FramePayload::Api(Box::new(payload)),
        };
        transport::send_message(&self.sink, codec::encode_frame(&frame)?).await?;
        self.start_reader();
        Ok(())
    }
}

fn default_req_id() -> String {
    format!(
        "{}-{:08x}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}
