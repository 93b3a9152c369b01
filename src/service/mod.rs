//! Connection lifecycle and the public service handle.
//!
//! [`WsService`] wraps one physical socket shared by every logical channel.
//! Background tasks: one read loop (started lazily on first use), one
//! dispatcher per channel, one heartbeat. All of them stop when the
//! cancellation token supplied at construction fires.

mod api;
mod heartbeat;
mod reader;
mod registry;
mod transport;

pub use api::ApiOptions;
pub use registry::Callback;

use crate::channels;
use crate::core::codec;
use crate::core::config::ConnectConfig;
use crate::core::errors::GateWsError;
use crate::core::signer;
use crate::core::types::{
    Auth, ConnectionState, FramePayload, SubscribeOptions, SubscriptionRecord, UpdateMsg, WsEvent,
    WsFrame,
};
use crate::service::registry::ChannelRegistry;
use crate::service::transport::{SharedSink, WsReadHalf};
use chrono::Utc;
use futures_util::SinkExt;
use secrecy::Secret;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// State shared by every clone of [`WsService`] and its background tasks.
pub(crate) struct ServiceInner {
    conf: parking_lot::RwLock<ConnectConfig>,
    url: String,
    status: AtomicU8,
    sink: SharedSink,
    /// Read half parked between dial and the first subscribe/API call.
    parked_read: parking_lot::Mutex<Option<WsReadHalf>>,
    reader_started: AtomicBool,
    login_once: OnceCell<()>,
    registry: ChannelRegistry,
    cancel: CancellationToken,
}

impl ServiceInner {
    fn status(&self) -> ConnectionState {
        ConnectionState::from_u8(self.status.load(Ordering::Acquire))
    }

    fn set_status(&self, status: ConnectionState) {
        self.status.store(status.as_u8(), Ordering::Release);
    }

    /// Claim the connected→reconnecting transition. Returns `false` when
    /// the service already left the connected state (closed, terminally
    /// failed, or a reconnect is underway).
    fn begin_reconnect(&self) -> bool {
        self.status
            .compare_exchange(
                ConnectionState::Connected.as_u8(),
                ConnectionState::Reconnecting.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn has_credentials(&self) -> bool {
        self.conf.read().has_credentials()
    }

    fn credentials(&self) -> (String, String) {
        let conf = self.conf.read();
        (conf.api_key().to_string(), conf.api_secret().to_string())
    }

    /// Start the read loop on first use; later calls are no-ops.
    fn start_reader(self: &Arc<Self>) {
        if self
            .reader_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        if let Some(read) = self.parked_read.lock().take() {
            tokio::spawn(reader::read_loop(Arc::clone(self), read));
        }
    }

    /// Close and drop the write half, if any.
    async fn close_socket(&self) {
        let mut guard = self.sink.lock().await;
        if let Some(mut sink) = guard.take() {
            let _ = sink.send(Message::Close(None)).await;
            let _ = sink.close().await;
        }
    }

    /// Shared send path for subscribe, unsubscribe, reconnect replay and
    /// heartbeat pings.
    ///
    /// Every frame carries the auth block; the signature always covers the
    /// subscribe event, which is what the server verifies for unsubscribe
    /// frames too. `record` appends the call to the replayable history
    /// unless the channel is transport-internal.
    async fn send_subscription(
        self: &Arc<Self>,
        event: WsEvent,
        channel: &str,
        payload: Vec<String>,
        id: Option<i64>,
        record: bool,
    ) -> Result<(), GateWsError> {
        if channels::requires_auth(channel) && !self.has_credentials() {
            return Err(GateWsError::AuthRequired);
        }
        self.registry.ensure_channel(channel, &self.cancel);

        let (key, secret) = self.credentials();
        let time = Utc::now().timestamp();
        let sign = signer::sign_subscribe(&secret, channel, time)?;
        let frame = WsFrame {
            time,
            id,
            channel: channel.to_string(),
            event,
            auth: Some(Auth {
                method: channels::AUTH_METHOD_API_KEY.to_string(),
                key,
                sign,
            }),
            payload: FramePayload::Markets(payload.clone()),
        };
        transport::send_message(&self.sink, codec::encode_frame(&frame)?).await?;

        if record && !channels::is_transport_channel(channel) {
            self.registry.record(SubscriptionRecord {
                channel: channel.to_string(),
                event,
                payload,
                id,
            });
        }
        self.start_reader();
        Ok(())
    }
}

/// Cloneable handle to one Gate.io websocket connection.
///
/// One socket carries any number of logical channels. Callbacks registered
/// per channel receive decoded [`UpdateMsg`] envelopes in server order;
/// recorded subscriptions are replayed transparently when the connection
/// drops and re-establishes.
///
/// ```no_run
/// use gate_ws::{channels, ConnectConfig, WsService};
///
/// # async fn run() -> Result<(), gate_ws::GateWsError> {
/// let service = WsService::connect(ConnectConfig::read_only()).await?;
/// service.set_callback(channels::SPOT_PUBLIC_TRADE, |msg| {
///     println!("{:?}", msg.result);
/// });
/// service
///     .subscribe(channels::SPOT_PUBLIC_TRADE, &["BTC_USDT"])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WsService {
    inner: Arc<ServiceInner>,
}

impl WsService {
    /// Dial the configured endpoint and return a connected service.
    ///
    /// Shorthand for [`connect_with_cancel`](Self::connect_with_cancel)
    /// with a token the service owns; [`close`](Self::close) cancels it.
    pub async fn connect(conf: ConnectConfig) -> Result<Self, GateWsError> {
        Self::connect_with_cancel(conf, CancellationToken::new()).await
    }

    /// Dial the configured endpoint, tying every background task to
    /// `cancel`.
    ///
    /// Fails with [`GateWsError::Connect`] once the dial retry budget is
    /// exhausted; nothing is spawned in that case.
    pub async fn connect_with_cancel(
        conf: ConnectConfig,
        cancel: CancellationToken,
    ) -> Result<Self, GateWsError> {
        let url = conf.endpoint();
        let (sink, read) = transport::dial(&url, conf.skip_tls_verify, conf.max_retries).await?;
        debug!(url = %url, app = %conf.app, "websocket connected");

        let inner = Arc::new(ServiceInner {
            conf: parking_lot::RwLock::new(conf),
            url,
            status: AtomicU8::new(ConnectionState::Connected.as_u8()),
            sink: tokio::sync::Mutex::new(Some(sink)),
            parked_read: parking_lot::Mutex::new(Some(read)),
            reader_started: AtomicBool::new(false),
            login_once: OnceCell::new(),
            registry: ChannelRegistry::new(),
            cancel,
        });
        tokio::spawn(heartbeat::ping_loop(Arc::clone(&inner)));
        Ok(Self { inner })
    }

    /// Subscribe `markets` on `channel`.
    ///
    /// Rejected with [`GateWsError::AuthRequired`] before anything is sent
    /// when the channel needs credentials and none are set. Register the
    /// callback first: messages arriving before one is set are dropped.
    pub async fn subscribe(
        &self,
        channel: &str,
        markets: &[impl AsRef<str> + Send + Sync],
    ) -> Result<(), GateWsError> {
        self.subscribe_with_options(channel, markets, SubscribeOptions::default())
            .await
    }

    /// Subscribe with an explicit numeric id echoed back in the ack.
    #[instrument(skip(self, markets))]
    pub async fn subscribe_with_options(
        &self,
        channel: &str,
        markets: &[impl AsRef<str> + Send + Sync],
        options: SubscribeOptions,
    ) -> Result<(), GateWsError> {
        let payload = to_payload(markets);
        self.inner
            .send_subscription(WsEvent::Subscribe, channel, payload, options.id, true)
            .await
    }

    /// Unsubscribe `markets` from `channel`.
    ///
    /// The delivery queue and dispatcher stay alive; only the market view
    /// derived from history shrinks.
    #[instrument(skip(self, markets))]
    pub async fn unsubscribe(
        &self,
        channel: &str,
        markets: &[impl AsRef<str> + Send + Sync],
    ) -> Result<(), GateWsError> {
        let payload = to_payload(markets);
        self.inner
            .send_subscription(WsEvent::Unsubscribe, channel, payload, None, true)
            .await
    }

    /// Register `callback` for `channel`, replacing any previous one.
    pub fn set_callback<F>(&self, channel: &str, callback: F)
    where
        F: Fn(UpdateMsg) + Send + Sync + 'static,
    {
        self.inner.registry.set_callback(channel, Arc::new(callback));
    }

    /// Drop the callback for `channel`; its messages are silently discarded
    /// from then on (the unhandled hook still sees them).
    pub fn clear_callback(&self, channel: &str) {
        self.inner.registry.clear_callback(channel);
    }

    /// Install a hook observing messages that would otherwise be dropped:
    /// frames for channels without a delivery queue and queued messages
    /// without a callback.
    pub fn set_unhandled_callback<F>(&self, callback: F)
    where
        F: Fn(UpdateMsg) + Send + Sync + 'static,
    {
        self.inner.registry.set_unhandled(Arc::new(callback));
    }

    pub fn clear_unhandled_callback(&self) {
        self.inner.registry.clear_unhandled();
    }

    /// Send an authenticated API call on `channel` (order placement,
    /// amendment, cancellation, status).
    ///
    /// The service logs in once before its first call. The call does not
    /// wait for the response; it arrives asynchronously through the
    /// callback registered for `channel`, so register it first.
    pub async fn api_request<T>(&self, channel: &str, req_param: &T) -> Result<(), GateWsError>
    where
        T: Serialize + ?Sized,
    {
        self.api_request_with_options(channel, req_param, ApiOptions::default())
            .await
    }

    /// [`api_request`](Self::api_request) with an explicit channel-id
    /// header or request id.
    #[instrument(skip(self, req_param))]
    pub async fn api_request_with_options<T>(
        &self,
        channel: &str,
        req_param: &T,
        options: ApiOptions,
    ) -> Result<(), GateWsError>
    where
        T: Serialize + ?Sized,
    {
        let req_param = serde_json::to_value(req_param)?;
        self.inner.api_call(channel, req_param, options).await
    }

    /// Markets currently subscribed on `channel`, folded from the
    /// subscribe/unsubscribe history.
    pub fn channel_markets(&self, channel: &str) -> Vec<String> {
        self.inner.registry.channel_markets(channel)
    }

    /// Channels with a registered callback.
    pub fn registered_channels(&self) -> Vec<String> {
        self.inner.registry.registered_channels()
    }

    pub fn status(&self) -> ConnectionState {
        self.inner.status()
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionState::Connected
    }

    /// Snapshot of the configuration. Secrets stay redacted when the
    /// snapshot is serialized or debug-printed.
    pub fn connect_config(&self) -> ConnectConfig {
        self.inner.conf.read().clone()
    }

    pub fn api_key(&self) -> String {
        self.inner.conf.read().api_key().to_string()
    }

    pub fn api_secret(&self) -> String {
        self.inner.conf.read().api_secret().to_string()
    }

    /// Set the API key after construction, for late-bound auth.
    pub fn set_api_key(&self, key: impl Into<String>) {
        self.inner.conf.write().api_key = Secret::new(key.into());
    }

    /// Set the API secret after construction, for late-bound auth.
    pub fn set_api_secret(&self, secret: impl Into<String>) {
        self.inner.conf.write().api_secret = Secret::new(secret.into());
    }

    pub fn max_retries(&self) -> Option<u32> {
        self.inner.conf.read().max_retries
    }

    /// Adjust the reconnect retry budget; `None` retries forever.
    pub fn set_max_retries(&self, max_retries: Option<u32>) {
        self.inner.conf.write().max_retries = max_retries;
    }

    /// Cancel every background task and close the socket. The service is
    /// unusable afterwards; construct a new one to reconnect.
    pub async fn close(&self) {
        self.inner.cancel.cancel();
        self.inner.close_socket().await;
        self.inner.set_status(ConnectionState::Disconnected);
    }
}

impl fmt::Debug for WsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsService")
            .field("url", &self.inner.url)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

fn to_payload(markets: &[impl AsRef<str> + Send + Sync]) -> Vec<String> {
    markets.iter().map(|m| m.as_ref().to_string()).collect()
}
