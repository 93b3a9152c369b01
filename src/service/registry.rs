//! Per-channel delivery bookkeeping: queues, dispatcher workers, callbacks
//! and the subscription history that reconnects replay.

use crate::channels;
use crate::core::types::{SubscriptionRecord, UpdateMsg, WsEvent};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Message handler registered for one channel.
pub type Callback = Arc<dyn Fn(UpdateMsg) + Send + Sync>;

/// Queue depth per channel. Bounded so a stalled callback applies
/// backpressure to the reader instead of buffering without limit.
const QUEUE_DEPTH: usize = 64;

/// Registry shared by the reader, the dispatchers and the public handle.
///
/// A channel name maps to at most one delivery queue and one dispatcher for
/// the life of the service; queues are created lazily and never torn down.
pub(crate) struct ChannelRegistry {
    queues: Mutex<HashMap<String, mpsc::Sender<UpdateMsg>>>,
    callbacks: Arc<RwLock<HashMap<String, Callback>>>,
    unhandled: Arc<RwLock<Option<Callback>>>,
    history: Mutex<HashMap<String, Vec<SubscriptionRecord>>>,
}

impl ChannelRegistry {
    pub(crate) fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            callbacks: Arc::new(RwLock::new(HashMap::new())),
            unhandled: Arc::new(RwLock::new(None)),
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Create the channel's delivery queue and spawn its dispatcher, exactly
    /// once per channel name.
    pub(crate) fn ensure_channel(&self, channel: &str, cancel: &CancellationToken) {
        let mut queues = self.queues.lock();
        if queues.contains_key(channel) {
            return;
        }
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        queues.insert(channel.to_string(), tx);
        tokio::spawn(dispatch_loop(
            channel.to_string(),
            rx,
            Arc::clone(&self.callbacks),
            Arc::clone(&self.unhandled),
            cancel.child_token(),
        ));
    }

    pub(crate) fn queue(&self, channel: &str) -> Option<mpsc::Sender<UpdateMsg>> {
        self.queues.lock().get(channel).cloned()
    }

    /// Replace the channel's callback; the last registration wins.
    pub(crate) fn set_callback(&self, channel: &str, callback: Callback) {
        self.callbacks.write().insert(channel.to_string(), callback);
    }

    /// Remove the channel's callback; subsequent messages are dropped
    /// silently (or handed to the unhandled hook).
    pub(crate) fn clear_callback(&self, channel: &str) {
        self.callbacks.write().remove(channel);
    }

    pub(crate) fn set_unhandled(&self, callback: Callback) {
        *self.unhandled.write() = Some(callback);
    }

    pub(crate) fn clear_unhandled(&self) {
        *self.unhandled.write() = None;
    }

    /// Channels with a callback currently registered.
    pub(crate) fn registered_channels(&self) -> Vec<String> {
        self.callbacks.read().keys().cloned().collect()
    }

    pub(crate) fn record(&self, record: SubscriptionRecord) {
        self.history
            .lock()
            .entry(record.channel.clone())
            .or_default()
            .push(record);
    }

    /// Snapshot of the history, grouped per channel in call order.
    pub(crate) fn history_by_channel(&self) -> Vec<(String, Vec<SubscriptionRecord>)> {
        self.history
            .lock()
            .iter()
            .map(|(channel, records)| (channel.clone(), records.clone()))
            .collect()
    }

    /// Distinct application prefixes present in the history, for heartbeat
    /// pings.
    pub(crate) fn app_prefixes(&self) -> Vec<String> {
        let history = self.history.lock();
        let mut apps = BTreeSet::new();
        for channel in history.keys() {
            if let Some(app) = channels::app_prefix(channel) {
                apps.insert(app.to_string());
            }
        }
        apps.into_iter().collect()
    }

    /// Current market view for a channel, folded from its history:
    /// subscribe adds, unsubscribe removes, over payload tokens shaped like
    /// market identifiers.
    pub(crate) fn channel_markets(&self, channel: &str) -> Vec<String> {
        let history = self.history.lock();
        let Some(records) = history.get(channel) else {
            return Vec::new();
        };
        let mut markets = BTreeSet::new();
        for record in records {
            for token in &record.payload {
                if !token.contains('_') {
                    continue;
                }
                match record.event {
                    WsEvent::Subscribe => {
                        markets.insert(token.clone());
                    }
                    WsEvent::Unsubscribe => {
                        markets.remove(token);
                    }
                    WsEvent::Api => {}
                }
            }
        }
        markets.into_iter().collect()
    }

    /// Hand a frame without a delivery queue to the unhandled hook, if set.
    pub(crate) fn deliver_unhandled(&self, msg: UpdateMsg) {
        let hook = self.unhandled.read().clone();
        match hook {
            Some(hook) => hook(msg),
            None => trace!(channel = msg.channel_name(), "no delivery queue, dropping message"),
        }
    }
}

/// Drain one channel's queue, invoking whichever callback is registered at
/// delivery time. Callbacks run on the dispatcher task, so a slow callback
/// delays only its own channel.
async fn dispatch_loop(
    channel: String,
    mut queue: mpsc::Receiver<UpdateMsg>,
    callbacks: Arc<RwLock<HashMap<String, Callback>>>,
    unhandled: Arc<RwLock<Option<Callback>>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            next = queue.recv() => {
                let Some(msg) = next else { break };
                let callback = callbacks.read().get(&channel).cloned();
                if let Some(callback) = callback {
                    callback(msg);
                } else {
                    let hook = unhandled.read().clone();
                    match hook {
                        Some(hook) => hook(msg),
                        None => trace!(channel = %channel, "no callback registered, dropping message"),
                    }
                }
            }
        }
    }
    trace!(channel = %channel, "dispatcher stopped");
}
