//! Keep-alive pings.
//!
//! Every tick sends one `<app>.ping` subscribe per application prefix
//! found in the subscription history, so a connection that only speaks
//! spot never pings futures and vice versa. Ping channels are excluded
//! from history, so heartbeats never show up in reconnect replays.

use crate::core::config::{parse_interval, DEFAULT_PING_INTERVAL};
use crate::core::types::{ConnectionState, WsEvent};
use crate::service::ServiceInner;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

pub(crate) async fn ping_loop(inner: Arc<ServiceInner>) {
    let configured = inner.conf.read().ping_interval.clone();
    let period = parse_interval(&configured).unwrap_or_else(|| {
        warn!(interval = %configured, "unparsable ping interval, using {DEFAULT_PING_INTERVAL}");
        Duration::from_secs(10)
    });

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => break,
            _ = ticker.tick() => {
                if inner.status() != ConnectionState::Connected {
                    continue;
                }
                for app in inner.registry.app_prefixes() {
                    let channel = format!("{app}.ping");
                    if let Err(err) = inner
                        .send_subscription(WsEvent::Subscribe, &channel, Vec::new(), None, false)
                        .await
                    {
                        warn!(channel = %channel, error = %err, "heartbeat ping failed");
                    }
                }
            }
        }
    }
    debug!("heartbeat stopped");
}
