//! In-process Gate-style websocket server for exercising the client
//! against real sockets.

#![allow(dead_code)] // each test binary uses a different slice of this helper

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::{sleep, Instant};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Scripted stand-in for the exchange endpoint.
///
/// Records every inbound text frame, acknowledges subscribe/unsubscribe
/// the way the venue does, and lets a test push frames or cut the socket
/// to provoke a reconnect.
pub struct MockGateServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

#[derive(Default)]
struct ServerState {
    frames: Mutex<Vec<Value>>,
    connections: AtomicUsize,
    push_tx: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    kill_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl MockGateServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");
        let state = Arc::new(ServerState::default());
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => {
                        let Ok((stream, _)) = accepted else { return };
                        tokio::spawn(handle_connection(stream, Arc::clone(&accept_state)));
                    }
                    _ = &mut shutdown_rx => return,
                }
            }
        });

        Self {
            addr,
            state,
            shutdown: Mutex::new(Some(shutdown_tx)),
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Stop accepting connections; established sockets are untouched.
    /// Dials to this address are refused from now on.
    pub async fn stop_listening(&self) {
        if let Some(tx) = self.shutdown.lock().await.take() {
            let _ = tx.send(());
        }
    }

    /// Drop the most recent connection without a close handshake.
    pub async fn kill_connection(&self) {
        if let Some(tx) = self.state.kill_tx.lock().await.take() {
            let _ = tx.send(());
        }
    }

    /// Send a frame to the most recent connection.
    pub async fn push(&self, frame: &Value) {
        let guard = self.state.push_tx.lock().await;
        let tx = guard.as_ref().expect("no connection to push to");
        tx.send(Message::Text(frame.to_string()))
            .expect("connection gone");
    }

    /// Send raw bytes that need not be valid JSON.
    pub async fn push_text(&self, body: &str) {
        let guard = self.state.push_tx.lock().await;
        let tx = guard.as_ref().expect("no connection to push to");
        tx.send(Message::Text(body.to_string()))
            .expect("connection gone");
    }

    /// Connections accepted so far, including dead ones.
    pub fn connection_count(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Every text frame received so far, oldest first.
    pub async fn frames(&self) -> Vec<Value> {
        self.state.frames.lock().await.clone()
    }

    /// Frames received for `channel`, oldest first.
    pub async fn frames_on(&self, channel: &str) -> Vec<Value> {
        self.frames()
            .await
            .into_iter()
            .filter(|frame| frame["channel"] == channel)
            .collect()
    }

    /// Wait until at least `want` frames arrived in total, then return them.
    pub async fn wait_for_frames(&self, want: usize, budget: Duration) -> Vec<Value> {
        let deadline = Instant::now() + budget;
        loop {
            let frames = self.frames().await;
            if frames.len() >= want {
                return frames;
            }
            assert!(
                Instant::now() < deadline,
                "saw {} of {want} expected frames before the deadline",
                frames.len()
            );
            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Wait until `want` connections were accepted in total.
    pub async fn wait_for_connections(&self, want: usize, budget: Duration) {
        let deadline = Instant::now() + budget;
        while self.connection_count() < want {
            assert!(
                Instant::now() < deadline,
                "saw {} of {want} expected connections before the deadline",
                self.connection_count()
            );
            sleep(Duration::from_millis(10)).await;
        }
    }
}

async fn handle_connection(stream: TcpStream, state: Arc<ServerState>) {
    let Ok(ws) = accept_async(stream).await else {
        return;
    };
    state.connections.fetch_add(1, Ordering::SeqCst);

    let (push_tx, mut push_rx) = mpsc::unbounded_channel();
    let (kill_tx, mut kill_rx) = oneshot::channel::<()>();
    *state.push_tx.lock().await = Some(push_tx);
    *state.kill_tx.lock().await = Some(kill_tx);

    let (mut sink, mut read) = ws.split();
    loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let Ok(frame) = serde_json::from_str::<Value>(&text) else {
                        continue;
                    };
                    let ack = ack_for(&frame);
                    state.frames.lock().await.push(frame);
                    if let Some(ack) = ack {
                        if sink.send(Message::Text(ack.to_string())).await.is_err() {
                            return;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => {}
            },
            outbound = push_rx.recv() => match outbound {
                Some(message) => {
                    if sink.send(message).await.is_err() {
                        return;
                    }
                }
                None => return,
            },
            // drop both halves without a close frame
            _ = &mut kill_rx => return,
        }
    }
}

/// Venue-style acknowledgement for subscribe/unsubscribe frames.
fn ack_for(frame: &Value) -> Option<Value> {
    let event = frame.get("event")?.as_str()?;
    if event != "subscribe" && event != "unsubscribe" {
        return None;
    }
    Some(json!({
        "time": frame["time"],
        "id": frame["id"],
        "channel": frame["channel"],
        "event": event,
        "result": {"status": "success"}
    }))
}
