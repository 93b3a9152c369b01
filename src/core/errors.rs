use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum GateWsError {
    #[error("auth key or secret empty")]
    AuthRequired,

    #[error("connect to {url} failed after {attempts} attempts: {source}")]
    Connect {
        url: String,
        attempts: u32,
        #[source]
        source: tungstenite::Error,
    },

    #[error("websocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TLS setup error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),

    #[error("websocket not connected")]
    NotConnected,
}

impl GateWsError {
    /// True when the error came from the initial dial giving up after
    /// exhausting its retry budget.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// True when the operation was rejected because credentials are missing.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}
