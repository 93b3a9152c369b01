use crate::channels;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fmt;
use std::time::Duration;

/// Fallback heartbeat interval, also used when the configured string does
/// not parse.
pub const DEFAULT_PING_INTERVAL: &str = "10s";

/// Exchange application a connection belongs to.
///
/// Selects the default endpoint and the login channel for API calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum App {
    #[default]
    Spot,
    Futures,
}

impl App {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Futures => "futures",
        }
    }

    /// Login channel used before the first authenticated API call.
    pub fn login_channel(self) -> &'static str {
        match self {
            Self::Spot => channels::SPOT_LOGIN,
            Self::Futures => channels::FUTURES_LOGIN,
        }
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement currency for futures endpoints. Ignored for spot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Settle {
    #[default]
    Usdt,
    Btc,
}

impl fmt::Display for Settle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usdt => f.write_str("usdt"),
            Self::Btc => f.write_str("btc"),
        }
    }
}

/// Connection configuration for a websocket service instance.
///
/// Everything is fixed at construction except the credentials and the retry
/// budget, which the service exposes setters for (some private channels only
/// learn their key after start-up).
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub app: App,
    pub settle: Settle,
    pub testnet: bool,
    /// Explicit endpoint override; when `None` the URL is derived from
    /// `app`/`settle`/`testnet`.
    pub url: Option<String>,
    pub api_key: Secret<String>,
    pub api_secret: Secret<String>,
    /// Dial retry budget. `Some(0)` gives up on the first failure; `None`
    /// retries forever.
    pub max_retries: Option<u32>,
    pub skip_tls_verify: bool,
    /// Gates the per-channel "resubscribed" info logs after a reconnect.
    pub show_reconnect_msg: bool,
    /// Heartbeat interval as a duration string, e.g. `"10s"` or `"500ms"`.
    pub ping_interval: String,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            app: App::Spot,
            settle: Settle::Usdt,
            testnet: false,
            url: None,
            api_key: Secret::new(String::new()),
            api_secret: Secret::new(String::new()),
            max_retries: None,
            skip_tls_verify: false,
            show_reconnect_msg: true,
            ping_interval: DEFAULT_PING_INTERVAL.to_string(),
        }
    }
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ConnectConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ConnectConfig", 10)?;
        state.serialize_field("app", &self.app)?;
        state.serialize_field("settle", &self.settle)?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("api_secret", "[REDACTED]")?;
        state.serialize_field("max_retries", &self.max_retries)?;
        state.serialize_field("skip_tls_verify", &self.skip_tls_verify)?;
        state.serialize_field("show_reconnect_msg", &self.show_reconnect_msg)?;
        state.serialize_field("ping_interval", &self.ping_interval)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ConnectConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConnectConfigHelper {
            #[serde(default)]
            app: App,
            #[serde(default)]
            settle: Settle,
            #[serde(default)]
            testnet: bool,
            #[serde(default)]
            url: Option<String>,
            #[serde(default)]
            api_key: String,
            #[serde(default)]
            api_secret: String,
            #[serde(default)]
            max_retries: Option<u32>,
            #[serde(default)]
            skip_tls_verify: bool,
            #[serde(default = "default_show_reconnect")]
            show_reconnect_msg: bool,
            #[serde(default = "default_ping_interval")]
            ping_interval: String,
        }

        fn default_show_reconnect() -> bool {
            true
        }
        fn default_ping_interval() -> String {
            DEFAULT_PING_INTERVAL.to_string()
        }
        let helper = ConnectConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            app: helper.app,
            settle: helper.settle,
            testnet: helper.testnet,
            url: helper.url,
            api_key: Secret::new(helper.api_key),
            api_secret: Secret::new(helper.api_secret),
            max_retries: helper.max_retries,
            skip_tls_verify: helper.skip_tls_verify,
            show_reconnect_msg: helper.show_reconnect_msg,
            ping_interval: helper.ping_interval,
        })
    }
}

impl ConnectConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            api_secret: Secret::new(api_secret),
            ..Self::default()
        }
    }

    /// Create configuration for public channels only; authenticated
    /// subscriptions and API calls will be rejected until credentials are
    /// set.
    #[must_use]
    pub fn read_only() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `GATE_API_KEY`
    /// - `GATE_API_SECRET`
    /// - `GATE_APP` (optional, `spot` or `futures`, defaults to spot)
    /// - `GATE_TESTNET` (optional, defaults to false)
    /// - `GATE_WS_URL` (optional endpoint override)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("GATE_API_KEY")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("GATE_API_KEY".to_string()))?;

        let api_secret = env::var("GATE_API_SECRET")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("GATE_API_SECRET".to_string()))?;

        let app = match env::var("GATE_APP").as_deref() {
            Ok("futures") => App::Futures,
            Ok("spot") | Err(_) => App::Spot,
            Ok(other) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "unknown GATE_APP value: {other}"
                )))
            }
        };

        let testnet = env::var("GATE_TESTNET")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let url = env::var("GATE_WS_URL").ok();

        Ok(Self {
            app,
            testnet,
            url,
            api_key: Secret::new(api_key),
            api_secret: Secret::new(api_secret),
            ..Self::default()
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// This method first loads environment variables from a .env file (if it
    /// exists), then reads the configuration using the standard environment
    /// variable names.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file doesn't exist, that's okay - continue with system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env()
    }

    /// Check if this configuration has valid credentials for authenticated
    /// operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.api_secret.expose_secret().is_empty()
    }

    /// Select the futures application
    #[must_use]
    pub const fn app(mut self, app: App) -> Self {
        self.app = app;
        self
    }

    /// Set the futures settlement currency
    #[must_use]
    pub const fn settle(mut self, settle: Settle) -> Self {
        self.settle = settle;
        self
    }

    /// Set testnet mode (futures endpoints only)
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set an explicit endpoint URL
    #[must_use]
    pub fn url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    /// Bound the dial retry budget; zero gives up on the first failure
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Disable TLS certificate verification (test environments only)
    #[must_use]
    pub const fn skip_tls_verify(mut self, skip: bool) -> Self {
        self.skip_tls_verify = skip;
        self
    }

    /// Toggle per-channel replay logs after reconnect
    #[must_use]
    pub const fn show_reconnect_msg(mut self, show: bool) -> Self {
        self.show_reconnect_msg = show;
        self
    }

    /// Set the heartbeat interval string (e.g. `"10s"`)
    #[must_use]
    pub fn ping_interval(mut self, interval: impl Into<String>) -> Self {
        self.ping_interval = interval.into();
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get API secret (use carefully - exposes secret)
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Endpoint to dial: the explicit override, or the URL derived from
    /// app/settle/testnet.
    pub fn endpoint(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        match (self.app, self.testnet) {
            (App::Spot, _) => channels::SPOT_URL.to_string(),
            (App::Futures, false) => match self.settle {
                Settle::Usdt => channels::FUTURES_USDT_URL.to_string(),
                Settle::Btc => channels::FUTURES_BTC_URL.to_string(),
            },
            (App::Futures, true) => match self.settle {
                Settle::Usdt => channels::FUTURES_USDT_TESTNET_URL.to_string(),
                Settle::Btc => channels::FUTURES_BTC_TESTNET_URL.to_string(),
            },
        }
    }
}

/// Parse a duration string of the form `<number><unit>` with units `ms`,
/// `s`, `m` or `h`; a bare number is taken as seconds. Returns `None` for
/// anything else so callers can fall back to [`DEFAULT_PING_INTERVAL`].
pub fn parse_interval(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(secs) = s.parse::<u64>() {
        return (secs > 0).then(|| Duration::from_secs(secs));
    }

    let split = s.find(|c: char| !c.is_ascii_digit())?;
    let (value, unit) = s.split_at(split);
    let value = value.parse::<u64>().ok()?;
    if value == 0 {
        return None;
    }
    match unit {
        "ms" => Some(Duration::from_millis(value)),
        "s" => Some(Duration::from_secs(value)),
        "m" => Some(Duration::from_secs(value * 60)),
        "h" => Some(Duration::from_secs(value * 3600)),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_is_spot() {
        let config = ConnectConfig::read_only();
        assert_eq!(config.endpoint(), channels::SPOT_URL);
        // unbounded dial retries unless the caller sets a budget
        assert_eq!(config.max_retries, None);
        assert_eq!(config.max_retries(3).max_retries, Some(3));
    }

    #[test]
    fn test_futures_endpoint_derivation() {
        let config = ConnectConfig::read_only().app(App::Futures);
        assert_eq!(config.endpoint(), channels::FUTURES_USDT_URL);

        let config = ConnectConfig::read_only().app(App::Futures).settle(Settle::Btc);
        assert_eq!(config.endpoint(), channels::FUTURES_BTC_URL);

        let config = ConnectConfig::read_only().app(App::Futures).testnet(true);
        assert_eq!(config.endpoint(), channels::FUTURES_USDT_TESTNET_URL);
    }

    #[test]
    fn test_explicit_url_wins() {
        let config = ConnectConfig::read_only()
            .app(App::Futures)
            .url("ws://127.0.0.1:9001".to_string());
        assert_eq!(config.endpoint(), "ws://127.0.0.1:9001");
    }

    #[test]
    fn test_has_credentials() {
        assert!(!ConnectConfig::read_only().has_credentials());
        assert!(!ConnectConfig::new("key".to_string(), String::new()).has_credentials());
        assert!(ConnectConfig::new("key".to_string(), "secret".to_string()).has_credentials());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("10s"), Some(Duration::from_secs(10)));
        assert_eq!(parse_interval("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_interval("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_interval("1h"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_interval("15"), Some(Duration::from_secs(15)));
        assert_eq!(parse_interval(""), None);
        assert_eq!(parse_interval("0s"), None);
        assert_eq!(parse_interval("abc"), None);
        assert_eq!(parse_interval("10x"), None);
    }

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = ConnectConfig::new("key-123".to_string(), "hunter2".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("key-123"));
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_login_channel_selection() {
        assert_eq!(App::Spot.login_channel(), channels::SPOT_LOGIN);
        assert_eq!(App::Futures.login_channel(), channels::FUTURES_LOGIN);
    }
}
