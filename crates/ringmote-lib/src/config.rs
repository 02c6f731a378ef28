//! Application configuration — TOML-based, platform-aware paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingmoteError};
use crate::protocol;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# Ringmote configuration — changes made outside the app may be overwritten.\n\n";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Broker URL, e.g. "ssl://broker.example.com:8883" or "tcp://10.0.0.5:1883".
    #[serde(default = "default_broker_url")]
    pub broker_url: String,

    /// Broker username. Empty = anonymous.
    #[serde(default)]
    pub username: String,

    /// Broker password. Empty = anonymous.
    #[serde(default)]
    pub password: String,

    /// Client identifier. Empty = generate a random one per session
    /// (the identifier must be unique per connected client).
    #[serde(default)]
    pub client_id: String,

    /// Request a clean (non-persistent) broker session.
    #[serde(default = "default_true")]
    pub clean_session: bool,

    /// Connection establishment timeout, seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// MQTT keep-alive interval, seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,

    /// Number of LEDs on the ring.
    #[serde(default = "default_led_count")]
    pub led_count: usize,

    /// Topic namespace for per-LED topics.
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,

    /// Pacing between per-LED publishes in a bulk send, milliseconds.
    #[serde(default = "default_inter_led_delay")]
    pub inter_led_delay_ms: u64,
}

fn default_broker_url() -> String {
    "ssl://localhost:8883".into()
}
fn default_topic_prefix() -> String {
    protocol::DEFAULT_TOPIC_PREFIX.into()
}
fn default_connection_timeout() -> u64 {
    30
}
fn default_keep_alive() -> u64 {
    60
}
fn default_led_count() -> usize {
    24
}
fn default_inter_led_delay() -> u64 {
    protocol::DEFAULT_INTER_LED_DELAY.as_millis() as u64
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            broker_url: default_broker_url(),
            username: String::new(),
            password: String::new(),
            client_id: String::new(),
            clean_session: true,
            connection_timeout_secs: default_connection_timeout(),
            keep_alive_secs: default_keep_alive(),
            led_count: default_led_count(),
            topic_prefix: default_topic_prefix(),
            inter_led_delay_ms: default_inter_led_delay(),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join("Ringmote"))
        }
        #[cfg(not(windows))]
        {
            dirs::config_dir().map(|p| p.join("ringmote"))
        }
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Save config to the default platform path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended to warn that manual edits may be overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// The ring parameters as a typed view.
    pub fn ring(&self) -> RingConfig {
        RingConfig {
            led_count: self.led_count,
            topic_prefix: self.topic_prefix.clone(),
        }
    }

    /// The connection parameters as a typed view.
    ///
    /// Parses `broker_url` and resolves the session client id (random
    /// when not configured). Fails with a `Config` error on an
    /// unparseable URL.
    pub fn connection(&self) -> Result<ConnectionConfig> {
        Ok(ConnectionConfig {
            broker: BrokerUrl::parse(&self.broker_url)?,
            username: self.username.clone(),
            password: self.password.clone(),
            client_id: self.effective_client_id(),
            clean_session: self.clean_session,
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
            keep_alive: Duration::from_secs(self.keep_alive_secs),
        })
    }

    /// The configured client id, or a freshly generated random one.
    pub fn effective_client_id(&self) -> String {
        if self.client_id.is_empty() {
            generate_client_id()
        } else {
            self.client_id.clone()
        }
    }

    /// The configured inter-LED pacing as a `Duration`.
    pub fn inter_led_delay(&self) -> Duration {
        Duration::from_millis(self.inter_led_delay_ms)
    }
}

/// Generate a random, session-unique client identifier.
pub fn generate_client_id() -> String {
    format!("ringmote-{:08x}", rand::random::<u32>())
}

/// Constant ring parameters: size and topic namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingConfig {
    pub led_count: usize,
    pub topic_prefix: String,
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig {
            led_count: default_led_count(),
            topic_prefix: default_topic_prefix(),
        }
    }
}

/// Everything the transport needs to establish one session.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub broker: BrokerUrl,
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub clean_session: bool,
    pub connection_timeout: Duration,
    pub keep_alive: Duration,
}

/// A parsed broker URL: transport security, host, and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerUrl {
    pub tls: bool,
    pub host: String,
    pub port: u16,
}

impl BrokerUrl {
    /// Parse `"scheme://host[:port]"`.
    ///
    /// Schemes `ssl`, `mqtts`, and `tls` select an encrypted session
    /// (default port 8883); `tcp` and `mqtt` select plaintext (default
    /// port 1883).
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| RingmoteError::Config(format!("broker URL missing scheme: {url}")))?;

        let tls = match scheme.to_ascii_lowercase().as_str() {
            "ssl" | "mqtts" | "tls" => true,
            "tcp" | "mqtt" => false,
            other => {
                return Err(RingmoteError::Config(format!(
                    "unsupported broker URL scheme: {other}"
                )))
            }
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    RingmoteError::Config(format!("invalid broker port: {port}"))
                })?;
                (host, port)
            }
            None => (rest, if tls { 8883 } else { 1883 }),
        };

        if host.is_empty() {
            return Err(RingmoteError::Config(format!("broker URL missing host: {url}")));
        }

        Ok(BrokerUrl {
            tls,
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for BrokerUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scheme = if self.tls { "ssl" } else { "tcp" };
        write!(f, "{scheme}://{}:{}", self.host, self.port)
    }
}
