use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::connection_info::{ConnectionInfo, DEFAULT_PORT};

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub server: ServerSection,
    pub account: AccountSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Deserialize)]
pub struct AccountSection {
    pub username: String,
    /// Sent verbatim in the login request. Offline servers ignore it.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionSection {
    /// Position report period in milliseconds. Default: 200.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    /// Give up on an unanswered TCP connect after this many seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_heartbeat_interval_ms() -> u64 {
    200
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Timing knobs for a [`Client`](crate::Client).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub heartbeat_interval: Duration,
    pub connect_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSection::default().into()
    }
}

impl From<SessionSection> for SessionSettings {
    fn from(section: SessionSection) -> Self {
        Self::from(&section)
    }
}

impl From<&SessionSection> for SessionSettings {
    fn from(section: &SessionSection) -> Self {
        Self {
            heartbeat_interval: Duration::from_millis(section.heartbeat_interval_ms),
            connect_timeout: Duration::from_secs(section.connect_timeout_secs),
        }
    }
}

impl ClientConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        if config.session.heartbeat_interval_ms == 0 {
            return Err("session.heartbeat_interval_ms must be greater than zero".into());
        }
        Ok(config)
    }

    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo::new(&self.server.host, &self.account.username)
            .with_port(self.server.port)
            .with_password(&self.account.password)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::from(&self.session)
    }
}
