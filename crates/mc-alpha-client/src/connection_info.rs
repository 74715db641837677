//! Where to connect and as whom.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 25565;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseConnectionInfoError {
    #[error("missing '@' between user and host")]
    MissingAt,
    #[error("username is empty")]
    EmptyUsername,
    #[error("host is empty")]
    EmptyHost,
    #[error("invalid port: {0}")]
    InvalidPort(String),
}

/// Server address and credentials, fixed for the lifetime of a session.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ConnectionInfo {
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: String::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

// Keeps the password out of logs.
impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "{}@[{}]:{}", self.username, self.host, self.port)
        } else {
            write!(f, "{}@{}:{}", self.username, self.host, self.port)
        }
    }
}

/// Parses `user[:password]@host[:port]`. IPv6 hosts go in brackets.
impl FromStr for ConnectionInfo {
    type Err = ParseConnectionInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (credentials, address) = s
            .rsplit_once('@')
            .ok_or(ParseConnectionInfoError::MissingAt)?;
        let (username, password) = credentials
            .split_once(':')
            .unwrap_or((credentials, ""));
        if username.is_empty() {
            return Err(ParseConnectionInfoError::EmptyUsername);
        }

        let (host, port) = if let Some(rest) = address.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or(ParseConnectionInfoError::EmptyHost)?;
            (host, tail.strip_prefix(':'))
        } else {
            match address.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (address, None),
            }
        };
        if host.is_empty() {
            return Err(ParseConnectionInfoError::EmptyHost);
        }
        let port = match port {
            Some(p) => p
                .parse()
                .map_err(|_| ParseConnectionInfoError::InvalidPort(p.to_string()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
