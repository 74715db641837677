//! Client for Alpha-era block-game servers: connection lifecycle, login
//! handshake, position heartbeat and terrain updates.

pub mod config;
pub mod connection_info;
pub mod controller;
pub mod error;
pub mod event;
pub mod heartbeat;
pub mod session;

pub use config::{ClientConfig, SessionSettings};
pub use connection_info::ConnectionInfo;
pub use controller::{Client, WorkerHandle};
pub use error::{ClientError, SessionError};
pub use event::{ClientEvent, Termination};
pub use session::LoginState;
