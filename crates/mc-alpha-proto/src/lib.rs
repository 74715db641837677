//! Wire protocol for the Alpha-era block-game server: packet shapes, the
//! inbound framing table and the streaming message parser.

pub mod codec;
pub mod compression;
pub mod error;
pub mod message;
pub mod packets;
pub mod parser;

pub use error::ProtoError;
pub use message::{IncomingMessage, OutgoingMessage};
pub use parser::IncomingMessageParser;
