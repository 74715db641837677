//! Client errors.

use mc_alpha_proto::ProtoError;
use mc_alpha_world::ChunkError;
use thiserror::Error;

use crate::session::LoginState;

/// The server broke the login contract.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{message} received while {state:?}")]
    UnexpectedMessage {
        message: &'static str,
        state: LoginState,
    },

    #[error("server wants authenticated login (connection hash {0:?}); only offline servers are supported")]
    AuthenticationRequired(String),
}

/// Everything that ends a session abnormally.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] ProtoError),

    #[error("encode error: {0}")]
    Encode(ProtoError),

    #[error("protocol violation: {0}")]
    Protocol(#[from] SessionError),

    #[error("bad chunk: {0}")]
    Chunk(#[from] ChunkError),
}
