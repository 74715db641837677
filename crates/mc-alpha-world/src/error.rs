use thiserror::Error;

use crate::chunk::ChunkCoord;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("chunk payload: {0}")]
    Payload(#[from] mc_alpha_proto::ProtoError),

    #[error("chunk payload too short: need {needed} block bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("relative coordinate {0} is outside the chunk")]
    OutOfBounds(ChunkCoord),
}
