//! Client-side world model: axis and angle conversion between wire and
//! internal conventions, the player's pose, and decoded terrain chunks.

pub mod angle;
pub mod chunk;
pub mod coords;
pub mod decoder;
pub mod error;
pub mod position;

pub use chunk::{Block, Chunk, ChunkCoord};
pub use decoder::decode_chunk;
pub use error::ChunkError;
pub use position::EntityPosition;
