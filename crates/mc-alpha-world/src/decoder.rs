//! Turns a MapChunk packet into a [`Chunk`].

use mc_alpha_proto::compression::decompress;
use mc_alpha_proto::packets::MapChunk;
use tracing::trace;

use crate::chunk::{Chunk, ChunkCoord};
use crate::error::ChunkError;

/// Decompress and remap a MapChunk payload.
///
/// The inflated payload starts with one block-type byte per cell, walked in
/// wire order x (outer), z, y (inner). Metadata and light arrays follow and
/// are ignored.
pub fn decode_chunk(packet: &MapChunk) -> Result<Chunk, ChunkError> {
    let (size_x, size_y, size_z) = packet.size();
    let volume = (size_x * size_y * size_z) as usize;

    // Block ids, then metadata, block light and sky light at half a byte each.
    let data = decompress(&packet.compressed_data, volume * 5 / 2)?;
    if data.len() < volume {
        return Err(ChunkError::Truncated {
            needed: volume,
            got: data.len(),
        });
    }

    let origin = ChunkCoord::from_wire(packet.x, packet.y as i32, packet.z);
    let size = ChunkCoord::from_wire(size_x, size_y, size_z);
    let mut chunk = Chunk::new(origin, size);

    let mut block_types = data.iter();
    for wx in 0..size_x {
        for wz in 0..size_z {
            for wy in 0..size_y {
                let rel = ChunkCoord::from_wire(wx, wy, wz);
                let block = chunk.block_mut(rel).ok_or(ChunkError::OutOfBounds(rel))?;
                // Length was checked against the volume above.
                block.block_type = block_types.next().copied().unwrap_or_default();
            }
        }
    }

    trace!(
        "Decoded chunk at {origin} size {size} ({} trailing bytes ignored)",
        data.len() - volume
    );
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mc_alpha_proto::compression::compress;

    fn packet(x: i32, y: i16, z: i32, minus_one: (u8, u8, u8), raw: &[u8]) -> MapChunk {
        MapChunk {
            x,
            y,
            z,
            size_x_minus_one: minus_one.0,
            size_y_minus_one: minus_one.1,
            size_z_minus_one: minus_one.2,
            compressed_data: Bytes::from(compress(raw, 6).unwrap()),
        }
    }

    #[test]
    fn two_by_two_by_two() {
        // Wire order x -> z -> y: byte n sits at wire (x, y, z) below.
        //   n  wire(x,y,z)  internal rel (z, -x, y)
        //   0  (0,0,0)      (0,  0, 0)
        //   1  (0,1,0)      (0,  0, 1)
        //   2  (0,0,1)      (1,  0, 0)
        //   3  (0,1,1)      (1,  0, 1)
        //   4  (1,0,0)      (0, -1, 0)
        //   5  (1,1,0)      (0, -1, 1)
        //   6  (1,0,1)      (1, -1, 0)
        //   7  (1,1,1)      (1, -1, 1)
        let mut raw = vec![10, 11, 12, 13, 14, 15, 16, 17];
        // Metadata and light nibbles the decoder must ignore.
        raw.extend_from_slice(&[0xEE; 12]);
        let chunk = decode_chunk(&packet(32, 0, 48, (1, 1, 1), &raw)).unwrap();

        assert_eq!(chunk.origin(), ChunkCoord::new(48, -32, 0));
        assert_eq!(chunk.size(), ChunkCoord::new(2, -2, 2));
        assert_eq!(chunk.len(), 8);

        let expected = [
            ((0, 0, 0), 10),
            ((0, 0, 1), 11),
            ((1, 0, 0), 12),
            ((1, 0, 1), 13),
            ((0, -1, 0), 14),
            ((0, -1, 1), 15),
            ((1, -1, 0), 16),
            ((1, -1, 1), 17),
        ];
        for ((x, y, z), block_type) in expected {
            let block = chunk.block(ChunkCoord::new(x, y, z)).unwrap();
            assert_eq!(block.block_type, block_type, "at ({x}, {y}, {z})");
        }
    }

    #[test]
    fn uneven_extents() {
        // 1 x 3 x 2 in wire axes: y runs fastest, then z.
        let raw = [1, 2, 3, 4, 5, 6];
        let chunk = decode_chunk(&packet(0, 0, 0, (0, 2, 1), &raw)).unwrap();
        assert_eq!(chunk.size(), ChunkCoord::new(2, -1, 3));
        assert_eq!(chunk.block(ChunkCoord::new(0, 0, 2)).unwrap().block_type, 3);
        assert_eq!(chunk.block(ChunkCoord::new(1, 0, 0)).unwrap().block_type, 4);
        assert_eq!(chunk.block(ChunkCoord::new(1, 0, 2)).unwrap().block_type, 6);
    }

    #[test]
    fn truncated_payload() {
        let err = decode_chunk(&packet(0, 0, 0, (1, 1, 1), &[1, 2, 3])).unwrap_err();
        assert!(matches!(err, ChunkError::Truncated { needed: 8, got: 3 }));
    }

    #[test]
    fn corrupt_payload() {
        let mut pkt = packet(0, 0, 0, (0, 0, 0), &[1]);
        pkt.compressed_data = Bytes::from_static(&[0x00, 0x01, 0x02]);
        assert!(matches!(decode_chunk(&pkt), Err(ChunkError::Payload(_))));
    }

    #[test]
    fn full_column() {
        let raw = vec![1u8; 16 * 128 * 16 * 5 / 2];
        let chunk = decode_chunk(&packet(-16, 0, 0, (15, 127, 15), &raw)).unwrap();
        assert_eq!(chunk.size(), ChunkCoord::new(16, -16, 128));
        assert!(chunk.cells().all(|(_, b)| b.block_type == 1));
    }
}
