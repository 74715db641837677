//! Framing for server → client packets the client does not decode.
//!
//! The protocol has no length prefix, so skipping a packet still means
//! walking its layout. Fixed-size bodies come from a table; the few
//! variable-size ones are measured field by field.

use bytes::Buf;

use crate::codec::{ensure_remaining, read_string, skip_bytes};
use crate::error::ProtoError;
use crate::packets::id;

/// Body length of a fixed-size packet, or `None` if the id is variable-size
/// or unknown.
fn fixed_body_len(packet_id: u8) -> Option<usize> {
    let len = match packet_id {
        id::KEEP_ALIVE | id::RESPAWN => 0,
        id::PLAYER => 1,
        id::UPDATE_HEALTH => 2,
        id::DESTROY_ENTITY | id::ENTITY => 4,
        id::ADD_TO_INVENTORY | id::ANIMATION | id::ENTITY_STATUS => 5,
        id::HOLDING_CHANGE | id::ENTITY_LOOK => 6,
        id::ENTITY_RELATIVE_MOVE => 7,
        id::TIME_UPDATE | id::COLLECT_ITEM | id::ATTACH_ENTITY => 8,
        id::USE_ENTITY | id::PLAYER_LOOK | id::ENTITY_LOOK_AND_RELATIVE_MOVE | id::PRE_CHUNK => 9,
        id::ENTITY_VELOCITY => 10,
        id::PLAYER_DIGGING | id::BLOCK_CHANGE => 11,
        id::SPAWN_POSITION | id::PLAYER_BLOCK_PLACEMENT => 12,
        id::ADD_OBJECT_OR_VEHICLE => 17,
        id::ENTITY_TELEPORT => 18,
        id::MOB_SPAWN => 19,
        id::PICKUP_SPAWN => 22,
        id::PLAYER_POSITION => 33,
        _ => return None,
    };
    Some(len)
}

/// Consume the body of `packet_id` without decoding it.
///
/// Fails with `BufferTooShort` when the body is not fully buffered, and with
/// `UnknownPacketId` when the id has no known layout.
pub fn skip_body(packet_id: u8, buf: &mut impl Buf) -> Result<(), ProtoError> {
    if let Some(len) = fixed_body_len(packet_id) {
        return skip_bytes(buf, len);
    }

    match packet_id {
        id::LOGIN => {
            // entity id, two unused strings, map seed, dimension
            skip_bytes(buf, 4)?;
            read_string(buf)?;
            read_string(buf)?;
            skip_bytes(buf, 9)
        }
        id::CHAT_MESSAGE => read_string(buf).map(drop),
        id::PLAYER_INVENTORY => {
            ensure_remaining(buf, 6)?;
            buf.advance(4);
            let count = buf.get_i16();
            for _ in 0..count.max(0) {
                ensure_remaining(buf, 2)?;
                let item_id = buf.get_i16();
                if item_id != -1 {
                    // count, damage
                    skip_bytes(buf, 3)?;
                }
            }
            Ok(())
        }
        id::NAMED_ENTITY_SPAWN => {
            skip_bytes(buf, 4)?;
            read_string(buf)?;
            // position, rotation, pitch, held item
            skip_bytes(buf, 12 + 2 + 2)
        }
        id::MULTI_BLOCK_CHANGE => {
            ensure_remaining(buf, 10)?;
            buf.advance(8);
            let count = buf.get_i16().max(0) as usize;
            // coordinates (short), block types (byte), metadata (byte)
            skip_bytes(buf, count * 4)
        }
        id::COMPLEX_ENTITY => {
            ensure_remaining(buf, 12)?;
            buf.advance(10);
            let len = buf.get_i16().max(0) as usize;
            skip_bytes(buf, len)
        }
        id::EXPLOSION => {
            ensure_remaining(buf, 32)?;
            buf.advance(28);
            let count = buf.get_i32().max(0) as usize;
            skip_bytes(buf, count * 3)
        }
        other => Err(ProtoError::UnknownPacketId(other)),
    }
}
