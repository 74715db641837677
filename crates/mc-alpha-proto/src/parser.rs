//! Streaming parser for the server → client byte stream.

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::error::ProtoError;
use crate::message::{Decoded, IncomingMessage};

/// Buffers raw transport bytes and cuts them into messages.
///
/// A message that is only partly buffered stays in the buffer untouched
/// until more bytes arrive. Well-framed packets the client does not decode
/// are consumed and dropped here, so callers only ever see
/// [`IncomingMessage`] values.
#[derive(Debug, Default)]
pub struct IncomingMessageParser {
    buffer: BytesMut,
}

impl IncomingMessageParser {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8 * 1024),
        }
    }

    /// Buffer the transport reads into directly.
    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }

    /// Bytes waiting for the rest of their message.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append a delivery and return every message it completes, in order.
    pub fn feed(&mut self, data: &[u8]) -> Result<Vec<IncomingMessage>, ProtoError> {
        self.buffer.extend_from_slice(data);
        let mut messages = Vec::new();
        while let Some(message) = self.next_message()? {
            messages.push(message);
        }
        Ok(messages)
    }

    /// Extract the next complete message, or `None` if more bytes are needed.
    ///
    /// An error means the stream can no longer be framed and must be dropped.
    pub fn next_message(&mut self) -> Result<Option<IncomingMessage>, ProtoError> {
        loop {
            let mut cursor = &self.buffer[..];
            let decoded = match IncomingMessage::decode(&mut cursor) {
                Ok(decoded) => decoded,
                Err(e) if e.is_incomplete() => return Ok(None),
                Err(e) => return Err(e),
            };
            let consumed = self.buffer.len() - cursor.len();
            self.buffer.advance(consumed);

            match decoded {
                Decoded::Message(message) => {
                    trace!("Decoded {} ({consumed} bytes)", message.name());
                    return Ok(Some(message));
                }
                Decoded::Skipped(packet_id) => {
                    trace!("Skipped packet 0x{packet_id:02X} ({consumed} bytes)");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ProtoEncode;
    use crate::packets::{id, HandshakeResponse, Kick, MapChunk, PositionLookResponse};
    use bytes::{BufMut, Bytes};
    use proptest::prelude::*;

    fn position() -> PositionLookResponse {
        PositionLookResponse {
            x: 12.5,
            stance: 71.62,
            y: 70.0,
            z: -8.25,
            yaw: 45.0,
            pitch: -10.0,
            on_ground: false,
        }
    }

    fn sample_messages() -> Vec<IncomingMessage> {
        vec![
            IncomingMessage::Handshake(HandshakeResponse::offline()),
            IncomingMessage::PlayerPositionAndLook(position()),
            IncomingMessage::MapChunk(MapChunk {
                x: 0,
                y: 0,
                z: 16,
                size_x_minus_one: 1,
                size_y_minus_one: 1,
                size_z_minus_one: 1,
                compressed_data: Bytes::from_static(&[1, 2, 3, 4, 5]),
            }),
            IncomingMessage::DisconnectOrKick(Kick::new("The server is restarting")),
        ]
    }

    /// Sample messages with unknown-but-framed packets in between.
    fn sample_stream() -> Vec<u8> {
        let mut buf = Vec::new();
        let messages = sample_messages();
        buf.put_u8(id::KEEP_ALIVE);
        messages[0].proto_encode(&mut buf);
        buf.put_u8(id::TIME_UPDATE);
        buf.put_i64(6000);
        messages[1].proto_encode(&mut buf);
        buf.put_u8(id::CHAT_MESSAGE);
        buf.put_u16(5);
        buf.put_slice(b"hello");
        messages[2].proto_encode(&mut buf);
        messages[3].proto_encode(&mut buf);
        buf
    }

    #[test]
    fn whole_stream_in_one_delivery() {
        let mut parser = IncomingMessageParser::new();
        let decoded = parser.feed(&sample_stream()).unwrap();
        assert_eq!(decoded, sample_messages());
        assert_eq!(parser.buffered(), 0);
    }

    #[test]
    fn partial_message_is_kept() {
        let stream = sample_stream();
        let mut parser = IncomingMessageParser::new();
        // Keep-alive (1) + handshake (4) + 3 bytes of the time update.
        let first = parser.feed(&stream[..8]).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(parser.buffered(), 3);
        let rest = parser.feed(&stream[8..]).unwrap();
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn byte_at_a_time() {
        let stream = sample_stream();
        let mut parser = IncomingMessageParser::new();
        let mut decoded = Vec::new();
        for byte in &stream {
            decoded.extend(parser.feed(std::slice::from_ref(byte)).unwrap());
        }
        assert_eq!(decoded, sample_messages());
    }

    #[test]
    fn only_skipped_packets_yield_nothing() {
        let mut parser = IncomingMessageParser::new();
        let decoded = parser
            .feed(&[id::KEEP_ALIVE, id::DESTROY_ENTITY, 0, 0, 0, 9])
            .unwrap();
        assert!(decoded.is_empty());
        assert_eq!(parser.buffered(), 0);
    }

    #[test]
    fn unknown_id_is_fatal() {
        let mut parser = IncomingMessageParser::new();
        let mut stream = Vec::new();
        IncomingMessage::Handshake(HandshakeResponse::offline()).proto_encode(&mut stream);
        stream.push(0x7F);

        let first = parser.next_message();
        assert!(matches!(first, Ok(None)));
        parser.buffer_mut().extend_from_slice(&stream);
        assert!(matches!(
            parser.next_message(),
            Ok(Some(IncomingMessage::Handshake(_)))
        ));
        assert!(matches!(
            parser.next_message(),
            Err(ProtoError::UnknownPacketId(0x7F))
        ));
    }

    proptest! {
        #[test]
        fn prop_split_anywhere(split in 0usize..=200) {
            let stream = sample_stream();
            let split = split.min(stream.len());

            let mut parser = IncomingMessageParser::new();
            let mut decoded = parser.feed(&stream[..split]).unwrap();
            decoded.extend(parser.feed(&stream[split..]).unwrap());

            prop_assert_eq!(decoded, sample_messages());
            prop_assert_eq!(parser.buffered(), 0);
        }
    }
}
