//! Closed sets of the messages the client reads and writes.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::codec::{check_string, ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::packets::framing::skip_body;
use crate::packets::{
    id, HandshakeRequest, HandshakeResponse, Kick, LoginRequest, MapChunk, PositionLookRequest,
    PositionLookResponse,
};

/// Server → Client messages the session acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    Handshake(HandshakeResponse),
    PlayerPositionAndLook(PositionLookResponse),
    MapChunk(MapChunk),
    DisconnectOrKick(Kick),
}

/// Result of reading one framed packet off the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(IncomingMessage),
    /// A well-framed packet the client has no use for. Carries its id.
    Skipped(u8),
}

impl IncomingMessage {
    pub fn packet_id(&self) -> u8 {
        match self {
            Self::Handshake(_) => id::HANDSHAKE,
            Self::PlayerPositionAndLook(_) => id::PLAYER_POSITION_AND_LOOK,
            Self::MapChunk(_) => id::MAP_CHUNK,
            Self::DisconnectOrKick(_) => id::KICK_OR_DISCONNECT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Handshake(_) => "Handshake",
            Self::PlayerPositionAndLook(_) => "PlayerPositionAndLook",
            Self::MapChunk(_) => "MapChunk",
            Self::DisconnectOrKick(_) => "DisconnectOrKick",
        }
    }

    /// Read one packet (id byte and body).
    ///
    /// On `BufferTooShort` the buffer position is unspecified; callers decode
    /// from a scratch cursor and only commit once this returns `Ok`.
    pub fn decode(buf: &mut impl Buf) -> Result<Decoded, ProtoError> {
        ensure_remaining(buf, 1)?;
        let packet_id = buf.get_u8();
        let message = match packet_id {
            id::HANDSHAKE => Self::Handshake(HandshakeResponse::proto_decode(buf)?),
            id::PLAYER_POSITION_AND_LOOK => {
                Self::PlayerPositionAndLook(PositionLookResponse::proto_decode(buf)?)
            }
            id::MAP_CHUNK => Self::MapChunk(MapChunk::proto_decode(buf)?),
            id::KICK_OR_DISCONNECT => Self::DisconnectOrKick(Kick::proto_decode(buf)?),
            other => {
                skip_body(other, buf)?;
                return Ok(Decoded::Skipped(other));
            }
        };
        Ok(Decoded::Message(message))
    }
}

impl ProtoEncode for IncomingMessage {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.packet_id());
        match self {
            Self::Handshake(pkt) => pkt.proto_encode(buf),
            Self::PlayerPositionAndLook(pkt) => pkt.proto_encode(buf),
            Self::MapChunk(pkt) => pkt.proto_encode(buf),
            Self::DisconnectOrKick(pkt) => pkt.proto_encode(buf),
        }
    }
}

/// Client → Server requests.
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingMessage {
    Handshake(HandshakeRequest),
    Login(LoginRequest),
    PlayerPositionAndLook(PositionLookRequest),
    /// Not a packet: asks the connection to close once earlier writes are out.
    DisconnectNow,
}

impl OutgoingMessage {
    pub fn handshake(username: impl Into<String>) -> Self {
        Self::Handshake(HandshakeRequest {
            username: username.into(),
        })
    }

    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Login(LoginRequest::new(username, password))
    }

    /// Packet id on the wire; `None` for `DisconnectNow`.
    pub fn packet_id(&self) -> Option<u8> {
        match self {
            Self::Handshake(_) => Some(id::HANDSHAKE),
            Self::Login(_) => Some(id::LOGIN),
            Self::PlayerPositionAndLook(_) => Some(id::PLAYER_POSITION_AND_LOOK),
            Self::DisconnectNow => None,
        }
    }

    pub fn is_disconnect_now(&self) -> bool {
        matches!(self, Self::DisconnectNow)
    }

    /// Serialize to wire bytes. `DisconnectNow` produces nothing.
    ///
    /// Fails with `StringTooLong` when a string field exceeds the u16 length
    /// prefix.
    pub fn to_bytes(&self) -> Result<Option<Bytes>, ProtoError> {
        let Some(packet_id) = self.packet_id() else {
            return Ok(None);
        };
        match self {
            Self::Handshake(pkt) => check_string(&pkt.username)?,
            Self::Login(pkt) => {
                check_string(&pkt.username)?;
                check_string(&pkt.password)?;
            }
            Self::PlayerPositionAndLook(_) | Self::DisconnectNow => {}
        }
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u8(packet_id);
        match self {
            Self::Handshake(pkt) => pkt.proto_encode(&mut buf),
            Self::Login(pkt) => pkt.proto_encode(&mut buf),
            Self::PlayerPositionAndLook(pkt) => pkt.proto_encode(&mut buf),
            Self::DisconnectNow => {}
        }
        Ok(Some(buf.freeze()))
    }

    /// Server-side read of a client request.
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, 1)?;
        match buf.get_u8() {
            id::HANDSHAKE => Ok(Self::Handshake(HandshakeRequest::proto_decode(buf)?)),
            id::LOGIN => Ok(Self::Login(LoginRequest::proto_decode(buf)?)),
            id::PLAYER_POSITION_AND_LOOK => Ok(Self::PlayerPositionAndLook(
                PositionLookRequest::proto_decode(buf)?,
            )),
            other => Err(ProtoError::UnknownPacketId(other)),
        }
    }
}
