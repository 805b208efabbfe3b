// ============================================
// File: crates/dragonet-core/src/protocol/parser.rs
// ============================================
//! # Message Parser
//!
//! ## Creation Reason
//! Turns a received (already decrypted) datagram into a typed message
//! without the caller knowing which kind it is.
//!
//! ## Main Functionality
//! - `Message`: Sum type over all message kinds
//! - `parse_message`: Peek the type byte, delegate to the variant decoder
//!
//! ## Dispatch
//! ```text
//! raw ──► len >= 2? ──► raw[1] ──┬─ 0 ─► DataMessage::decode(raw)
//!                                ├─ 1 ─► CloseMessage::decode(raw)
//!                                ├─ 2 ─► AckMessage::decode(raw)
//!                                ├─ 3 ─► HeartbeatMessage::decode(raw)
//!                                └─ _ ─► UnknownType(tag)
//! ```
//!
//! The dispatcher reads nothing beyond the type byte. The variant
//! decoder re-reads from offset 0 and owns all validation, version
//! included.

use bytes::{Bytes, BytesMut};
use serde::Serialize;
use tracing::trace;

use crate::error::{CoreError, Result};
use crate::protocol::codec::{DecodeMessage, WireMessage};
use crate::protocol::messages::{
    AckMessage, CloseMessage, DataMessage, HeartbeatMessage, MessageType,
};
use crate::protocol::version::HEADER_SIZE;

// ============================================
// Message
// ============================================

/// Any decoded or outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Application payload.
    Data(DataMessage),
    /// Connection close.
    Close(CloseMessage),
    /// Acknowledgment.
    Ack(AckMessage),
    /// Liveness probe.
    Heartbeat(HeartbeatMessage),
}

impl Message {
    /// Parses a raw buffer into a message. See [`parse_message`].
    ///
    /// # Errors
    /// `ShortBuffer`, `UnknownType`, or the variant decoder's error.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let msg_type = Self::peek_type(raw)?;

        let result = match msg_type {
            MessageType::Data => DataMessage::decode(raw).map(Self::Data),
            MessageType::Close => CloseMessage::decode(raw).map(Self::Close),
            MessageType::Ack => AckMessage::decode(raw).map(Self::Ack),
            MessageType::Heartbeat => HeartbeatMessage::decode(raw).map(Self::Heartbeat),
        };

        if let Err(ref e) = result {
            trace!("Failed to decode {} message ({} bytes): {}", msg_type, raw.len(), e);
        }

        result
    }

    /// Identifies the message kind from the type byte without decoding.
    ///
    /// # Errors
    /// - `ShortBuffer` if `raw` holds fewer than 2 bytes
    /// - `UnknownType` if the tag is not registered
    pub fn peek_type(raw: &[u8]) -> Result<MessageType> {
        if raw.len() < HEADER_SIZE {
            return Err(CoreError::short_buffer("header", HEADER_SIZE, raw.len()));
        }
        MessageType::try_from(raw[1])
    }

    /// Returns the data message, if this is one.
    #[must_use]
    pub const fn as_data(&self) -> Option<&DataMessage> {
        match self {
            Self::Data(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the close message, if this is one.
    #[must_use]
    pub const fn as_close(&self) -> Option<&CloseMessage> {
        match self {
            Self::Close(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the ack message, if this is one.
    #[must_use]
    pub const fn as_ack(&self) -> Option<&AckMessage> {
        match self {
            Self::Ack(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the heartbeat message, if this is one.
    #[must_use]
    pub const fn as_heartbeat(&self) -> Option<&HeartbeatMessage> {
        match self {
            Self::Heartbeat(m) => Some(m),
            _ => None,
        }
    }

    /// Borrows the concrete message through the uniform capability set.
    #[must_use]
    pub fn as_wire(&self) -> &dyn WireMessage {
        match self {
            Self::Data(m) => m,
            Self::Close(m) => m,
            Self::Ack(m) => m,
            Self::Heartbeat(m) => m,
        }
    }
}

impl WireMessage for Message {
    fn version(&self) -> u8 {
        self.as_wire().version()
    }

    fn message_type(&self) -> MessageType {
        self.as_wire().message_type()
    }

    fn fixed_length(&self) -> u16 {
        self.as_wire().fixed_length()
    }

    fn wire_size(&self) -> usize {
        self.as_wire().wire_size()
    }

    fn encode_to(&self, buf: &mut BytesMut) {
        self.as_wire().encode_to(buf);
    }

    fn encode(&self) -> Bytes {
        self.as_wire().encode()
    }
}

impl From<DataMessage> for Message {
    fn from(msg: DataMessage) -> Self {
        Self::Data(msg)
    }
}

impl From<CloseMessage> for Message {
    fn from(msg: CloseMessage) -> Self {
        Self::Close(msg)
    }
}

impl From<AckMessage> for Message {
    fn from(msg: AckMessage) -> Self {
        Self::Ack(msg)
    }
}

impl From<HeartbeatMessage> for Message {
    fn from(msg: HeartbeatMessage) -> Self {
        Self::Heartbeat(msg)
    }
}

impl TryFrom<&[u8]> for Message {
    type Error = CoreError;

    fn try_from(raw: &[u8]) -> Result<Self> {
        Self::parse(raw)
    }
}

// ============================================
// Convenience Functions
// ============================================

/// Parses a raw message buffer.
///
/// Checks for the 2-byte header, selects the decoder by the type byte
/// and returns its result unchanged.
///
/// # Example
/// ```
/// use dragonet_core::protocol::{parse_message, HeartbeatMessage, Message, WireMessage};
///
/// let raw = HeartbeatMessage::new(7).encode();
/// let msg = parse_message(&raw).unwrap();
/// assert_eq!(msg, Message::Heartbeat(HeartbeatMessage::new(7)));
/// ```
///
/// # Errors
/// - `ShortBuffer` if `raw` is shorter than 2 bytes or truncated
/// - `UnknownType` if the tag is not registered
/// - `VersionMismatch` / `TypeMismatch` from the variant decoder
pub fn parse_message(raw: &[u8]) -> Result<Message> {
    Message::parse(raw)
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::version::PROTOCOL_VERSION;

    fn samples() -> Vec<Message> {
        vec![
            DataMessage::new(777, vec![1, 2, 3, 4]).into(),
            CloseMessage::new(777, 42).into(),
            AckMessage::new(42, vec![5, 6, 7, 8]).into(),
            HeartbeatMessage::new(777).into(),
        ]
    }

    #[test]
    fn test_dispatch_each_variant() {
        for original in samples() {
            let raw = original.encode();
            let parsed = parse_message(&raw).unwrap();

            assert_eq!(parsed, original);
            assert_eq!(parsed.message_type(), original.message_type());
            assert_eq!(parsed.version(), PROTOCOL_VERSION);
            assert_eq!(parsed.encode(), raw);
        }
    }

    #[test]
    fn test_unknown_type() {
        let raw = [PROTOCOL_VERSION, 99];
        assert_eq!(parse_message(&raw), Err(CoreError::UnknownType(99)));
    }

    #[test]
    fn test_too_short_before_type_inspection() {
        assert_eq!(
            parse_message(&[]),
            Err(CoreError::short_buffer("header", 2, 0))
        );
        assert_eq!(
            parse_message(&[PROTOCOL_VERSION]),
            Err(CoreError::short_buffer("header", 2, 1))
        );
    }

    #[test]
    fn test_decoder_error_propagated_unchanged() {
        let mut raw = HeartbeatMessage::new(1).encode().to_vec();
        raw[0] = 0x7F;
        assert_eq!(
            parse_message(&raw),
            Err(CoreError::version_mismatch(PROTOCOL_VERSION, 0x7F))
        );

        // Valid header, truncated body
        assert_eq!(
            parse_message(&[PROTOCOL_VERSION, 3, 0]),
            Err(CoreError::short_buffer("seq", 4, 1))
        );
    }

    #[test]
    fn test_accessors() {
        let msgs = samples();
        assert!(msgs[0].as_data().is_some());
        assert!(msgs[0].as_ack().is_none());
        assert_eq!(msgs[1].as_close().map(CloseMessage::status), Some(42));
        assert_eq!(msgs[2].as_ack().map(AckMessage::consumed_seq), Some(42));
        assert_eq!(msgs[3].as_heartbeat().map(HeartbeatMessage::seq), Some(777));
    }

    #[test]
    fn test_peek_type() {
        assert_eq!(Message::peek_type(&[PROTOCOL_VERSION, 2]).unwrap(), MessageType::Ack);
        // Peek does not validate the version
        assert_eq!(Message::peek_type(&[0, 0]).unwrap(), MessageType::Data);
    }

    #[test]
    fn test_serialize_json() {
        let msg: Message = CloseMessage::new(3, -1).into();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "close");
        assert_eq!(json["seq"], 3);
        assert_eq!(json["status"], -1);
    }
}
