// ============================================
// File: crates/dragonet-core/src/protocol/codec.rs
// ============================================
//! # Protocol Codec
//!
//! ## Creation Reason
//! Provides the binary encoding and decoding of every message variant,
//! with one shared field reader so truncation detection lives in a
//! single place.
//!
//! ## Main Functionality
//! - `FieldReader`: Big-endian field reads that fail on short buffers
//! - `WireMessage` trait: The uniform message capability set
//! - `DecodeMessage` trait: Per-variant decoding from raw bytes
//!
//! ## Parsing Strategy
//! 1. Read version byte, reject anything but `PROTOCOL_VERSION`
//! 2. Read type byte, reject anything but the variant's own tag
//! 3. Read fixed fields in wire order
//! 4. Read the count-prefixed variable section (Data / Ack)
//!
//! Each read checks the remaining length first and reports the exact
//! field that ran out. Trailing bytes after the message are ignored.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Encode and decode MUST stay exact inverses
//! - Never read a field before the previous check has passed
//!
//! ## Last Modified
//! v0.1.0 - Initial codec implementation

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CoreError, Result};
use crate::protocol::messages::{
    AckMessage, CloseMessage, DataMessage, HeartbeatMessage, MessageType,
};
use crate::protocol::version::{ProtocolVersion, FIXED_LENGTH, PROTOCOL_VERSION};

// ============================================
// FieldReader
// ============================================

/// Sequential big-endian reader over a received buffer.
///
/// Every read names the field it is reading so that a short buffer is
/// reported as `ShortBuffer { field, needed, remaining }`.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    buf: &'a [u8],
}

impl<'a> FieldReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(CoreError::short_buffer(field, needed, remaining));
        }
        Ok(())
    }

    /// Reads one byte.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        self.ensure(field, 1)?;
        Ok(self.buf.get_u8())
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_u16())
    }

    /// Reads a big-endian `i16`.
    pub fn read_i16(&mut self, field: &'static str) -> Result<i16> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_i16())
    }

    /// Reads a big-endian `i32`.
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_i32())
    }

    /// Reads exactly `len` bytes.
    pub fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<Bytes> {
        self.ensure(field, len)?;
        Ok(self.buf.copy_to_bytes(len))
    }

    /// Reads and validates the version and type bytes.
    ///
    /// The version is checked before the type byte is read.
    ///
    /// # Errors
    /// - `ShortBuffer` if either byte is missing
    /// - `VersionMismatch` if the version is not `PROTOCOL_VERSION`
    /// - `TypeMismatch` if the tag is not `expected`
    pub fn read_header(&mut self, expected: MessageType) -> Result<()> {
        let version = ProtocolVersion::new(self.read_u8("version")?);
        if !version.is_supported() {
            return Err(CoreError::version_mismatch(PROTOCOL_VERSION, version.as_u8()));
        }

        let tag = self.read_u8("type")?;
        if tag != expected.as_byte() {
            return Err(CoreError::type_mismatch(expected.as_byte(), tag));
        }

        Ok(())
    }
}

// ============================================
// WireMessage Trait
// ============================================

/// The capability set every message satisfies.
///
/// Object safe, so transport code can hold `&dyn WireMessage` without
/// knowing the concrete kind.
pub trait WireMessage {
    /// Protocol version this message is encoded with.
    fn version(&self) -> u8 {
        PROTOCOL_VERSION
    }

    /// Type tag of this message.
    fn message_type(&self) -> MessageType;

    /// Advertised fixed-header length. Informational only.
    fn fixed_length(&self) -> u16 {
        FIXED_LENGTH
    }

    /// Exact number of bytes `encode` produces.
    fn wire_size(&self) -> usize;

    /// Appends the encoded message to `buf`.
    fn encode_to(&self, buf: &mut BytesMut);

    /// Encodes the message into a fresh buffer.
    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.encode_to(&mut buf);
        buf.freeze()
    }
}

// ============================================
// DecodeMessage Trait
// ============================================

/// Decoding of a concrete variant from raw bytes.
pub trait DecodeMessage: WireMessage + Sized {
    /// The tag this decoder accepts.
    const MESSAGE_TYPE: MessageType;

    /// Reads the variant fields following a validated header.
    fn decode_fields(reader: &mut FieldReader<'_>) -> Result<Self>;

    /// Decodes a message from the start of `buf`.
    ///
    /// # Errors
    /// `ShortBuffer`, `VersionMismatch` or `TypeMismatch`.
    fn decode(buf: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(buf);
        reader.read_header(Self::MESSAGE_TYPE)?;
        Self::decode_fields(&mut reader)
    }
}

/// Writes the version and type bytes.
fn put_header(buf: &mut BytesMut, msg_type: MessageType) {
    buf.put_u8(ProtocolVersion::current().as_u8());
    buf.put_u8(msg_type.as_byte());
}

// ============================================
// DataMessage Codec
// ============================================

impl WireMessage for DataMessage {
    fn message_type(&self) -> MessageType {
        Self::MESSAGE_TYPE
    }

    fn wire_size(&self) -> usize {
        Self::wire_size(self)
    }

    fn encode_to(&self, buf: &mut BytesMut) {
        buf.reserve(Self::wire_size(self));
        put_header(buf, Self::MESSAGE_TYPE);
        buf.put_i32(self.seq());
        // Length fits: enforced at construction.
        buf.put_u16(self.data().len() as u16);
        buf.put_slice(self.data());
    }
}

impl DecodeMessage for DataMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Data;

    fn decode_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        let seq = reader.read_i32("seq")?;
        let data_len = reader.read_u16("dataLen")?;
        let data = reader.read_bytes("data", usize::from(data_len))?;
        Ok(Self::new(seq, data))
    }
}

// ============================================
// CloseMessage Codec
// ============================================

impl WireMessage for CloseMessage {
    fn message_type(&self) -> MessageType {
        Self::MESSAGE_TYPE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn encode_to(&self, buf: &mut BytesMut) {
        buf.reserve(Self::WIRE_SIZE);
        put_header(buf, Self::MESSAGE_TYPE);
        buf.put_i32(self.seq());
        buf.put_i16(self.status());
    }
}

impl DecodeMessage for CloseMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Close;

    fn decode_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        let seq = reader.read_i32("seq")?;
        let status = reader.read_i16("status")?;
        Ok(Self::new(seq, status))
    }
}

// ============================================
// AckMessage Codec
// ============================================

impl WireMessage for AckMessage {
    fn message_type(&self) -> MessageType {
        Self::MESSAGE_TYPE
    }

    fn wire_size(&self) -> usize {
        Self::wire_size(self)
    }

    fn encode_to(&self, buf: &mut BytesMut) {
        buf.reserve(Self::wire_size(self));
        put_header(buf, Self::MESSAGE_TYPE);
        buf.put_i32(self.consumed_seq());
        buf.put_u16(self.seq_list().len() as u16);
        for seq in self.seq_list() {
            buf.put_i32(*seq);
        }
    }
}

impl DecodeMessage for AckMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Ack;

    fn decode_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        let consumed_seq = reader.read_i32("consumedSeq")?;
        let seq_count = usize::from(reader.read_u16("seqCount")?);

        let mut seq_list = Vec::with_capacity(seq_count.min(reader.remaining() / 4));
        for _ in 0..seq_count {
            seq_list.push(reader.read_i32("seqList")?);
        }

        Ok(Self::new(consumed_seq, seq_list))
    }
}

// ============================================
// HeartbeatMessage Codec
// ============================================

impl WireMessage for HeartbeatMessage {
    fn message_type(&self) -> MessageType {
        Self::MESSAGE_TYPE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn encode_to(&self, buf: &mut BytesMut) {
        buf.reserve(Self::WIRE_SIZE);
        put_header(buf, Self::MESSAGE_TYPE);
        buf.put_i32(self.seq());
    }
}

impl DecodeMessage for HeartbeatMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Heartbeat;

    fn decode_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        let seq = reader.read_i32("seq")?;
        Ok(Self::new(seq))
    }
}

// ============================================
// Tests
// ============================================
