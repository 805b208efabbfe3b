// ============================================
// File: crates/dragonet-core/src/protocol/messages.rs
// ============================================
//! # Protocol Message Definitions
//!
//! ## Creation Reason
//! Defines the closed set of message kinds exchanged between dragonet
//! peers and the typed fields each kind carries.
//!
//! ## Main Functionality
//! - `MessageType`: The tag registry (single source of truth for tags)
//! - `DataMessage`: One unit of application payload
//! - `CloseMessage`: Close notification with status code
//! - `AckMessage`: Cumulative + selective acknowledgment
//! - `HeartbeatMessage`: Liveness probe
//!
//! ## Message Layouts (bytes after the 2-byte header)
//! | Message   | Fields |
//! |-----------|--------|
//! | Data      | seq i32 · dataLen u16 · data[dataLen] |
//! | Close     | seq i32 · status i16 |
//! | Ack       | consumedSeq i32 · seqCount u16 · seqList[seqCount] i32 |
//! | Heartbeat | seq i32 |
//!
//! ## Wire Format (Big Endian)
//! All multi-byte integers are encoded in big-endian byte order.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Tags are never reused or renumbered
//! - A new kind needs a tag here, a variant struct, a codec impl and
//!   an arm in `parser::Message`
//!
//! ## Last Modified
//! v0.1.0 - Initial message definitions

use bytes::Bytes;
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::protocol::version::{HEADER_SIZE, MAX_VARIABLE_LEN};

// ============================================
// MessageType
// ============================================

/// Protocol message type identifier.
///
/// # Wire Format
/// Single byte at offset 1 of every message, right after the version.
///
/// # Values
/// | Value | Type |
/// |-------|------|
/// | 0x00 | Data |
/// | 0x01 | Close |
/// | 0x02 | Ack |
/// | 0x03 | Heartbeat |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MessageType {
    /// Application payload.
    Data = 0x00,
    /// Connection close.
    Close = 0x01,
    /// Acknowledgment.
    Ack = 0x02,
    /// Liveness probe.
    Heartbeat = 0x03,
}

impl MessageType {
    /// All registered kinds, in tag order.
    pub const ALL: [Self; 4] = [Self::Data, Self::Close, Self::Ack, Self::Heartbeat];

    /// Converts a byte to a `MessageType`.
    ///
    /// # Returns
    /// - `Some(MessageType)` if the byte is a registered tag
    /// - `None` if the byte is unknown
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Data),
            0x01 => Some(Self::Close),
            0x02 => Some(Self::Ack),
            0x03 => Some(Self::Heartbeat),
            _ => None,
        }
    }

    /// Converts the `MessageType` to its byte representation.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Human-readable name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Close => "close",
            Self::Ack => "ack",
            Self::Heartbeat => "heartbeat",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_byte(value).ok_or(CoreError::UnknownType(value))
    }
}

impl From<MessageType> for u8 {
    fn from(msg_type: MessageType) -> Self {
        msg_type.as_byte()
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rejects variable sections whose length does not fit the u16 prefix.
fn check_variable_len(field: &'static str, actual: usize) -> Result<()> {
    if actual > MAX_VARIABLE_LEN {
        return Err(CoreError::VariableTooLong {
            field,
            max: MAX_VARIABLE_LEN,
            actual,
        });
    }
    Ok(())
}

// ============================================
// DataMessage
// ============================================

/// One unit of application payload tagged with its send sequence.
///
/// # Wire Format (8 + dataLen bytes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ version (1 byte)              │ 0x02       │
/// ├────────────────────────────────────────────┤
/// │ type (1 byte)                 │ 0x00       │
/// ├────────────────────────────────────────────┤
/// │ seq (4 bytes)                 │ i32 BE     │
/// ├────────────────────────────────────────────┤
/// │ dataLen (2 bytes)             │ u16 BE     │
/// ├────────────────────────────────────────────┤
/// │ data (dataLen bytes)          │ opaque     │
/// └────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DataMessage {
    seq: i32,
    data: Bytes,
}

impl DataMessage {
    /// Creates a data message.
    ///
    /// # Panics
    /// Panics if `data` is longer than 65535 bytes; the length must fit
    /// the 16-bit `dataLen` field. Use [`DataMessage::try_new`] when the
    /// payload size is not already bounded by the caller.
    #[must_use]
    pub fn new(seq: i32, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        assert!(
            data.len() <= MAX_VARIABLE_LEN,
            "data message payload of {} bytes exceeds {MAX_VARIABLE_LEN}",
            data.len()
        );
        Self { seq, data }
    }

    /// Creates a data message, rejecting payloads that do not fit `dataLen`.
    ///
    /// # Errors
    /// `VariableTooLong` if `data` exceeds 65535 bytes.
    pub fn try_new(seq: i32, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        check_variable_len("data", data.len())?;
        Ok(Self { seq, data })
    }

    /// Sequence number of this payload.
    #[must_use]
    pub const fn seq(&self) -> i32 {
        self.seq
    }

    /// The opaque payload.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consumes the message, returning the payload.
    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Total encoded size in bytes.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + 4 + 2 + self.data.len()
    }
}

// ============================================
// CloseMessage
// ============================================

/// Request or notification to terminate a logical connection.
///
/// # Wire Format (8 bytes)
/// ```text
/// version (1) · type 0x01 (1) · seq i32 (4) · status i16 (2)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CloseMessage {
    seq: i32,
    status: i16,
}

impl CloseMessage {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = HEADER_SIZE + 4 + 2;

    /// Creates a close message.
    #[must_use]
    pub const fn new(seq: i32, status: i16) -> Self {
        Self { seq, status }
    }

    /// Sequence number marking the close point.
    #[must_use]
    pub const fn seq(&self) -> i32 {
        self.seq
    }

    /// Reason/outcome code.
    #[must_use]
    pub const fn status(&self) -> i16 {
        self.status
    }

    /// Total encoded size in bytes.
    #[must_use]
    pub const fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }
}

// ============================================
// AckMessage
// ============================================

/// Acknowledgment: one cumulative marker plus a selective list.
///
/// The order of `seq_list` is preserved across the wire; it is not a set.
///
/// # Wire Format (8 + 4 × seqCount bytes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ version (1 byte)              │ 0x02       │
/// │ type (1 byte)                 │ 0x02       │
/// │ consumedSeq (4 bytes)         │ i32 BE     │
/// │ seqCount (2 bytes)            │ u16 BE     │
/// │ seqList (4 × seqCount bytes)  │ i32 BE     │
/// └────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AckMessage {
    consumed_seq: i32,
    seq_list: Vec<i32>,
}

impl AckMessage {
    /// Creates an acknowledgment.
    ///
    /// # Panics
    /// Panics if `seq_list` holds more than 65535 entries.
    #[must_use]
    pub fn new(consumed_seq: i32, seq_list: Vec<i32>) -> Self {
        assert!(
            seq_list.len() <= MAX_VARIABLE_LEN,
            "ack list of {} entries exceeds {MAX_VARIABLE_LEN}",
            seq_list.len()
        );
        Self {
            consumed_seq,
            seq_list,
        }
    }

    /// Creates an acknowledgment, rejecting lists that do not fit `seqCount`.
    ///
    /// # Errors
    /// `VariableTooLong` if `seq_list` exceeds 65535 entries.
    pub fn try_new(consumed_seq: i32, seq_list: Vec<i32>) -> Result<Self> {
        check_variable_len("seqList", seq_list.len())?;
        Ok(Self {
            consumed_seq,
            seq_list,
        })
    }

    /// Highest contiguous sequence number fully consumed.
    #[must_use]
    pub const fn consumed_seq(&self) -> i32 {
        self.consumed_seq
    }

    /// Selectively acknowledged sequence numbers, in wire order.
    #[must_use]
    pub fn seq_list(&self) -> &[i32] {
        &self.seq_list
    }

    /// Total encoded size in bytes.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + 4 + 2 + 4 * self.seq_list.len()
    }
}

// ============================================
// HeartbeatMessage
// ============================================

/// Liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HeartbeatMessage {
    seq: i32,
}

impl HeartbeatMessage {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = HEADER_SIZE + 4;

    /// Creates a heartbeat.
    #[must_use]
    pub const fn new(seq: i32) -> Self {
        Self { seq }
    }

    /// Sequence number of this probe.
    #[must_use]
    pub const fn seq(&self) -> i32 {
        self.seq
    }

    /// Total encoded size in bytes.
    #[must_use]
    pub const fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }
}

// ============================================
// Tests
// ============================================
