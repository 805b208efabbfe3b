// ============================================
// File: crates/dragonet-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the dragonet wire format: the message kinds, their binary
//! layout, and the dispatcher that turns received bytes back into
//! typed messages.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`messages`]: Tag registry and message structures
//! - [`codec`]: Binary encoding/decoding and the shared field reader
//! - [`parser`]: The `Message` sum type and `parse_message`
//! - [`version`]: Protocol version and header constants
//!
//! ## Datagram Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Outbound                                                   │
//! │    variant ──encode──► plaintext ──PacketCryptor──► socket  │
//! │                                                             │
//! │  Inbound                                                    │
//! │    socket ──PacketCryptor──► plaintext ──parse──► Message   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format Principles
//! - Big-endian byte order for multi-byte integers
//! - Byte 0 is the version, byte 1 the type tag, always
//! - Variable sections are preceded by a u16 count
//! - No padding or alignment requirements
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod codec;
pub mod messages;
pub mod parser;
pub mod version;

// Re-export primary types
pub use codec::{DecodeMessage, FieldReader, WireMessage};
pub use messages::{AckMessage, CloseMessage, DataMessage, HeartbeatMessage, MessageType};
pub use parser::{parse_message, Message};
pub use version::{ProtocolVersion, FIXED_LENGTH, HEADER_SIZE, MAX_VARIABLE_LEN, PROTOCOL_VERSION};
