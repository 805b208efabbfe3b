// ============================================
// File: crates/dragonet-core/src/lib.rs
// ============================================
//! # Dragonet Core - Message Framing & Packet Encryption
//!
//! ## Creation Reason
//! Defines the four control/data messages exchanged by dragonet peers
//! and their exact byte layout, so any two implementations agree on
//! every bit that crosses the wire.
//!
//! ## Main Functionality
//!
//! ### Protocol Module ([`protocol`])
//! - Message definitions (`DataMessage`, `CloseMessage`, `AckMessage`,
//!   `HeartbeatMessage`)
//! - Big-endian codec with per-field bounds checking
//! - Type-byte dispatch (`parse_message`)
//! - Protocol version constant
//!
//! ### Crypto Module ([`crypto`])
//! - `PacketCryptor` seam applied around encoded messages
//! - ChaCha20-Poly1305 packet encryption
//! - Key handling and passphrase derivation (HKDF-SHA256)
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 dragonet-cli                        │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                     │
//! │         ▼                     ▼                     │
//! │   dragonet-core  ◄──  dragonet-transport            │
//! │   You are here                                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Byte layouts are a compatibility contract; do not reorder fields
//! - Decoders must never read past the buffer; every read is checked
//! - Trailing bytes after a complete message are ignored
//! - ALL keys MUST implement Zeroize
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod protocol;

// Re-export commonly used items
pub use crypto::{ChaChaCryptor, PacketCryptor, PacketKey, PlainCryptor};
pub use error::{CoreError, Result};
pub use protocol::{
    parse_message, AckMessage, CloseMessage, DataMessage, DecodeMessage, HeartbeatMessage,
    Message, MessageType, ProtocolVersion, WireMessage, PROTOCOL_VERSION,
};
