// ============================================
// File: crates/dragonet-core/src/protocol/version.rs
// ============================================
//! # Protocol Versioning
//!
//! ## Creation Reason
//! Holds the single protocol version every peer must agree on, plus the
//! fixed header constants shared by all message variants.
//!
//! ## Versioning Strategy
//! - Single byte version number, first byte of every message
//! - Exact match required: any other value is a decode failure
//! - Tags and field layouts never change within a version
//!
//! ## Version History
//! | Version | Description |
//! |---------|-------------|
//! | 0x02    | Data / Close / Ack / Heartbeat framing |
//!
//! ## Last Modified
//! v0.1.0 - Initial version definitions

use std::fmt;

// ============================================
// Constants
// ============================================

/// The protocol version written into, and required from, every message.
pub const PROTOCOL_VERSION: u8 = 0x02;

/// Bytes preceding any variant field: version + type.
pub const HEADER_SIZE: usize = 2;

/// Reported fixed-header length for every variant.
///
/// Informational only. Heartbeat's real fixed content is 6 bytes, but
/// peers have always advertised 8, so decoders never parse by it.
pub const FIXED_LENGTH: u16 = 8;

/// Upper bound of a 16-bit count/length prefix.
pub const MAX_VARIABLE_LEN: usize = u16::MAX as usize;

// ============================================
// ProtocolVersion
// ============================================

/// A version byte as read off the wire.
///
/// # Example
/// ```
/// use dragonet_core::protocol::ProtocolVersion;
///
/// assert!(ProtocolVersion::current().is_supported());
/// assert!(!ProtocolVersion::new(1).is_supported());
/// assert_eq!(ProtocolVersion::new(7).to_string(), "v7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion(u8);

impl ProtocolVersion {
    /// Wraps a raw version byte.
    #[must_use]
    pub const fn new(version: u8) -> Self {
        Self(version)
    }

    /// The version this build speaks.
    #[must_use]
    pub const fn current() -> Self {
        Self(PROTOCOL_VERSION)
    }

    /// Returns the raw version byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Only an exact match is supported; there is no negotiation.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        self.0 == PROTOCOL_VERSION
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version() {
        let version = ProtocolVersion::current();
        assert_eq!(version.as_u8(), PROTOCOL_VERSION);
        assert!(version.is_supported());
    }

    #[test]
    fn test_only_exact_version_supported() {
        assert!(!ProtocolVersion::new(0).is_supported());
        assert!(!ProtocolVersion::new(PROTOCOL_VERSION - 1).is_supported());
        assert!(!ProtocolVersion::new(PROTOCOL_VERSION + 1).is_supported());
        assert!(!ProtocolVersion::new(0xFF).is_supported());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(ProtocolVersion::current().to_string(), "v2");
        assert_eq!(ProtocolVersion::new(0x7F).to_string(), "v127");
    }
}
