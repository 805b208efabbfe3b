// ============================================
// File: crates/dragonet-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines the failures a datagram can produce on its way through the
//! framing layer and the packet cryptor.
//!
//! ## Main Functionality
//! - `CoreError`: Primary error enum for core operations
//! - `Result<T>`: Result alias used across the crate
//!
//! ## Error Categories
//! 1. **Protocol Errors**: short buffers, version/type mismatch, unknown tags
//! 2. **Crypto Errors**: encryption, authentication and key failures
//! 3. **Precondition Errors**: oversized variable sections at construction
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material in error messages
//! - Protocol errors carry expected vs. observed values so the transport
//!   layer can log and drop the datagram without re-parsing it
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for framing and packet encryption.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ========================================
    // Protocol Errors
    // ========================================

    /// Fewer bytes remain than the field being read requires.
    #[error("Short buffer reading '{field}': need {needed} bytes, {remaining} remaining")]
    ShortBuffer {
        /// Wire name of the field being read
        field: &'static str,
        /// Bytes the field requires
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Version byte differs from the supported protocol version.
    #[error("Protocol version mismatch: got {got}, expected {expected}")]
    VersionMismatch {
        /// Supported version
        expected: u8,
        /// Version found on the wire
        got: u8,
    },

    /// A variant decoder saw a type byte other than its own tag.
    #[error("Message type mismatch: got {got}, expected {expected}")]
    TypeMismatch {
        /// Tag the decoder handles
        expected: u8,
        /// Tag found on the wire
        got: u8,
    },

    /// The type byte does not match any registered message kind.
    #[error("Unknown message type: {0}")]
    UnknownType(u8),

    /// A variable-length section does not fit its 16-bit count field.
    #[error("'{field}' too long: max {max} entries, got {actual}")]
    VariableTooLong {
        /// Field name
        field: &'static str,
        /// Maximum representable length
        max: usize,
        /// Requested length
        actual: usize,
    },

    // ========================================
    // Cryptographic Errors
    // ========================================

    /// Encryption operation failed.
    #[error("Encryption failed: {context}")]
    Encryption {
        /// What was being encrypted
        context: String,
    },

    /// Decryption operation failed (truncated or not authentic).
    #[error("Decryption failed: authentication error")]
    Decryption,

    /// Key derivation failed.
    #[error("Key derivation failed: {reason}")]
    KeyDerivation {
        /// Why derivation failed
        reason: String,
    },

    /// Key material could not be parsed.
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// What is wrong with the key
        reason: String,
    },
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `ShortBuffer` error.
    #[must_use]
    pub const fn short_buffer(field: &'static str, needed: usize, remaining: usize) -> Self {
        Self::ShortBuffer {
            field,
            needed,
            remaining,
        }
    }

    /// Creates a `VersionMismatch` error.
    #[must_use]
    pub const fn version_mismatch(expected: u8, got: u8) -> Self {
        Self::VersionMismatch { expected, got }
    }

    /// Creates a `TypeMismatch` error.
    #[must_use]
    pub const fn type_mismatch(expected: u8, got: u8) -> Self {
        Self::TypeMismatch { expected, got }
    }

    /// Creates an `InvalidKey` error.
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is a wire-format error.
    ///
    /// Protocol errors mean the datagram was malformed; the caller
    /// should drop it and keep reading.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::ShortBuffer { .. }
                | Self::VersionMismatch { .. }
                | Self::TypeMismatch { .. }
                | Self::UnknownType(_)
        )
    }

    /// Returns `true` if this is a cryptographic error.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::Encryption { .. }
                | Self::Decryption
                | Self::KeyDerivation { .. }
                | Self::InvalidKey { .. }
        )
    }
}

// ============================================
// Tests
// ============================================
