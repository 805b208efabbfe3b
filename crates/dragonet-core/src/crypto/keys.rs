// ============================================
// File: crates/dragonet-core/src/crypto/keys.rs
// ============================================
//! # Packet Keys
//!
//! ## Creation Reason
//! Holds the symmetric key shared by both peers and the ways of
//! obtaining it: raw bytes, a base64 string from configuration, or a
//! shared passphrase stretched with HKDF-SHA256.
//!
//! ## Derivation
//! ```text
//! packet_key = HKDF-SHA256(
//!     ikm:  passphrase bytes,
//!     salt: "dragonet-v2",
//!     info: "dragonet-packet-key"
//! )
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Keys are zeroed on drop
//! - Debug output is redacted; never log `to_base64()`

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{CHACHA20_KEY_SIZE, HKDF_INFO, HKDF_SALT};
use crate::error::{CoreError, Result};

// ============================================
// PacketKey
// ============================================

/// Symmetric key for packet encryption.
///
/// # Security
/// - Zeroed on drop
/// - Never logged
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PacketKey([u8; CHACHA20_KEY_SIZE]);

impl PacketKey {
    /// Creates a key from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; CHACHA20_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a key from a byte slice.
    ///
    /// # Errors
    /// `InvalidKey` if the slice is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; CHACHA20_KEY_SIZE] = bytes.try_into().map_err(|_| {
            CoreError::invalid_key(format!(
                "expected {CHACHA20_KEY_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Decodes a base64 key string.
    ///
    /// # Errors
    /// `InvalidKey` if the string is not valid base64 or not 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let mut bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CoreError::invalid_key(format!("invalid base64: {e}")))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Derives a key from a passphrase shared by both peers.
    ///
    /// # Errors
    /// - `InvalidKey` if the passphrase is empty
    /// - `KeyDerivation` if HKDF expansion fails
    pub fn derive_from_passphrase(passphrase: &str) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(CoreError::invalid_key("passphrase cannot be empty"));
        }

        let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), passphrase.as_bytes());
        let mut key = [0u8; CHACHA20_KEY_SIZE];
        hk.expand(HKDF_INFO, &mut key)
            .map_err(|_| CoreError::KeyDerivation {
                reason: "HKDF expansion failed".into(),
            })?;

        Ok(Self(key))
    }

    /// Generates a random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut key = [0u8; CHACHA20_KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; CHACHA20_KEY_SIZE] {
        &self.0
    }

    /// Encodes the key as base64, for writing configuration files.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }
}

impl fmt::Debug for PacketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        write!(f, "PacketKey([REDACTED])")
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_length() {
        assert!(PacketKey::from_slice(&[0u8; 32]).is_ok());
        assert!(matches!(
            PacketKey::from_slice(&[0u8; 31]),
            Err(CoreError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_base64_roundtrip() {
        let key = PacketKey::generate();
        let restored = PacketKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key.as_bytes(), restored.as_bytes());

        assert!(PacketKey::from_base64("not base64!").is_err());
        assert!(PacketKey::from_base64("AAAA").is_err());
    }

    #[test]
    fn test_passphrase_derivation_is_deterministic() {
        let a = PacketKey::derive_from_passphrase("correct horse").unwrap();
        let b = PacketKey::derive_from_passphrase("correct horse").unwrap();
        let c = PacketKey::derive_from_passphrase("battery staple").unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
        assert!(PacketKey::derive_from_passphrase("").is_err());
    }

    #[test]
    fn test_debug_redacted() {
        let key = PacketKey::from_bytes([0x42; 32]);
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("42"));
    }
}
