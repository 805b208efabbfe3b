// ============================================
// File: crates/dragonet-core/src/crypto/cryptor.rs
// ============================================
//! # Packet Cryptors
//!
//! ## Creation Reason
//! Provides the transform applied to whole encoded messages before
//! they hit the socket, and to whole datagrams before they are parsed.
//!
//! ## Main Functionality
//! - `PacketCryptor`: Trait for packet encryption/decryption
//! - `PlainCryptor`: Identity transform (no encryption)
//! - `ChaChaCryptor`: ChaCha20-Poly1305 with a random nonce per packet
//!
//! ## ⚠️ Important Note for Next Developer
//! - `max_overhead()` is what the transport subtracts from its datagram
//!   budget; keep it exact
//! - Decryption failures never say why (tampered vs. wrong key)
//!
//! ## Last Modified
//! v0.1.0 - Initial packet cryptors

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;

use super::keys::PacketKey;
use super::{CHACHA20_NONCE_SIZE, POLY1305_TAG_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// PacketCryptor Trait
// ============================================

/// Transform applied to serialized packets.
///
/// # Purpose
/// Keeps the framing layer free of cipher choices and allows:
/// - Plaintext operation for local diagnostics
/// - Alternative cipher suites
/// - Mock implementations in tests
pub trait PacketCryptor: Send + Sync {
    /// Encrypts an encoded message.
    ///
    /// # Errors
    /// - `Encryption`: If the cipher rejects the input
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypts a received datagram.
    ///
    /// # Errors
    /// - `Decryption`: If the datagram is truncated or not authentic
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Maximum number of bytes `encrypt` adds to its input.
    fn max_overhead(&self) -> usize;

    /// Short name for logs and configuration.
    fn name(&self) -> &'static str;
}

// ============================================
// PlainCryptor
// ============================================

/// Pass-through cryptor: datagrams carry plaintext messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainCryptor;

impl PlainCryptor {
    /// Creates a new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PacketCryptor for PlainCryptor {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Ok(ciphertext.to_vec())
    }

    fn max_overhead(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

// ============================================
// ChaChaCryptor
// ============================================

/// ChaCha20-Poly1305 packet cryptor.
///
/// Output is `nonce || ciphertext || tag`; the nonce is drawn from the
/// OS random number generator for every packet.
#[derive(Debug, Clone)]
pub struct ChaChaCryptor {
    key: PacketKey,
}

impl ChaChaCryptor {
    /// Bytes added to every packet: nonce + tag.
    pub const OVERHEAD: usize = CHACHA20_NONCE_SIZE + POLY1305_TAG_SIZE;

    /// Creates a cryptor with the given key.
    #[must_use]
    pub const fn new(key: PacketKey) -> Self {
        Self { key }
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(self.key.as_bytes()))
    }
}

impl PacketCryptor for ChaChaCryptor {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; CHACHA20_NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CoreError::Encryption {
                context: "ChaCha20-Poly1305 encryption failed".into(),
            })?;

        let mut output = Vec::with_capacity(CHACHA20_NONCE_SIZE + sealed.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&sealed);
        Ok(output)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < Self::OVERHEAD {
            return Err(CoreError::Decryption);
        }

        let (nonce, sealed) = ciphertext.split_at(CHACHA20_NONCE_SIZE);
        self.cipher()
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CoreError::Decryption)
    }

    fn max_overhead(&self) -> usize {
        Self::OVERHEAD
    }

    fn name(&self) -> &'static str {
        "chacha20-poly1305"
    }
}

// ============================================
// Tests
// ============================================
