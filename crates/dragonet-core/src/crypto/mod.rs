// ============================================
// File: crates/dragonet-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! The framing layer never encrypts on its own. Encoded messages pass
//! through a `PacketCryptor` before transmission and received datagrams
//! pass through it before parsing. This module defines that seam and
//! ships the implementations peers use in practice.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`cryptor`]: `PacketCryptor` trait, `PlainCryptor`, `ChaChaCryptor`
//! - [`keys`]: `PacketKey` and passphrase key derivation (HKDF-SHA256)
//!
//! ## Packet Layout (ChaChaCryptor)
//! ```text
//! ┌──────────────┬───────────────────────────┬──────────────┐
//! │ nonce (12)   │ ciphertext (len of plain) │ tag (16)     │
//! └──────────────┴───────────────────────────┴──────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL implementations use RustCrypto (audited)
//! - NEVER roll your own crypto
//! - Keys implement Zeroize and never appear in Debug output
//! - Nonces are random per packet; there is no counter to persist
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod cryptor;
pub mod keys;

// Re-export primary types at module level
pub use cryptor::{ChaChaCryptor, PacketCryptor, PlainCryptor};
pub use keys::PacketKey;

// ============================================
// Constants
// ============================================

/// Size of ChaCha20-Poly1305 key in bytes.
pub const CHACHA20_KEY_SIZE: usize = 32;

/// Size of ChaCha20-Poly1305 nonce in bytes.
pub const CHACHA20_NONCE_SIZE: usize = 12;

/// Size of Poly1305 authentication tag in bytes.
pub const POLY1305_TAG_SIZE: usize = 16;

/// HKDF salt for passphrase key derivation.
pub const HKDF_SALT: &[u8] = b"dragonet-v2";

/// HKDF info label for packet keys.
pub const HKDF_INFO: &[u8] = b"dragonet-packet-key";
