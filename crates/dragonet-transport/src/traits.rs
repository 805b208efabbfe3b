// ============================================
// File: crates/dragonet-transport/src/traits.rs
// ============================================
//! # Transport Traits
//!
//! ## Creation Reason
//! Abstracts datagram I/O so the message channel and the CLI can run
//! over a real UDP socket or an in-memory mock.
//!
//! ## Main Functionality
//! - `Transport`: Datagram send/receive interface
//! - `PacketSource`: Metadata about received packets
//!
//! ## ⚠️ Important Note for Next Developer
//! - Implementations must be Send + Sync for use in async contexts
//! - Buffer management is caller's responsibility
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use std::net::SocketAddr;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::Result;

// ============================================
// PacketSource
// ============================================

/// Metadata about the source of a received packet.
///
/// Used to address replies and to measure round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketSource {
    /// Source address (IP and port).
    pub addr: SocketAddr,
    /// When the packet was received.
    pub timestamp: Instant,
}

impl PacketSource {
    /// Creates a new `PacketSource` stamped with the current time.
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timestamp: Instant::now(),
        }
    }
}

// ============================================
// Transport Trait
// ============================================

/// Abstract interface for datagram-based transport.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks.
///
/// # Example
/// ```ignore
/// async fn echo<T: Transport>(transport: &T) -> Result<()> {
///     let mut buf = [0u8; 1400];
///     loop {
///         let (len, source) = transport.recv(&mut buf).await?;
///         transport.send(&buf[..len], &source.addr).await?;
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Receives one datagram into `buf`.
    ///
    /// # Returns
    /// Tuple of (bytes received, packet source)
    ///
    /// # Errors
    /// Returns error if receive fails or the transport is shut down
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, PacketSource)>;

    /// Sends one datagram to `dest`.
    ///
    /// # Returns
    /// Number of bytes sent
    ///
    /// # Errors
    /// Returns error if send fails or the transport is shut down
    async fn send(&self, buf: &[u8], dest: &SocketAddr) -> Result<usize>;

    /// Returns the local address this transport is bound to.
    ///
    /// # Errors
    /// Returns error if address cannot be determined
    fn local_addr(&self) -> Result<SocketAddr>;

    /// Gracefully shuts down the transport.
    ///
    /// After shutdown, all operations return `ShuttingDown`.
    ///
    /// # Errors
    /// Returns error if shutdown fails
    async fn shutdown(&self) -> Result<()>;

    /// Returns `true` if the transport is still active.
    fn is_active(&self) -> bool;
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_source() {
        let addr: SocketAddr = "127.0.0.1:9225".parse().unwrap();
        let before = Instant::now();
        let source = PacketSource::new(addr);

        assert_eq!(source.addr, addr);
        assert!(source.timestamp >= before);
    }
}
