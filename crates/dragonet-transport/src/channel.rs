// ============================================
// File: crates/dragonet-transport/src/channel.rs
// ============================================
//! # Message Channel
//!
//! ## Creation Reason
//! Joins a datagram `Transport`, a `PacketCryptor` and the core codec
//! so callers exchange typed messages instead of raw bytes.
//!
//! ## Datagram Pipeline
//! ```text
//! send:  WireMessage ──encode──► plaintext ──encrypt──► datagram ──► socket
//!                                                        │
//!                                          size > max? ──┴──► DatagramTooLarge
//!
//! recv:  socket ──► datagram ──decrypt──► plaintext ──parse_message──► Message
//!                      │
//!        size > max? ──┴──► OversizedDatagram
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - One message per datagram; trailing bytes after it are ignored
//! - `recv` surfaces malformed datagrams as `TransportError::Core`;
//!   `recv_valid` drops them and keeps reading
//! - Oversized messages are rejected before the socket is touched
//! - The receive buffer is one byte over budget so an oversized inbound
//!   datagram is detected instead of silently truncated
//!
//! ## Last Modified
//! v0.1.0 - Initial message channel

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use dragonet_core::protocol::{parse_message, Message, WireMessage};
use dragonet_core::PacketCryptor;

use crate::error::{Result, TransportError};
use crate::traits::{PacketSource, Transport};

// ============================================
// Constants
// ============================================

/// Largest payload a UDP datagram can carry over IPv4.
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// Smallest datagram budget accepted.
pub const MIN_DATAGRAM_SIZE: usize = 64;

/// Default datagram budget, below common path MTUs.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1400;

/// Bytes a data message spends before its payload: version, type, seq, dataLen.
pub const DATA_MESSAGE_OVERHEAD: usize = 8;

// ============================================
// MessageChannel
// ============================================

/// Typed, optionally encrypted message exchange over a transport.
///
/// # Example
/// ```ignore
/// let channel = MessageChannel::new(transport, cryptor, 1400)?;
/// channel.send(&HeartbeatMessage::new(1), &peer).await?;
/// let (reply, source) = channel.recv_valid().await?;
/// ```
pub struct MessageChannel<T: Transport> {
    transport: T,
    cryptor: Arc<dyn PacketCryptor>,
    max_datagram_size: usize,
}

impl<T: Transport> MessageChannel<T> {
    /// Creates a channel over `transport`.
    ///
    /// # Errors
    /// `InvalidConfig` if `max_datagram_size` is outside
    /// `MIN_DATAGRAM_SIZE..=MAX_UDP_PAYLOAD` or leaves no room for a
    /// data payload after the cryptor overhead.
    pub fn new(
        transport: T,
        cryptor: Arc<dyn PacketCryptor>,
        max_datagram_size: usize,
    ) -> Result<Self> {
        if !(MIN_DATAGRAM_SIZE..=MAX_UDP_PAYLOAD).contains(&max_datagram_size) {
            return Err(TransportError::invalid_config(
                "max_datagram_size",
                format!("must be between {MIN_DATAGRAM_SIZE} and {MAX_UDP_PAYLOAD}"),
            ));
        }

        if max_datagram_size <= cryptor.max_overhead() + DATA_MESSAGE_OVERHEAD {
            return Err(TransportError::invalid_config(
                "max_datagram_size",
                format!(
                    "{} leaves no payload room after {} bytes of {} overhead",
                    max_datagram_size,
                    cryptor.max_overhead(),
                    cryptor.name()
                ),
            ));
        }

        Ok(Self {
            transport,
            cryptor,
            max_datagram_size,
        })
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the configured datagram budget.
    #[must_use]
    pub const fn max_datagram_size(&self) -> usize {
        self.max_datagram_size
    }

    /// Largest data payload that fits one datagram.
    #[must_use]
    pub fn max_payload(&self) -> usize {
        self.max_datagram_size - self.cryptor.max_overhead() - DATA_MESSAGE_OVERHEAD
    }

    /// Encodes and encrypts `msg` into a datagram.
    ///
    /// # Errors
    /// - `DatagramTooLarge` if the sealed datagram exceeds the budget
    /// - `Core(Encryption)` if the cryptor fails
    pub fn seal<M>(&self, msg: &M) -> Result<Vec<u8>>
    where
        M: WireMessage + ?Sized,
    {
        let plaintext = msg.encode();
        let datagram = self.cryptor.encrypt(&plaintext)?;

        if datagram.len() > self.max_datagram_size {
            return Err(TransportError::DatagramTooLarge {
                size: datagram.len(),
                max: self.max_datagram_size,
            });
        }

        Ok(datagram)
    }

    /// Decrypts and parses one received datagram.
    ///
    /// # Errors
    /// `Core` with the decryption or decode failure.
    pub fn open(&self, datagram: &[u8]) -> Result<Message> {
        let plaintext = self.cryptor.decrypt(datagram)?;
        Ok(parse_message(&plaintext)?)
    }

    /// Sends one message to `dest`.
    ///
    /// # Errors
    /// Errors from [`seal`](Self::seal) or the transport.
    pub async fn send<M>(&self, msg: &M, dest: &SocketAddr) -> Result<usize>
    where
        M: WireMessage + Sync + ?Sized,
    {
        let datagram = self.seal(msg)?;
        trace!(
            "Sending {} message ({} bytes) to {}",
            msg.message_type(),
            datagram.len(),
            dest
        );
        self.transport.send(&datagram, dest).await
    }

    /// Receives one datagram and returns the message it carries.
    ///
    /// # Errors
    /// - Transport errors from the socket
    /// - `OversizedDatagram` if the datagram exceeds the budget
    /// - `Core` if the datagram is malformed
    pub async fn recv(&self) -> Result<(Message, PacketSource)> {
        let mut buf = vec![0u8; self.max_datagram_size + 1];
        let (len, source) = self.transport.recv(&mut buf).await?;
        if len > self.max_datagram_size {
            return Err(TransportError::OversizedDatagram {
                from: source.addr,
                max: self.max_datagram_size,
            });
        }
        let msg = self.open(&buf[..len])?;
        trace!("Received {} message from {}", msg.message_type(), source.addr);
        Ok((msg, source))
    }

    /// Receives the next well-formed message, dropping malformed datagrams.
    ///
    /// # Errors
    /// Transport errors only.
    pub async fn recv_valid(&self) -> Result<(Message, PacketSource)> {
        loop {
            match self.recv().await {
                Ok(received) => return Ok(received),
                Err(e) if e.is_malformed_datagram() => {
                    debug!("Dropping malformed datagram: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// [`recv_valid`](Self::recv_valid) bounded by `timeout`.
    ///
    /// # Errors
    /// `Timeout` if nothing valid arrives in time.
    pub async fn recv_timeout(&self, timeout: Duration) -> Result<(Message, PacketSource)> {
        tokio::time::timeout(timeout, self.recv_valid())
            .await
            .map_err(|_| TransportError::timeout(format!("receive after {timeout:?}")))?
    }

    /// Shuts down the underlying transport.
    ///
    /// # Errors
    /// Errors from the transport.
    pub async fn shutdown(&self) -> Result<()> {
        self.transport.shutdown().await
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for MessageChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageChannel")
            .field("transport", &self.transport)
            .field("cryptor", &self.cryptor.name())
            .field("max_datagram_size", &self.max_datagram_size)
            .finish()
    }
}

// ============================================
// Tests
// ============================================
