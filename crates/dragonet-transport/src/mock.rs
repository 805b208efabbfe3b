// ============================================
// File: crates/dragonet-transport/src/mock.rs
// ============================================
//! # Mock Transport Implementation
//!
//! ## Creation Reason
//! Lets channel and responder logic be tested without sockets.
//!
//! ## Main Functionality
//! - In-memory inbound queue fed by `inject`
//! - Capture of outbound datagrams via `take_sent`
//!
//! ## Usage in Tests
//! ```
//! use dragonet_transport::{MockTransport, Transport};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mock = MockTransport::new("127.0.0.1:9225".parse()?);
//! let peer = "127.0.0.1:4000".parse()?;
//!
//! mock.inject(b"datagram".to_vec(), peer);
//!
//! let mut buf = [0u8; 64];
//! let (len, source) = mock.recv(&mut buf).await?;
//! assert_eq!(&buf[..len], b"datagram");
//! assert_eq!(source.addr, peer);
//! # Ok(())
//! # }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This is for testing only
//! - Queues are bounded; overflow panics on inject, errors on send
//!
//! ## Last Modified
//! v0.1.0 - Initial mock implementation

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{Result, TransportError};
use crate::traits::{PacketSource, Transport};

// ============================================
// Constants
// ============================================

/// Maximum number of datagrams to queue in either direction.
const MAX_QUEUE_SIZE: usize = 1000;

// ============================================
// MockTransport
// ============================================

/// In-memory transport for testing.
pub struct MockTransport {
    local_addr: SocketAddr,
    /// Datagrams waiting to be received
    inbound: Mutex<VecDeque<(Vec<u8>, SocketAddr)>>,
    /// Datagrams that have been sent
    outbound: Mutex<VecDeque<(Vec<u8>, SocketAddr)>>,
    shutdown: AtomicBool,
    inbound_notify: Notify,
}

impl MockTransport {
    /// Creates a mock reporting `local_addr` as its bound address.
    #[must_use]
    pub fn new(local_addr: SocketAddr) -> Self {
        Self {
            local_addr,
            inbound: Mutex::new(VecDeque::new()),
            outbound: Mutex::new(VecDeque::new()),
            shutdown: AtomicBool::new(false),
            inbound_notify: Notify::new(),
        }
    }

    /// Queues a datagram to be returned by the next `recv()` call.
    ///
    /// # Panics
    /// Panics if the inbound queue is full.
    pub fn inject(&self, datagram: Vec<u8>, from: SocketAddr) {
        let mut queue = self.inbound.lock();
        assert!(queue.len() < MAX_QUEUE_SIZE, "Mock transport inbound queue overflow");
        queue.push_back((datagram, from));
        drop(queue);
        self.inbound_notify.notify_one();
    }

    /// Takes all datagrams sent so far, oldest first.
    #[must_use]
    pub fn take_sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.outbound.lock().drain(..).collect()
    }

    /// Returns the number of datagrams waiting to be received.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inbound.lock().len()
    }

    /// Returns the number of datagrams sent and not yet taken.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.outbound.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, PacketSource)> {
        loop {
            if !self.is_active() {
                return Err(TransportError::ShuttingDown);
            }

            // Register before checking the queue so an inject between the
            // check and the await is not missed
            let notified = self.inbound_notify.notified();

            let next = self.inbound.lock().pop_front();
            if let Some((datagram, from)) = next {
                let len = datagram.len().min(buf.len());
                buf[..len].copy_from_slice(&datagram[..len]);
                return Ok((len, PacketSource::new(from)));
            }

            notified.await;
        }
    }

    async fn send(&self, buf: &[u8], dest: &SocketAddr) -> Result<usize> {
        if !self.is_active() {
            return Err(TransportError::ShuttingDown);
        }

        let mut queue = self.outbound.lock();
        if queue.len() >= MAX_QUEUE_SIZE {
            return Err(TransportError::SendFailed {
                dest: *dest,
                reason: "outbound queue full".into(),
            });
        }
        queue.push_back((buf.to_vec(), *dest));
        Ok(buf.len())
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.local_addr)
    }

    async fn shutdown(&self) -> Result<()> {
        self.shutdown.store(true, Ordering::Release);
        self.inbound_notify.notify_waiters();
        Ok(())
    }

    fn is_active(&self) -> bool {
        !self.shutdown.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("local_addr", &self.local_addr)
            .field("pending", &self.pending_count())
            .field("sent", &self.sent_count())
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_inject_then_recv_in_order() {
        let mock = MockTransport::new(addr(9225));
        mock.inject(vec![1], addr(1));
        mock.inject(vec![2, 2], addr(2));
        assert_eq!(mock.pending_count(), 2);

        let mut buf = [0u8; 16];
        let (len, source) = mock.recv(&mut buf).await.unwrap();
        assert_eq!((&buf[..len], source.addr), (&[1u8][..], addr(1)));

        let (len, source) = mock.recv(&mut buf).await.unwrap();
        assert_eq!((&buf[..len], source.addr), (&[2u8, 2][..], addr(2)));
    }

    #[tokio::test]
    async fn test_recv_waits_for_inject() {
        let mock = Arc::new(MockTransport::new(addr(9225)));

        let receiver = {
            let mock = Arc::clone(&mock);
            tokio::spawn(async move {
                let mut buf = [0u8; 16];
                let (len, _) = mock.recv(&mut buf).await.unwrap();
                buf[..len].to_vec()
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        mock.inject(vec![7, 7, 7], addr(1));

        assert_eq!(receiver.await.unwrap(), vec![7, 7, 7]);
    }

    #[tokio::test]
    async fn test_send_is_captured() {
        let mock = MockTransport::new(addr(9225));
        mock.send(b"abc", &addr(5)).await.unwrap();

        assert_eq!(mock.sent_count(), 1);
        assert_eq!(mock.take_sent(), vec![(b"abc".to_vec(), addr(5))]);
        assert_eq!(mock.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_wakes_receiver() {
        let mock = Arc::new(MockTransport::new(addr(9225)));

        let receiver = {
            let mock = Arc::clone(&mock);
            tokio::spawn(async move {
                let mut buf = [0u8; 16];
                mock.recv(&mut buf).await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        mock.shutdown().await.unwrap();

        let result = receiver.await.unwrap();
        assert!(matches!(result, Err(TransportError::ShuttingDown)));
        assert!(matches!(
            mock.send(b"x", &addr(1)).await,
            Err(TransportError::ShuttingDown)
        ));
    }
}
