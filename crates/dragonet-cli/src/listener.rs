// ============================================
// File: crates/dragonet-cli/src/listener.rs
// ============================================
//! # Echo Listener
//!
//! ## Creation Reason
//! Runs a diagnostic peer that answers heartbeats, acknowledges data
//! and echoes closes, so encoders and network paths can be checked
//! against a known-good implementation.
//!
//! ## Main Loop
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ select!                                      │
//! │   shutdown_rx.recv() ──────────► break       │
//! │   channel.recv_valid() ─► reply_to(msg)      │
//! │                              │               │
//! │                              ▼               │
//! │                   channel.send(reply, src)   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - No sessions: every datagram is answered on its own
//! - Malformed datagrams are dropped inside `recv_valid`
//! - `run_until` always drains the loop, even when the stop signal
//!   itself fails
//!
//! ## Last Modified
//! v0.1.0 - Initial listener

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use dragonet_core::protocol::{Message, WireMessage};
use dragonet_transport::{MessageChannel, Transport, TransportError};

use crate::error::{CliError, Result};
use crate::responder::reply_to;

// ============================================
// Listener
// ============================================

/// Diagnostic echo peer.
///
/// # Lifecycle
/// 1. Create with `Listener::new(channel)`
/// 2. Run with `listener.run().await`
/// 3. Stop with `listener.shutdown()` from another task
pub struct Listener<T: Transport> {
    channel: MessageChannel<T>,
    shutdown: AtomicBool,
    shutdown_tx: broadcast::Sender<()>,
    received: AtomicU64,
    replied: AtomicU64,
}

impl<T: Transport> Listener<T> {
    /// Creates a listener answering on `channel`.
    #[must_use]
    pub fn new(channel: MessageChannel<T>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            channel,
            shutdown: AtomicBool::new(false),
            shutdown_tx,
            received: AtomicU64::new(0),
            replied: AtomicU64::new(0),
        }
    }

    /// Returns the address peers should send to.
    ///
    /// # Errors
    /// Errors from the transport.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.channel.transport().local_addr()?)
    }

    /// Number of well-formed messages received so far.
    #[must_use]
    pub fn received_count(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Number of replies sent so far.
    #[must_use]
    pub fn replied_count(&self) -> u64 {
        self.replied.load(Ordering::Relaxed)
    }

    /// Answers messages until [`shutdown`](Self::shutdown) is called.
    ///
    /// # Errors
    /// Fatal transport errors. Malformed datagrams and failed replies
    /// are logged and skipped.
    pub async fn run(&self) -> Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!(
            "Listening on {} (max datagram {} bytes)",
            self.local_addr()?,
            self.channel.max_datagram_size()
        );

        while !self.shutdown.load(Ordering::SeqCst) {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Listener received shutdown signal");
                    break;
                }
                result = self.channel.recv_valid() => {
                    match result {
                        Ok((msg, source)) => self.handle(&msg, source.addr).await,
                        Err(TransportError::ShuttingDown) => break,
                        Err(e) if e.is_retryable() => {
                            warn!("Receive error: {}", e);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        if let Err(e) = self.channel.shutdown().await {
            warn!("Transport shutdown error: {}", e);
        }

        info!(
            "Listener stopped: {} received, {} replied",
            self.received_count(),
            self.replied_count()
        );
        Ok(())
    }

    /// Runs until `signal` resolves, then stops the loop and waits for it.
    ///
    /// # Errors
    /// Errors from [`run`](Self::run), or `Signal` if `signal` failed.
    pub async fn run_until<F>(&self, signal: F) -> Result<()>
    where
        F: Future<Output = io::Result<()>>,
    {
        let run = self.run();
        tokio::pin!(run);

        let signal = tokio::select! {
            result = &mut run => return result,
            signal = signal => signal,
        };

        match &signal {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => warn!("Stop signal failed, shutting down: {}", e),
        }

        self.shutdown();
        run.await?;

        signal.map_err(|e| CliError::Signal {
            reason: e.to_string(),
        })
    }

    /// Triggers listener shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    async fn handle(&self, msg: &Message, from: SocketAddr) {
        self.received.fetch_add(1, Ordering::Relaxed);
        debug!("{} message from {}", msg.message_type(), from);

        let Some(reply) = reply_to(msg) else {
            return;
        };

        match self.channel.send(&reply, &from).await {
            Ok(_) => {
                self.replied.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!("Failed to reply to {}: {}", from, e),
        }
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("channel", &self.channel)
            .field("received", &self.received_count())
            .field("replied", &self.replied_count())
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

    use dragonet_core::protocol::{parse_message, AckMessage, DataMessage, HeartbeatMessage};
    use dragonet_core::PlainCryptor;
    use dragonet_transport::MockTransport;

    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn listener() -> Arc<Listener<MockTransport>> {
        let channel =
            MessageChannel::new(MockTransport::new(addr(9225)), Arc::new(PlainCryptor), 1400)
                .unwrap();
        Arc::new(Listener::new(channel))
    }

    async fn wait_for_replies(listener: &Listener<MockTransport>, n: usize) {
        for _ in 0..100 {
            if listener.channel.transport().sent_count() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("listener sent fewer than {n} replies");
    }

    #[tokio::test]
    async fn test_answers_and_stops() {
        let listener = listener();
        let transport = listener.channel.transport();
        transport.inject(HeartbeatMessage::new(4).encode().to_vec(), addr(1));
        transport.inject(vec![0xFF], addr(1));
        transport.inject(AckMessage::new(0, vec![]).encode().to_vec(), addr(1));
        transport.inject(DataMessage::new(8, b"hi".to_vec()).encode().to_vec(), addr(2));

        let task = {
            let listener = Arc::clone(&listener);
            tokio::spawn(async move { listener.run().await })
        };

        wait_for_replies(&listener, 2).await;
        listener.shutdown();
        task.await.unwrap().unwrap();

        let sent = listener.channel.transport().take_sent();
        let replies: Vec<_> = sent
            .iter()
            .map(|(raw, to)| (parse_message(raw).unwrap(), *to))
            .collect();

        assert_eq!(
            replies,
            vec![
                (Message::from(HeartbeatMessage::new(4)), addr(1)),
                (Message::from(AckMessage::new(8, vec![8])), addr(2)),
            ]
        );
        assert_eq!(listener.received_count(), 3);
        assert_eq!(listener.replied_count(), 2);
        assert!(!listener.channel.transport().is_active());
    }

    #[tokio::test]
    async fn test_run_until_signal() {
        let listener = listener();
        listener
            .channel
            .transport()
            .inject(HeartbeatMessage::new(1).encode().to_vec(), addr(1));

        let signal = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        };
        listener.run_until(signal).await.unwrap();

        assert_eq!(listener.replied_count(), 1);
        assert!(!listener.channel.transport().is_active());
    }

    #[tokio::test]
    async fn test_failed_signal_still_stops_listener() {
        let listener = listener();
        let signal = async { Err(io::Error::new(io::ErrorKind::Other, "no signal handler")) };

        let err = tokio::time::timeout(Duration::from_secs(1), listener.run_until(signal))
            .await
            .unwrap()
            .unwrap_err();

        assert!(matches!(err, CliError::Signal { .. }));
        assert!(!listener.channel.transport().is_active());
    }

    #[tokio::test]
    async fn test_shutdown_before_run() {
        let listener = listener();
        listener.shutdown();
        tokio::time::timeout(Duration::from_secs(1), listener.run())
            .await
            .unwrap()
            .unwrap();
    }
}
