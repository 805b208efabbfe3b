// ============================================
// File: crates/dragonet-cli/src/probe.rs
// ============================================
//! # Heartbeat Probe
//!
//! ## Creation Reason
//! Measures whether a peer is reachable and how long it takes to
//! answer, using heartbeats the peer echoes with the same sequence.
//!
//! ## Main Functionality
//! - `Prober`: Sends numbered heartbeats and waits for matching echoes
//! - `ProbeReport`: Loss and round-trip statistics
//!
//! ## ⚠️ Important Note for Next Developer
//! - Sequence numbers start at 1 for every run
//! - Echoes with a stale sequence (late replies) are ignored
//! - Only the probed address counts as an echo source
//! - RTT is measured to the receive timestamp, not to parse completion
//!
//! ## Last Modified
//! v0.1.0 - Initial probe

use std::fmt;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use dragonet_core::protocol::{HeartbeatMessage, Message};
use dragonet_transport::{MessageChannel, Transport, TransportError};

use crate::error::Result;

// ============================================
// ProbeReport
// ============================================

/// Outcome of a probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Probed peer.
    pub peer: SocketAddr,
    /// Heartbeats sent.
    pub sent: u32,
    /// Round-trip times of answered heartbeats, in send order.
    pub rtts: Vec<Duration>,
}

impl ProbeReport {
    /// Number of heartbeats answered.
    #[must_use]
    pub fn received(&self) -> u32 {
        u32::try_from(self.rtts.len()).unwrap_or(u32::MAX)
    }

    /// Percentage of heartbeats not answered.
    #[must_use]
    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            return 0.0;
        }
        f64::from(self.sent - self.received()) * 100.0 / f64::from(self.sent)
    }

    /// Shortest round trip.
    #[must_use]
    pub fn min_rtt(&self) -> Option<Duration> {
        self.rtts.iter().min().copied()
    }

    /// Longest round trip.
    #[must_use]
    pub fn max_rtt(&self) -> Option<Duration> {
        self.rtts.iter().max().copied()
    }

    /// Mean round trip.
    #[must_use]
    pub fn avg_rtt(&self) -> Option<Duration> {
        if self.rtts.is_empty() {
            return None;
        }
        let total: Duration = self.rtts.iter().sum();
        Some(total / self.received())
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} sent, {} received, {:.1}% loss",
            self.peer,
            self.sent,
            self.received(),
            self.loss_percent()
        )?;
        if let (Some(min), Some(avg), Some(max)) = (self.min_rtt(), self.avg_rtt(), self.max_rtt()) {
            write!(f, ", rtt min/avg/max = {min:?}/{avg:?}/{max:?}")?;
        }
        Ok(())
    }
}

// ============================================
// Prober
// ============================================

/// Sends heartbeats over a channel and times the echoes.
pub struct Prober<T: Transport> {
    channel: MessageChannel<T>,
    timeout: Duration,
}

impl<T: Transport> Prober<T> {
    /// Creates a prober waiting up to `timeout` for each echo.
    #[must_use]
    pub const fn new(channel: MessageChannel<T>, timeout: Duration) -> Self {
        Self { channel, timeout }
    }

    /// Sends `count` heartbeats to `peer`, one at a time.
    ///
    /// # Errors
    /// Transport errors other than timeouts. Unanswered heartbeats are
    /// counted as lost, not reported as errors.
    pub async fn ping(&self, peer: SocketAddr, count: u32) -> Result<ProbeReport> {
        let mut report = ProbeReport {
            peer,
            sent: 0,
            rtts: Vec::with_capacity(count as usize),
        };

        for i in 1..=count {
            let seq = i32::try_from(i).unwrap_or(i32::MAX);
            report.sent += 1;

            match self.round_trip(peer, seq).await? {
                Some(rtt) => {
                    debug!("Heartbeat {} from {}: {:?}", seq, peer, rtt);
                    report.rtts.push(rtt);
                }
                None => warn!("Heartbeat {} to {} timed out after {:?}", seq, peer, self.timeout),
            }
        }

        Ok(report)
    }

    /// Sends one heartbeat and waits for its echo.
    async fn round_trip(&self, peer: SocketAddr, seq: i32) -> Result<Option<Duration>> {
        let started = Instant::now();
        self.channel.send(&HeartbeatMessage::new(seq), &peer).await?;

        loop {
            let remaining = self.timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Ok(None);
            }

            match self.channel.recv_timeout(remaining).await {
                Ok((Message::Heartbeat(hb), source))
                    if hb.seq() == seq && source.addr == peer =>
                {
                    return Ok(Some(source.timestamp.duration_since(started)));
                }
                Ok((msg, source)) => {
                    debug!("Ignoring {:?} from {} while probing", msg, source.addr);
                }
                Err(TransportError::Timeout { .. }) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for Prober<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prober")
            .field("channel", &self.channel)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================
// Tests
// ============================================
