// ============================================
// File: crates/dragonet-transport/src/udp.rs
// ============================================
//! # UDP Transport
//!
//! ## Creation Reason
//! One dragonet message travels in one UDP datagram. This is the socket
//! both the echo listener and the prober sit on.
//!
//! ## Main Functionality
//! - `UdpTransport::bind` / `bind_addr`: Listening socket on a fixed address
//! - `UdpTransport::for_peer`: Ephemeral socket in the peer's address family
//! - `Transport` impl with a one-way shutdown latch
//!
//! ## ⚠️ Important Note for Next Developer
//! - The kernel truncates datagrams that do not fit the buffer passed to
//!   `recv`; `MessageChannel` sizes its buffer to notice that
//! - `SO_REUSEADDR` lets a restarted listener rebind right away
//!
//! ## Last Modified
//! v0.1.0 - Initial UDP transport

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, info, trace};

use crate::channel::MAX_UDP_PAYLOAD;
use crate::error::{Result, TransportError};
use crate::traits::{PacketSource, Transport};

/// Kernel receive buffer requested for every socket: a few dozen
/// maximum-size datagrams of headroom for bursts.
const RECV_BUFFER_SIZE: usize = 32 * (MAX_UDP_PAYLOAD + 1);

/// Creates the OS socket with dragonet's options, ready for Tokio.
fn open_socket(addr: SocketAddr) -> Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))
        .map_err(|e| TransportError::io("creating UDP socket", e))?;

    socket
        .set_reuse_address(true)
        .map_err(|e| TransportError::io("setting SO_REUSEADDR", e))?;

    // Not fatal: the kernel may cap it below the request
    if let Err(e) = socket.set_recv_buffer_size(RECV_BUFFER_SIZE) {
        debug!("Keeping default receive buffer for {}: {}", addr, e);
    }

    socket
        .set_nonblocking(true)
        .map_err(|e| TransportError::io("setting non-blocking", e))?;

    socket.bind(&addr.into()).map_err(|e| match e.kind() {
        io::ErrorKind::AddrInUse => TransportError::AddressInUse { addr },
        _ => TransportError::bind_failed(addr, e.to_string()),
    })?;

    Ok(socket.into())
}

/// UDP socket carrying dragonet datagrams.
///
/// ```ignore
/// let listener = UdpTransport::bind("0.0.0.0:9225").await?;
/// let prober = UdpTransport::for_peer("192.0.2.10:9225".parse()?).await?;
/// ```
pub struct UdpTransport {
    socket: UdpSocket,
    local_addr: SocketAddr,
    closed: AtomicBool,
}

impl UdpTransport {
    /// Binds to an address given as text, e.g. from a command line.
    ///
    /// # Errors
    /// `InvalidAddress` if `addr` does not parse, otherwise as
    /// [`bind_addr`](Self::bind_addr).
    pub async fn bind(addr: &str) -> Result<Self> {
        let parsed = addr.parse().map_err(|_| TransportError::InvalidAddress {
            addr: addr.to_string(),
        })?;
        Self::bind_addr(parsed).await
    }

    /// Binds to `addr`. Port 0 picks an ephemeral port.
    ///
    /// # Errors
    /// `AddressInUse`, `BindFailed`, or `Io` for socket setup failures.
    #[allow(clippy::unused_async)]
    pub async fn bind_addr(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::from_std(open_socket(addr)?)
            .map_err(|e| TransportError::io("registering socket with Tokio", e))?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| TransportError::io("reading local address", e))?;

        info!("Dragonet UDP socket on {}", local_addr);

        Ok(Self {
            socket,
            local_addr,
            closed: AtomicBool::new(false),
        })
    }

    /// Binds an ephemeral port on the unspecified address of `peer`'s
    /// family, so a v4 peer gets a v4 socket and a v6 peer a v6 one.
    ///
    /// # Errors
    /// As [`bind_addr`](Self::bind_addr).
    pub async fn for_peer(peer: SocketAddr) -> Result<Self> {
        let ip = match peer.ip() {
            IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        };
        Self::bind_addr(SocketAddr::new(ip, 0)).await
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::ShuttingDown);
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, PacketSource)> {
        self.ensure_open()?;

        let (len, from) = self
            .socket
            .recv_from(buf)
            .await
            .map_err(|e| TransportError::ReceiveFailed {
                reason: e.to_string(),
            })?;
        let source = PacketSource::new(from);

        trace!("{} <- {} ({} bytes)", self.local_addr, from, len);
        Ok((len, source))
    }

    async fn send(&self, buf: &[u8], dest: &SocketAddr) -> Result<usize> {
        self.ensure_open()?;

        let sent = self.socket.send_to(buf, dest).await.map_err(|e| {
            TransportError::SendFailed {
                dest: *dest,
                reason: e.to_string(),
            }
        })?;

        trace!("{} -> {} ({} bytes)", self.local_addr, dest, sent);
        Ok(sent)
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.local_addr)
    }

    async fn shutdown(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("Dragonet UDP socket on {} closed", self.local_addr);
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("local_addr", &self.local_addr)
            .field("active", &self.is_active())
            .finish()
    }
}
