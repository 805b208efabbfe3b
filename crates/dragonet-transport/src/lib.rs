// ============================================
// File: crates/dragonet-transport/src/lib.rs
// ============================================
//! # Dragonet Transport - Datagram I/O Layer
//!
//! ## Creation Reason
//! Moves encoded dragonet messages across the network. The core crate
//! only knows bytes; this crate owns sockets, datagram budgets and the
//! encrypt-then-send / receive-then-decrypt pipeline.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`traits`]: Transport trait definitions for abstraction
//! - [`udp`]: UDP socket implementation
//! - [`mock`]: In-memory transport for tests
//! - [`channel`]: Typed message channel over any transport
//! - [`error`]: Transport-specific error types
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 dragonet-cli                        │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                     │
//! │         ▼                     ▼                     │
//! │   dragonet-core       dragonet-transport            │
//! │                       You are here ◄──              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Always use traits for testability
//! - One message per datagram; there is no stream reassembly
//!
//! ## Last Modified
//! v0.1.0 - Initial transport layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channel;
pub mod error;
pub mod mock;
pub mod traits;
pub mod udp;

// Re-export primary types
pub use channel::{MessageChannel, DEFAULT_MAX_DATAGRAM_SIZE, MAX_UDP_PAYLOAD, MIN_DATAGRAM_SIZE};
pub use error::{Result, TransportError};
pub use mock::MockTransport;
pub use traits::{PacketSource, Transport};
pub use udp::UdpTransport;
