// ============================================
// File: crates/dragonet-cli/src/lib.rs
// ============================================
//! # Dragonet CLI Library
//!
//! ## Creation Reason
//! Backs the `dragonet` binary: a toolbox for producing and inspecting
//! wire bytes by hand, and for checking a network path with a
//! diagnostic echo peer.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`config`]: TOML configuration shared by network commands
//! - [`listener`]: Echo peer loop with graceful shutdown
//! - [`responder`]: Reply table used by the listener
//! - [`probe`]: Heartbeat round-trip measurement
//! - [`format`]: Hex input parsing and message rendering
//! - [`error`]: CLI-specific error types
//!
//! ## Architecture Overview
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                     dragonet (bin)                    │
//! │   encode / decode          listen / ping / validate   │
//! │        │                          │                   │
//! │        ▼                          ▼                   │
//! │   format ──► core codec    config ──► MessageChannel  │
//! │                                   │                   │
//! │                        ┌──────────┴────────┐          │
//! │                        ▼                   ▼          │
//! │                    Listener             Prober        │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `encode`/`decode` never encrypt; they show plaintext wire bytes
//! - Logs go to stderr so stdout stays pipeable
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod format;
pub mod listener;
pub mod probe;
pub mod responder;

// Re-export primary types
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use listener::Listener;
pub use probe::{ProbeReport, Prober};
