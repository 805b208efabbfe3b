// ============================================
// File: crates/dragonet-cli/src/error.rs
// ============================================
//! # CLI Error Types
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use std::net::SocketAddr;

use thiserror::Error;

use dragonet_core::CoreError;
use dragonet_transport::TransportError;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file could not be read or parsed.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        /// File path
        path: String,
        /// Why loading failed
        reason: String,
    },

    /// Configuration value out of range or inconsistent.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Dotted field name
        field: String,
        /// Why it's invalid
        reason: String,
    },

    /// Command-line argument could not be interpreted.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// Why it's invalid
        reason: String,
    },

    /// Peer never answered.
    #[error("No response from {peer} after {attempts} attempts")]
    Timeout {
        /// Probed peer
        peer: SocketAddr,
        /// Probes sent
        attempts: u32,
    },

    /// Waiting for the stop signal failed.
    #[error("Failed to wait for shutdown signal: {reason}")]
    Signal {
        /// Why the signal could not be awaited
        reason: String,
    },

    /// Output rendering failed.
    #[error("Serialization failed: {reason}")]
    Serialization {
        /// Why rendering failed
        reason: String,
    },

    /// Codec or crypto failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Socket or channel failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl CliError {
    /// Creates a `ConfigLoad` error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidArgument` error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for configuration problems.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad { .. } | Self::ConfigInvalid { .. })
    }

    /// Returns `true` if retrying the command may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::config_load("/etc/dragonet.toml", "file not found");
        assert!(err.to_string().contains("/etc/dragonet.toml"));
        assert!(err.is_config_error());

        let err = CliError::Timeout {
            peer: "127.0.0.1:9225".parse().unwrap(),
            attempts: 3,
        };
        assert_eq!(err.to_string(), "No response from 127.0.0.1:9225 after 3 attempts");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_wrapped_errors_are_transparent() {
        let err: CliError = CoreError::UnknownType(99).into();
        assert_eq!(err.to_string(), "Unknown message type: 99");
        assert!(!err.is_retryable());
    }
}
