// ============================================
// File: crates/dragonet-cli/src/config.rs
// ============================================
//! # CLI Configuration
//!
//! ## Creation Reason
//! Holds the settings shared by the `listen`, `ping` and `validate`
//! commands: where to bind, how large datagrams may be, which packet
//! cipher peers agreed on, and how patient a probe is.
//!
//! ## Configuration Sections
//! - `network`: UDP listen address, datagram budget
//! - `crypto`: Packet cipher and key material
//! - `logging`: Log level
//! - `probe`: Ping timeout and count
//!
//! ## Example Configuration
//! ```toml
//! [network]
//! listen_addr = "0.0.0.0:9225"
//! max_datagram_size = 1400
//!
//! [crypto]
//! cipher = "chacha20-poly1305"
//! passphrase = "shared secret"
//!
//! [logging]
//! level = "info"
//!
//! [probe]
//! timeout_ms = 2000
//! count = 3
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Every section is optional; a missing file means all defaults
//! - Both peers must use the same cipher and key material
//! - Secrets never appear in `Debug` output or `redacted()` copies
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use dragonet_core::{ChaChaCryptor, PacketCryptor, PacketKey, PlainCryptor};
use dragonet_transport::{DEFAULT_MAX_DATAGRAM_SIZE, MAX_UDP_PAYLOAD, MIN_DATAGRAM_SIZE};

use crate::error::{CliError, Result};

/// Placeholder written over secrets in redacted output.
const REDACTED: &str = "<redacted>";

/// Accepted values for `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ============================================
// CliConfig
// ============================================

/// Main CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Network configuration.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Packet encryption configuration.
    #[serde(default)]
    pub crypto: CryptoConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Probe (ping) configuration.
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl CliConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!("Loading configuration from: {}", path_str);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CliError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::config_load(&path_str, e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns defaults.
    ///
    /// # Errors
    /// Errors from [`load`](Self::load).
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Parses and validates configuration from a string.
    ///
    /// # Errors
    /// Returns error if parsing or validation fails.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CliError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    /// `ConfigInvalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.crypto.validate()?;
        self.logging.validate()?;
        self.probe.validate()?;
        Ok(())
    }

    /// Serializes configuration to a TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Returns a copy with key material replaced by a placeholder.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.crypto.key.is_some() {
            copy.crypto.key = Some(REDACTED.into());
        }
        if copy.crypto.passphrase.is_some() {
            copy.crypto.passphrase = Some(REDACTED.into());
        }
        copy
    }

    /// Builds the packet cryptor selected by `[crypto]`.
    ///
    /// # Errors
    /// `ConfigInvalid` if the key material is missing or malformed.
    pub fn build_cryptor(&self) -> Result<Arc<dyn PacketCryptor>> {
        match self.crypto.cipher {
            CipherKind::None => Ok(Arc::new(PlainCryptor::new())),
            CipherKind::ChaCha20Poly1305 => {
                let key = self.crypto.packet_key()?;
                Ok(Arc::new(ChaChaCryptor::new(key)))
            }
        }
    }

    /// Returns the probe reply timeout.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.timeout_ms)
    }
}

// ============================================
// NetworkConfig
// ============================================

/// Network configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// UDP listen address.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Largest datagram sent or accepted, after encryption.
    #[serde(default = "default_max_datagram_size")]
    pub max_datagram_size: usize,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9225))
}

fn default_max_datagram_size() -> usize {
    DEFAULT_MAX_DATAGRAM_SIZE
}

impl NetworkConfig {
    fn validate(&self) -> Result<()> {
        if self.listen_addr.port() == 0 {
            return Err(CliError::config_invalid(
                "network.listen_addr",
                "port cannot be 0",
            ));
        }

        if !(MIN_DATAGRAM_SIZE..=MAX_UDP_PAYLOAD).contains(&self.max_datagram_size) {
            return Err(CliError::config_invalid(
                "network.max_datagram_size",
                format!("must be between {MIN_DATAGRAM_SIZE} and {MAX_UDP_PAYLOAD}"),
            ));
        }

        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_datagram_size: default_max_datagram_size(),
        }
    }
}

// ============================================
// CryptoConfig
// ============================================

/// Packet cipher selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherKind {
    /// Plaintext datagrams.
    #[default]
    #[serde(rename = "none")]
    None,
    /// ChaCha20-Poly1305 with a random nonce per datagram.
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

/// Packet encryption configuration section.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// Cipher applied to every datagram.
    #[serde(default)]
    pub cipher: CipherKind,

    /// Base64-encoded 32-byte key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Passphrase the key is derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

impl CryptoConfig {
    fn validate(&self) -> Result<()> {
        match self.cipher {
            CipherKind::None => {
                if self.key.is_some() || self.passphrase.is_some() {
                    return Err(CliError::config_invalid(
                        "crypto.cipher",
                        "key material given but cipher is \"none\"",
                    ));
                }
                Ok(())
            }
            CipherKind::ChaCha20Poly1305 => self.packet_key().map(|_| ()),
        }
    }

    /// Resolves the configured key material into a packet key.
    fn packet_key(&self) -> Result<PacketKey> {
        match (&self.key, &self.passphrase) {
            (Some(key), None) => PacketKey::from_base64(key)
                .map_err(|e| CliError::config_invalid("crypto.key", e.to_string())),
            (None, Some(passphrase)) => PacketKey::derive_from_passphrase(passphrase)
                .map_err(|e| CliError::config_invalid("crypto.passphrase", e.to_string())),
            (Some(_), Some(_)) => Err(CliError::config_invalid(
                "crypto",
                "set either key or passphrase, not both",
            )),
            (None, None) => Err(CliError::config_invalid(
                "crypto",
                "cipher requires a key or passphrase",
            )),
        }
    }
}

impl fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("cipher", &self.cipher)
            .field("key", &self.key.as_ref().map(|_| REDACTED))
            .field("passphrase", &self.passphrase.as_ref().map(|_| REDACTED))
            .finish()
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(CliError::config_invalid(
                "logging.level",
                format!("must be one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// ProbeConfig
// ============================================

/// Probe (ping) configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// How long to wait for each echo, in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of heartbeats to send.
    #[serde(default = "default_probe_count")]
    pub count: u32,
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_probe_count() -> u32 {
    3
}

impl ProbeConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(CliError::config_invalid(
                "probe.timeout_ms",
                "must be greater than 0",
            ));
        }

        if self.count == 0 {
            return Err(CliError::config_invalid(
                "probe.count",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout_ms(),
            count: default_probe_count(),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network.listen_addr.port(), 9225);
        assert_eq!(config.network.max_datagram_size, 1400);
        assert_eq!(config.crypto.cipher, CipherKind::None);
        assert_eq!(config.probe_timeout(), Duration::from_secs(2));
        assert_eq!(config.probe.count, 3);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(CliConfig::from_str("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_full_config_format() {
        let toml = r#"
            [network]
            listen_addr = "127.0.0.1:7000"
            max_datagram_size = 512

            [crypto]
            cipher = "chacha20-poly1305"
            passphrase = "correct horse"

            [logging]
            level = "debug"

            [probe]
            timeout_ms = 250
            count = 10
        "#;

        let config = CliConfig::from_str(toml).unwrap();
        assert_eq!(config.network.listen_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(config.network.max_datagram_size, 512);
        assert_eq!(config.crypto.cipher, CipherKind::ChaCha20Poly1305);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.probe.count, 10);

        let cryptor = config.build_cryptor().unwrap();
        assert_eq!(cryptor.name(), "chacha20-poly1305");
        assert_eq!(cryptor.max_overhead(), 28);
    }

    #[test]
    fn test_base64_key() {
        let key = PacketKey::generate().to_base64();
        let toml = format!("[crypto]\ncipher = \"chacha20-poly1305\"\nkey = \"{key}\"\n");
        let config = CliConfig::from_str(&toml).unwrap();
        assert!(config.build_cryptor().is_ok());
    }

    #[test]
    fn test_crypto_validation() {
        let missing = "[crypto]\ncipher = \"chacha20-poly1305\"\n";
        assert!(CliConfig::from_str(missing).is_err());

        let both = "[crypto]\ncipher = \"chacha20-poly1305\"\nkey = \"AAAA\"\npassphrase = \"x\"\n";
        assert!(CliConfig::from_str(both).is_err());

        let bad_key = "[crypto]\ncipher = \"chacha20-poly1305\"\nkey = \"AAAA\"\n";
        let err = CliConfig::from_str(bad_key).unwrap_err();
        assert!(err.to_string().contains("crypto.key"));

        let stray = "[crypto]\npassphrase = \"x\"\n";
        assert!(CliConfig::from_str(stray).is_err());

        let unknown = "[crypto]\ncipher = \"rot13\"\n";
        assert!(CliConfig::from_str(unknown).is_err());
    }

    #[test]
    fn test_range_validation() {
        assert!(CliConfig::from_str("[network]\nmax_datagram_size = 63\n").is_err());
        assert!(CliConfig::from_str("[network]\nmax_datagram_size = 65508\n").is_err());
        assert!(CliConfig::from_str("[network]\nlisten_addr = \"0.0.0.0:0\"\n").is_err());
        assert!(CliConfig::from_str("[probe]\ncount = 0\n").is_err());
        assert!(CliConfig::from_str("[probe]\ntimeout_ms = 0\n").is_err());
        assert!(CliConfig::from_str("[logging]\nlevel = \"loud\"\n").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = CliConfig::default();
        let parsed = CliConfig::from_str(&config.to_toml()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_secrets_redacted() {
        let config =
            CliConfig::from_str("[crypto]\ncipher = \"chacha20-poly1305\"\npassphrase = \"hunter2\"\n")
                .unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));

        let shown = config.redacted().to_toml();
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains(REDACTED));
    }

    #[tokio::test]
    async fn test_missing_file_fails_to_load() {
        let err = CliConfig::load("/nonexistent/dragonet.toml").await.unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(
            CliConfig::load_or_default(None).await.unwrap(),
            CliConfig::default()
        );
    }
}
