// ============================================
// File: crates/dragonet-cli/src/main.rs
// ============================================
//! # Dragonet CLI Entry Point
//!
//! ## Creation Reason
//! Command-line front end for building, inspecting and exchanging
//! dragonet messages.
//!
//! ## Usage
//! ```bash
//! # Produce wire bytes
//! dragonet encode data --seq 3 --payload-hex 01020304
//! dragonet encode ack --consumed 42 --seq-list 5,6
//!
//! # Inspect wire bytes
//! dragonet decode 020000000003000401020304 --json
//!
//! # Run an echo peer, then probe it from elsewhere
//! dragonet listen -c dragonet.toml
//! dragonet ping 192.0.2.10:9225 -c dragonet.toml
//!
//! # Check a config file
//! dragonet validate -c dragonet.toml
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Commands without `-c` run on defaults (plaintext, port 9225)
//! - `RUST_LOG` overrides the configured log level
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dragonet_cli::format::{parse_hex, parse_seq_list, render};
use dragonet_cli::{CliConfig, CliError, Listener, Prober};
use dragonet_core::protocol::{
    parse_message, AckMessage, CloseMessage, DataMessage, HeartbeatMessage, Message, WireMessage,
};
use dragonet_transport::{MessageChannel, UdpTransport};

// ============================================
// CLI Definition
// ============================================

/// Dragonet wire protocol toolbox
#[derive(Parser, Debug)]
#[command(name = "dragonet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a message and print its wire bytes as hex
    Encode {
        /// Message to encode
        #[command(subcommand)]
        message: EncodeCommand,
    },

    /// Decode hex wire bytes and print the message
    Decode {
        /// Wire bytes as hex (whitespace and ':' separators allowed)
        hex: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an echo peer until Ctrl+C
    ///
    /// Answers heartbeats with heartbeats, data with acks and
    /// closes with closes.
    Listen {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override network.listen_addr
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },

    /// Probe a peer with heartbeats and report round-trip times
    Ping {
        /// Peer address (IP:port)
        peer: SocketAddr,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override probe.count
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum EncodeCommand {
    /// Data message
    Data {
        /// Sequence number
        #[arg(long, allow_hyphen_values = true)]
        seq: i32,

        /// Payload as hex
        #[arg(long, default_value = "")]
        payload_hex: String,
    },

    /// Close message
    Close {
        /// Sequence number
        #[arg(long, allow_hyphen_values = true)]
        seq: i32,

        /// Close status
        #[arg(long, allow_hyphen_values = true)]
        status: i16,
    },

    /// Ack message
    Ack {
        /// Highest sequence consumed
        #[arg(long, allow_hyphen_values = true)]
        consumed: i32,

        /// Comma-separated acknowledged sequences
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        seq_list: String,
    },

    /// Heartbeat message
    Heartbeat {
        /// Sequence number
        #[arg(long, allow_hyphen_values = true)]
        seq: i32,
    },
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode { message } => cmd_encode(message),
        Commands::Decode { hex, json } => cmd_decode(&hex, json),
        Commands::Listen { config, listen } => cmd_listen(config, listen).await,
        Commands::Ping { peer, config, count } => cmd_ping(peer, config, count).await,
        Commands::Validate { config } => cmd_validate(config).await,
    };

    if let Err(e) = result {
        // No-op once a subscriber is installed
        init_logging("error");
        error!("{:#}", e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Encodes a message given on the command line.
fn cmd_encode(command: EncodeCommand) -> anyhow::Result<()> {
    init_logging("warn");

    let msg: Message = match command {
        EncodeCommand::Data { seq, payload_hex } => {
            let payload = parse_hex("payload-hex", &payload_hex)?;
            DataMessage::try_new(seq, payload)?.into()
        }
        EncodeCommand::Close { seq, status } => CloseMessage::new(seq, status).into(),
        EncodeCommand::Ack { consumed, seq_list } => {
            let list = parse_seq_list("seq-list", &seq_list)?;
            AckMessage::try_new(consumed, list)?.into()
        }
        EncodeCommand::Heartbeat { seq } => HeartbeatMessage::new(seq).into(),
    };

    println!("{}", hex::encode(msg.encode()));
    Ok(())
}

/// Decodes hex wire bytes.
fn cmd_decode(input: &str, json: bool) -> anyhow::Result<()> {
    init_logging("warn");

    let raw = parse_hex("hex", input)?;
    let msg = parse_message(&raw)?;

    if raw.len() > msg.wire_size() {
        warn!("{} trailing bytes ignored", raw.len() - msg.wire_size());
    }

    println!("{}", render(&msg, json)?);
    Ok(())
}

/// Runs the echo listener until Ctrl+C.
async fn cmd_listen(
    config_path: Option<PathBuf>,
    listen: Option<SocketAddr>,
) -> anyhow::Result<()> {
    let mut config = CliConfig::load_or_default(config_path.as_deref()).await?;
    if let Some(addr) = listen {
        config.network.listen_addr = addr;
        config.validate()?;
    }

    init_logging(&config.logging.level);

    let cryptor = config.build_cryptor()?;
    info!("Packet cipher: {}", cryptor.name());

    let transport = UdpTransport::bind_addr(config.network.listen_addr).await?;
    let channel = MessageChannel::new(transport, cryptor, config.network.max_datagram_size)?;
    let listener = Listener::new(channel);

    listener.run_until(tokio::signal::ctrl_c()).await?;
    Ok(())
}

/// Probes a peer with heartbeats.
async fn cmd_ping(
    peer: SocketAddr,
    config_path: Option<PathBuf>,
    count: Option<u32>,
) -> anyhow::Result<()> {
    let config = CliConfig::load_or_default(config_path.as_deref()).await?;
    init_logging(&config.logging.level);

    let count = count.unwrap_or(config.probe.count);
    if count == 0 {
        return Err(CliError::invalid_argument("count", "must be greater than 0").into());
    }

    let transport = UdpTransport::for_peer(peer).await?;
    let channel =
        MessageChannel::new(transport, config.build_cryptor()?, config.network.max_datagram_size)?;
    let prober = Prober::new(channel, config.probe_timeout());

    println!("PING {} ({} heartbeats)", peer, count);
    let report = prober.ping(peer, count).await?;
    for (i, rtt) in report.rtts.iter().enumerate() {
        println!("  reply {}: {:?}", i + 1, rtt);
    }
    println!("{report}");

    if report.received() == 0 {
        return Err(CliError::Timeout {
            peer,
            attempts: report.sent,
        }
        .into());
    }

    Ok(())
}

/// Validates configuration and prints the effective settings.
async fn cmd_validate(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    init_logging("warn");

    if config_path.is_none() {
        println!("⚠️  No config file given; showing defaults.");
    }

    let config = CliConfig::load_or_default(config_path.as_deref()).await?;
    let cryptor = config.build_cryptor()?;

    println!("✅ Configuration is valid");
    println!();
    println!("   Cipher:       {} ({} bytes overhead)", cryptor.name(), cryptor.max_overhead());
    println!();
    print!("{}", config.redacted().to_toml());

    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber, writing to stderr.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}
