// ============================================
// File: crates/dragonet-cli/src/format.rs
// ============================================
//! # Input / Output Formatting
//!
//! Hex parsing for command arguments and rendering of decoded messages
//! for the terminal.

use dragonet_core::protocol::{Message, ProtocolVersion, WireMessage};

use crate::error::{CliError, Result};

/// Parses a hex string into bytes.
///
/// Accepts an optional `0x` prefix and ignores whitespace, `:` and `-`
/// separators so dumps can be pasted as-is.
///
/// # Errors
/// `InvalidArgument` if the remaining text is not valid hex.
pub fn parse_hex(name: &str, input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let cleaned: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();

    hex::decode(&cleaned).map_err(|e| CliError::invalid_argument(name, e.to_string()))
}

/// Parses a comma-separated list of sequence numbers.
///
/// # Errors
/// `InvalidArgument` if any entry is not an `i32`.
pub fn parse_seq_list(name: &str, input: &str) -> Result<Vec<i32>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|e| CliError::invalid_argument(name, format!("'{s}': {e}")))
        })
        .collect()
}

/// Renders a decoded message, as pretty JSON or a one-line summary.
///
/// # Errors
/// `Serialization` if JSON rendering fails.
pub fn render(msg: &Message, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(msg).map_err(|e| CliError::Serialization {
            reason: e.to_string(),
        });
    }

    let header = format!(
        "{} {} ({} bytes)",
        ProtocolVersion::new(msg.version()),
        msg.message_type(),
        msg.wire_size()
    );
    let body = match msg {
        Message::Data(m) => format!("seq={} data={}", m.seq(), hex::encode(m.data())),
        Message::Close(m) => format!("seq={} status={}", m.seq(), m.status()),
        Message::Ack(m) => format!("consumedSeq={} seqList={:?}", m.consumed_seq(), m.seq_list()),
        Message::Heartbeat(m) => format!("seq={}", m.seq()),
    };
    Ok(format!("{header}: {body}"))
}

#[cfg(test)]
mod tests {
    use dragonet_core::protocol::{AckMessage, DataMessage};

    use super::*;

    #[test]
    fn test_parse_hex_variants() {
        let expected = vec![0x02, 0x03, 0xAB];
        assert_eq!(parse_hex("hex", "0203ab").unwrap(), expected);
        assert_eq!(parse_hex("hex", "0x0203AB").unwrap(), expected);
        assert_eq!(parse_hex("hex", " 02 03 ab\n").unwrap(), expected);
        assert_eq!(parse_hex("hex", "02:03:ab").unwrap(), expected);
        assert!(parse_hex("hex", "").unwrap().is_empty());
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        let err = parse_hex("payload", "0g").unwrap_err();
        assert!(err.to_string().contains("payload"));
        assert!(parse_hex("payload", "abc").is_err());
    }

    #[test]
    fn test_parse_seq_list() {
        assert_eq!(parse_seq_list("seq-list", "5, 6,-7").unwrap(), vec![5, 6, -7]);
        assert!(parse_seq_list("seq-list", "").unwrap().is_empty());
        assert!(parse_seq_list("seq-list", "1,x").is_err());
        assert!(parse_seq_list("seq-list", "2147483648").is_err());
    }

    #[test]
    fn test_render_summary() {
        let msg = DataMessage::new(3, vec![1, 2, 3, 4]).into();
        assert_eq!(
            render(&msg, false).unwrap(),
            "v2 data (12 bytes): seq=3 data=01020304"
        );

        let msg = AckMessage::new(42, vec![5, 6]).into();
        assert_eq!(
            render(&msg, false).unwrap(),
            "v2 ack (16 bytes): consumedSeq=42 seqList=[5, 6]"
        );
    }

    #[test]
    fn test_render_json() {
        let msg = AckMessage::new(42, vec![5, 6]).into();
        let value: serde_json::Value =
            serde_json::from_str(&render(&msg, true).unwrap()).unwrap();
        assert_eq!(value["type"], "ack");
        assert_eq!(value["consumed_seq"], 42);
        assert_eq!(value["seq_list"], serde_json::json!([5, 6]));
    }
}
