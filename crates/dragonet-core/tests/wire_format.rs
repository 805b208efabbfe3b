//! Byte-level compatibility tests for the message framing.
//!
//! Vectors are written out by hand so that any change to field order,
//! width or endianness fails here first.

use dragonet_core::protocol::{
    parse_message, AckMessage, CloseMessage, DataMessage, DecodeMessage, HeartbeatMessage,
    Message, WireMessage, PROTOCOL_VERSION,
};
use dragonet_core::CoreError;

fn vector(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str.replace(' ', "")).unwrap()
}

fn samples() -> Vec<(Message, Vec<u8>)> {
    vec![
        (
            DataMessage::new(777, vec![1, 2, 3, 4]).into(),
            vector("02 00 00000309 0004 01020304"),
        ),
        (
            CloseMessage::new(777, 42).into(),
            vector("02 01 00000309 002a"),
        ),
        (
            AckMessage::new(42, vec![5, 6]).into(),
            vector("02 02 0000002a 0002 00000005 00000006"),
        ),
        (
            HeartbeatMessage::new(777).into(),
            vector("02 03 00000309"),
        ),
    ]
}

#[test]
fn encodes_to_known_vectors() {
    assert_eq!(PROTOCOL_VERSION, 0x02);
    for (msg, expected) in samples() {
        assert_eq!(msg.encode().as_ref(), expected.as_slice(), "{msg:?}");
        assert_eq!(msg.wire_size(), expected.len());
    }
}

#[test]
fn decodes_known_vectors() {
    for (msg, raw) in samples() {
        assert_eq!(parse_message(&raw).unwrap(), msg);
    }
}

#[test]
fn every_truncation_is_short_buffer() {
    for (msg, raw) in samples() {
        for len in 0..raw.len() {
            let err = parse_message(&raw[..len]).unwrap_err();
            assert!(
                matches!(err, CoreError::ShortBuffer { .. }),
                "{msg:?} truncated to {len}: {err}"
            );
        }
    }
}

#[test]
fn truncation_names_the_missing_field() {
    let raw = vector("02 00 00000001 0004 0102");
    assert_eq!(
        DataMessage::decode(&raw),
        Err(CoreError::short_buffer("data", 4, 2))
    );

    let raw = vector("02 02 00000001 0003 00000005 00000006");
    assert_eq!(
        AckMessage::decode(&raw),
        Err(CoreError::short_buffer("seqList", 4, 0))
    );

    let raw = vector("02 01 00000001 00");
    assert_eq!(
        CloseMessage::decode(&raw),
        Err(CoreError::short_buffer("status", 2, 1))
    );
}

#[test]
fn any_other_version_is_rejected() {
    for (_, raw) in samples() {
        for version in (0..=u8::MAX).filter(|v| *v != PROTOCOL_VERSION) {
            let mut mutated = raw.clone();
            mutated[0] = version;
            assert_eq!(
                parse_message(&mutated),
                Err(CoreError::version_mismatch(PROTOCOL_VERSION, version))
            );
        }
    }
}

#[test]
fn unregistered_tags_are_unknown() {
    for tag in 4..=u8::MAX {
        let raw = [PROTOCOL_VERSION, tag, 0, 0, 0, 0, 0, 0];
        assert_eq!(parse_message(&raw), Err(CoreError::UnknownType(tag)));
    }
}

#[test]
fn variant_decoder_rejects_foreign_tag() {
    let raw = HeartbeatMessage::new(1).encode();
    assert_eq!(
        CloseMessage::decode(&raw),
        Err(CoreError::type_mismatch(1, 3))
    );
}

#[test]
fn extreme_values_survive() {
    let msgs: Vec<Message> = vec![
        DataMessage::new(i32::MIN, Vec::new()).into(),
        DataMessage::new(i32::MAX, vec![0xAB; u16::MAX as usize]).into(),
        CloseMessage::new(-1, i16::MIN).into(),
        CloseMessage::new(i32::MAX, i16::MAX).into(),
        AckMessage::new(i32::MIN, vec![i32::MAX, -1, 0, i32::MIN]).into(),
        HeartbeatMessage::new(-1).into(),
    ];

    for msg in msgs {
        let raw = msg.encode();
        assert_eq!(parse_message(&raw).unwrap(), msg);
    }
}

#[test]
fn max_length_data_prefix_is_all_ones() {
    let msg = DataMessage::new(0, vec![0u8; u16::MAX as usize]);
    let raw = msg.encode();
    assert_eq!(&raw[6..8], &[0xFF, 0xFF]);
    assert_eq!(raw.len(), 8 + u16::MAX as usize);
}

#[test]
fn negative_fields_use_twos_complement() {
    let raw = CloseMessage::new(-2, -1).encode();
    assert_eq!(raw.as_ref(), vector("02 01 fffffffe ffff").as_slice());
}

#[test]
fn ack_list_order_is_preserved() {
    let list = vec![9, 3, 7, 3, -5];
    let raw = AckMessage::new(0, list.clone()).encode();
    let decoded = AckMessage::decode(&raw).unwrap();
    assert_eq!(decoded.seq_list(), list.as_slice());
}

#[test]
fn trailing_bytes_are_ignored() {
    for (msg, raw) in samples() {
        let mut padded = raw.clone();
        padded.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(parse_message(&padded).unwrap(), msg);
    }
}

#[test]
fn fixed_length_is_eight_for_every_kind() {
    for (msg, _) in samples() {
        assert_eq!(msg.fixed_length(), 8);
        assert_eq!(msg.version(), PROTOCOL_VERSION);
    }
}
